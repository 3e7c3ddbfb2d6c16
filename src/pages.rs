use async_trait::async_trait;

use crate::api::ApiClient;
use crate::auth::SessionStore;
use crate::guards::Access;
use crate::paths;
use crate::router::Router;
use crate::tracking::InteractionTracker;

/// Page
///
/// Every view the app can show, one per registered path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Tires,
    TireDetail,
    TireComparison,
    TireMultiComparison,
    Businesses,
    BusinessDetail,
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
    RequestBusiness,
    AdminDashboard,
    AdminTires,
    AdminInventory,
    AdminMyBusiness,
    AdminBusinessApplications,
    AdminReports,
    BusinessDashboard,
    BusinessMyBusiness,
    BusinessInventory,
    Settings,
}

impl Page {
    /// Registration order. Literal comparison paths come after `/llantas/:id`; exact
    /// matches win regardless.
    pub const ALL: [Page; 22] = [
        Page::Home,
        Page::Tires,
        Page::TireDetail,
        Page::TireComparison,
        Page::TireMultiComparison,
        Page::Businesses,
        Page::BusinessDetail,
        Page::Login,
        Page::Register,
        Page::ForgotPassword,
        Page::ResetPassword,
        Page::RequestBusiness,
        Page::AdminDashboard,
        Page::AdminTires,
        Page::AdminInventory,
        Page::AdminMyBusiness,
        Page::AdminBusinessApplications,
        Page::AdminReports,
        Page::BusinessDashboard,
        Page::BusinessMyBusiness,
        Page::BusinessInventory,
        Page::Settings,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => paths::HOME,
            Page::Tires => paths::TIRES,
            Page::TireDetail => paths::TIRE_DETAIL,
            Page::TireComparison => paths::TIRE_COMPARISON,
            Page::TireMultiComparison => paths::TIRE_MULTI_COMPARISON,
            Page::Businesses => paths::BUSINESSES,
            Page::BusinessDetail => paths::BUSINESS_DETAIL,
            Page::Login => paths::LOGIN,
            Page::Register => paths::REGISTER,
            Page::ForgotPassword => paths::FORGOT_PASSWORD,
            Page::ResetPassword => paths::RESET_PASSWORD,
            Page::RequestBusiness => paths::REQUEST_BUSINESS,
            Page::AdminDashboard => paths::ADMIN_DASHBOARD,
            Page::AdminTires => paths::ADMIN_TIRES,
            Page::AdminInventory => paths::ADMIN_INVENTORY,
            Page::AdminMyBusiness => paths::ADMIN_MY_BUSINESS,
            Page::AdminBusinessApplications => paths::ADMIN_BUSINESS_APPLICATIONS,
            Page::AdminReports => paths::ADMIN_REPORTS,
            Page::BusinessDashboard => paths::BUSINESS_DASHBOARD,
            Page::BusinessMyBusiness => paths::BUSINESS_MY_BUSINESS,
            Page::BusinessInventory => paths::BUSINESS_INVENTORY,
            Page::Settings => paths::SETTINGS,
        }
    }

    /// The access check the page applies before rendering, if any.
    pub fn access(&self) -> Option<Access> {
        match self {
            Page::AdminDashboard | Page::AdminInventory | Page::BusinessInventory => {
                Some(Access::AnyAdmin)
            }
            Page::AdminTires | Page::AdminBusinessApplications | Page::AdminReports => {
                Some(Access::SuperAdmin)
            }
            Page::AdminMyBusiness | Page::BusinessMyBusiness | Page::BusinessDashboard => {
                Some(Access::BusinessAdmin)
            }
            Page::Settings => Some(Access::Authenticated),
            _ => None,
        }
    }
}

/// PageContext
///
/// The services a renderer works with, passed explicitly instead of read from globals.
#[derive(Clone)]
pub struct PageContext {
    pub router: Router,
    pub api: ApiClient,
    pub session: SessionStore,
    pub tracker: InteractionTracker,
}

/// PageRenderer
///
/// Draws a page. Runs on a spawned task per navigation; an error is logged and the
/// previously rendered output stays. A late result from a page the user already left is
/// not suppressed.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, page: Page, ctx: PageContext) -> anyhow::Result<()>;
}
