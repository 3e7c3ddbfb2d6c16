use crate::auth::SessionStore;
use crate::paths;
use crate::router::{Navigator, ROOT};

/// Access
///
/// Who may see a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any logged-in user. Anonymous visitors are sent to the login page.
    Authenticated,
    BusinessAdmin,
    SuperAdmin,
    /// Business admins and super admins.
    AnyAdmin,
}

impl Access {
    pub fn allows(&self, session: &SessionStore) -> bool {
        if !session.is_authenticated() {
            return false;
        }
        match self {
            Access::Authenticated => true,
            Access::BusinessAdmin => session.is_business_admin(),
            Access::SuperAdmin => session.is_super_admin(),
            Access::AnyAdmin => session.is_business_admin() || session.is_super_admin(),
        }
    }

    /// Where a refused visitor lands. Role-gated pages send everyone, anonymous visitors
    /// included, home.
    pub fn redirect(&self) -> &'static str {
        match self {
            Access::Authenticated => paths::LOGIN,
            _ => ROOT,
        }
    }
}

/// enforce
///
/// Returns true when the page may render; otherwise navigates away and returns false.
pub fn enforce(session: &SessionStore, navigator: &dyn Navigator, access: Access) -> bool {
    if access.allows(session) {
        return true;
    }
    tracing::info!(?access, redirect = access.redirect(), "Access refused");
    navigator.navigate(access.redirect());
    false
}
