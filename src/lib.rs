use std::sync::Arc;

// --- Module Structure ---

// Core client services.
pub mod api;
pub mod auth;
pub mod error;
pub mod router;
pub mod storage;

// Application shell around the core.
pub mod config;
pub mod guards;
pub mod models;
pub mod pages;
pub mod paths;
pub mod telemetry;
pub mod tracking;

// --- Public Re-exports ---

pub use api::{ApiClient, RequestOptions};
pub use auth::SessionStore;
pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use pages::{Page, PageContext, PageRenderer};
pub use router::{Navigator, Router};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreState};
pub use tracking::InteractionTracker;

use router::dom::EventTarget;
use router::history::History;

/// App
///
/// The running client: one store, one router, one HTTP client, one session. Built
/// explicitly and handed to whatever needs it, instead of living in globals.
///
/// Wiring order matters: the HTTP client only holds a weak router handle, so route
/// handlers may capture the client without creating a cycle.
#[derive(Clone)]
pub struct App {
    pub config: AppConfig,
    pub store: StoreState,
    pub router: Router,
    pub api: ApiClient,
    pub session: SessionStore,
    pub tracker: InteractionTracker,
}

impl App {
    /// new
    ///
    /// Uses a `FileStore` when the config names a session file, memory otherwise.
    pub fn new(config: AppConfig, history: Arc<dyn History>) -> Self {
        let store: StoreState = match &config.session_file {
            Some(path) => Arc::new(FileStore::open(path)),
            None => Arc::new(MemoryStore::new()),
        };
        Self::with_store(config, store, history)
    }

    pub fn with_store(config: AppConfig, store: StoreState, history: Arc<dyn History>) -> Self {
        let router = Router::new(history);
        let api = ApiClient::new(config.api_base_url.clone(), store.clone())
            .with_navigator(Arc::new(router.downgrade()));
        let session = SessionStore::new(api.clone(), store.clone());
        let tracker = InteractionTracker::new(api.clone());

        Self {
            config,
            store,
            router,
            api,
            session,
            tracker,
        }
    }

    pub fn context(&self) -> PageContext {
        PageContext {
            router: self.router.clone(),
            api: self.api.clone(),
            session: self.session.clone(),
            tracker: self.tracker.clone(),
        }
    }

    /// register_routes
    ///
    /// Installs every page of the URL scheme plus a `*` fallback that goes home. Access
    /// checks run synchronously before the renderer is spawned.
    pub fn register_routes(&self, renderer: Arc<dyn PageRenderer>) {
        for page in Page::ALL {
            let renderer = renderer.clone();
            let api = self.api.clone();
            let session = self.session.clone();
            let tracker = self.tracker.clone();

            self.router.route_async(page.path(), move |router: Router| {
                let allowed = page
                    .access()
                    .is_none_or(|access| guards::enforce(&session, &router, access));
                let renderer = renderer.clone();
                let ctx = PageContext {
                    router,
                    api: api.clone(),
                    session: session.clone(),
                    tracker: tracker.clone(),
                };
                async move {
                    if !allowed {
                        return Ok(());
                    }
                    renderer.render(page, ctx).await
                }
            });
        }

        self.router.route(router::WILDCARD, |router: &Router| {
            router.navigate(router::ROOT);
            Ok(())
        });

        tracing::info!(routes = ?self.router.routes(), "Routes registered");
    }

    /// start
    ///
    /// Initialises the router against the host's event target and renders the current
    /// location.
    pub fn start(&self, target: &dyn EventTarget) -> bool {
        self.router.init(target)
    }
}
