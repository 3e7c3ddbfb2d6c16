use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Env;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "roadfy_client=debug,roadfy=debug,reqwest=info";

/// init
///
/// Installs the global subscriber: pretty output locally, JSON in production for log
/// aggregation. `RUST_LOG` overrides the default filter. Returns false if a subscriber was
/// already installed (tests install their own).
pub fn init(env: &Env) -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let result = match env {
        Env::Local => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
        Env::Production => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };

    result.is_ok()
}
