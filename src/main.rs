use async_trait::async_trait;
use roadfy_client::{
    App, AppConfig, Page, PageContext, PageRenderer,
    router::dom::{ClickEvent, Element, Window},
    telemetry,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// ConsoleRenderer
///
/// Headless page renderer: fetches the resource each page shows and prints it.
struct ConsoleRenderer;

impl ConsoleRenderer {
    fn show(title: &str, value: &Value) {
        let body = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        println!("== {} ==\n{}", title, body);
    }

    fn show_error(title: &str, error: &roadfy_client::ApiError) {
        println!("== {} ==\nError: {}", title, error);
    }

    async fn fetch(ctx: &PageContext, title: &str, endpoint: &str) {
        match ctx.api.get(endpoint).await {
            Ok(value) => Self::show(title, &value),
            Err(e) => Self::show_error(title, &e),
        }
    }
}

#[async_trait]
impl PageRenderer for ConsoleRenderer {
    async fn render(&self, page: Page, ctx: PageContext) -> anyhow::Result<()> {
        let params = ctx.router.get_params();

        match page {
            Page::Home => Self::fetch(&ctx, "Inicio", "/tires?limit=6").await,
            Page::Tires => Self::fetch(&ctx, "Llantas", "/tires").await,
            Page::TireDetail => {
                let id = ctx.router.get_route_id();
                ctx.tracker.view_tire(&id);
                Self::fetch(&ctx, "Llanta", &format!("/tires/{}", id)).await;
                Self::fetch(&ctx, "Inventario", &format!("/inventory?tire_id={}", id)).await;
            }
            Page::TireComparison => match params.get("tire_id") {
                Some(id) => {
                    ctx.tracker.compare_tire(id);
                    Self::fetch(&ctx, "Comparación", &format!("/inventory?tire_id={}", id)).await;
                }
                None => println!("== Comparación ==\nSelecciona una llanta"),
            },
            Page::TireMultiComparison => {
                let ids = params.get("tire_ids").cloned().unwrap_or_default();
                for id in ids.split(',').filter(|id| !id.is_empty()) {
                    Self::fetch(&ctx, "Llanta", &format!("/tires/{}", id)).await;
                }
            }
            Page::Businesses => Self::fetch(&ctx, "Negocios", "/businesses").await,
            Page::BusinessDetail => {
                let id = ctx.router.get_route_id();
                ctx.tracker.view_business(&id);
                Self::fetch(&ctx, "Negocio", &format!("/businesses/{}", id)).await;
                Self::fetch(&ctx, "Reseñas", &format!("/reviews/business/{}", id)).await;
            }
            Page::Login | Page::Register | Page::ForgotPassword | Page::RequestBusiness => {
                println!("== {} ==\n(formulario)", page.path());
            }
            Page::ResetPassword => match (params.get("email"), params.get("token")) {
                (Some(email), Some(token)) => {
                    let outcome = ctx.session.verify_reset_token(email, token).await;
                    Self::show("Restablecer contraseña", &serde_json::to_value(&outcome)?);
                }
                _ => println!("== Restablecer contraseña ==\nEnlace inválido"),
            },
            Page::AdminDashboard | Page::BusinessDashboard => {
                Self::fetch(&ctx, "Panel", "/stats/dashboard").await
            }
            Page::AdminTires => Self::fetch(&ctx, "Administrar llantas", "/tires?limit=1000").await,
            Page::AdminInventory | Page::BusinessInventory => {
                Self::fetch(&ctx, "Inventario", "/inventory").await
            }
            Page::AdminMyBusiness | Page::BusinessMyBusiness => {
                let business_id = ctx.session.ensure_user().await.and_then(|u| u.business_id);
                match business_id {
                    Some(id) => Self::fetch(&ctx, "Mi negocio", &format!("/businesses/{}", id)).await,
                    None => println!("== Mi negocio ==\nSin negocio asignado"),
                }
            }
            Page::AdminBusinessApplications => {
                Self::fetch(&ctx, "Solicitudes", "/users/pending-business-requests").await
            }
            Page::AdminReports => {
                Self::fetch(&ctx, "Reportes", "/stats/reports/most-searched-tires").await
            }
            Page::Settings => match ctx.session.ensure_user().await {
                Some(user) => Self::show("Configuración", &serde_json::to_value(&user)?),
                None => println!("== Configuración ==\nSin sesión"),
            },
        }

        Ok(())
    }
}

/// main
///
/// Headless shell around the client core. Each stdin line is an in-app path (clicked as
/// an internal link) or one of: `back`, `forward`, `login <email> <password>`, `logout`,
/// `whoami`, `quit`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Configuration & Environment Loading
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging (pretty locally, JSON in production)
    telemetry::init(&config.env);
    tracing::info!("RoadFY client starting in {:?} mode against {}", config.env, config.api_base_url);

    // 3. Host + Services
    let window = Window::new("/");
    let app = App::new(config, window.history());

    // 4. Routes, then the router
    app.register_routes(Arc::new(ConsoleRenderer));
    app.start(window.document.as_ref());

    // 5. Input loop
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            ["back"] => {
                window.back();
            }
            ["forward"] => {
                window.forward();
            }
            ["login", email, password] => {
                let outcome = app.session.login(email, password).await;
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            }
            ["logout"] => app.session.logout(),
            ["whoami"] => match app.session.current_user() {
                Some(user) => println!("{} ({})", user.email, user.role.as_str()),
                None => println!("(anónimo)"),
            },
            [path] if path.starts_with('/') => {
                window.click(ClickEvent::on(Element::link(path)));
            }
            _ => println!("Comando desconocido: {}", line),
        }
    }

    Ok(())
}
