//! The localized URL scheme. These paths are the contract between router registrations
//! and in-page links.

pub const HOME: &str = "/";
pub const TIRES: &str = "/llantas";
pub const TIRE_DETAIL: &str = "/llantas/:id";
pub const TIRE_COMPARISON: &str = "/llantas/comparar";
pub const TIRE_MULTI_COMPARISON: &str = "/llantas/comparar-multi";
pub const BUSINESSES: &str = "/negocios";
pub const BUSINESS_DETAIL: &str = "/negocios/:id";
pub const LOGIN: &str = "/iniciar-sesion";
pub const REGISTER: &str = "/registrarse";
pub const FORGOT_PASSWORD: &str = "/recuperar-contrasena";
pub const RESET_PASSWORD: &str = "/restablecer-contrasena";
pub const REQUEST_BUSINESS: &str = "/registrar-negocio";
pub const ADMIN_DASHBOARD: &str = "/administracion";
pub const ADMIN_TIRES: &str = "/administracion/llantas";
pub const ADMIN_INVENTORY: &str = "/administracion/inventario";
pub const ADMIN_MY_BUSINESS: &str = "/administracion/mi-negocio";
pub const ADMIN_BUSINESS_APPLICATIONS: &str = "/administracion/solicitudes-negocios";
pub const ADMIN_REPORTS: &str = "/administracion/reportes";
pub const BUSINESS_DASHBOARD: &str = "/admin/dashboard";
pub const BUSINESS_MY_BUSINESS: &str = "/admin/mi-negocio";
pub const BUSINESS_INVENTORY: &str = "/admin/inventario";
pub const SETTINGS: &str = "/configuracion";

pub fn tire_detail(id: &str) -> String {
    format!("{}/{}", TIRES, urlencoding::encode(id))
}

pub fn business_detail(id: &str) -> String {
    format!("{}/{}", BUSINESSES, urlencoding::encode(id))
}

/// Price comparison for one tire (`?tire_id=`).
pub fn tire_comparison(tire_id: &str) -> String {
    format!("{}?tire_id={}", TIRE_COMPARISON, urlencoding::encode(tire_id))
}

/// Side-by-side comparison; ids travel comma-separated in `tire_ids`.
pub fn tire_multi_comparison<S: AsRef<str>>(tire_ids: &[S]) -> String {
    if tire_ids.is_empty() {
        return TIRE_MULTI_COMPARISON.to_string();
    }
    let ids: Vec<&str> = tire_ids.iter().map(AsRef::as_ref).collect();
    format!("{}?tire_ids={}", TIRE_MULTI_COMPARISON, ids.join(","))
}

/// Admin dashboard opened on a given tab.
pub fn admin_tab(tab: &str) -> String {
    format!("{}?tab={}", ADMIN_DASHBOARD, urlencoding::encode(tab))
}

/// Link sent by the password recovery email.
pub fn reset_password(token: &str, email: &str) -> String {
    format!(
        "{}?token={}&email={}",
        RESET_PASSWORD,
        urlencoding::encode(token),
        urlencoding::encode(email)
    )
}
