pub mod auth;
pub mod clase;
pub mod cliente;
pub mod config;
pub mod health;
pub mod ping;
pub mod profesional;
pub mod token;
pub mod usuario;

/// Parse a boolean query parameter the way HTML forms and the frontend send it.
pub(crate) fn parse_query_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
