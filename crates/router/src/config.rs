use serde::Deserialize;

const DEFAULT_NOT_FOUND_BODY: &str = "404 Not Found";

/// Dispatch options of a [`Router`](crate::Router).
///
/// Deserializable so applications can keep it next to the rest of their settings:
///
/// ```
/// # use micro_router::RouterConfig;
/// let config: RouterConfig = serde_json::from_str(r#"{"not_found_body": "<h1>gone</h1>"}"#).unwrap();
/// assert_eq!(config.not_found_body(), "<h1>gone</h1>");
/// assert!(!config.strip_trailing_slash);
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RouterConfig {
    /// Body of the 404 response, `"404 Not Found"` when unset
    pub not_found_body: Option<String>,

    /// Match `/users/` as `/users`
    pub strip_trailing_slash: bool,
}

impl RouterConfig {
    pub fn not_found_body(&self) -> &str {
        self.not_found_body.as_deref().unwrap_or(DEFAULT_NOT_FOUND_BODY)
    }
}
