// Configuration for the storefront client
//
// Loaded in order of precedence:
// 1. CLI flags (native binary only)
// 2. Environment variables
// 3. Built-in defaults

use std::time::Duration;

use crate::csrf::DEFAULT_CSRF_COOKIE;

/// How long a removed cart row can be restored.
pub const UNDO_WINDOW: Duration = Duration::from_secs(7);

/// Delay between a successful undo and the page reload.
pub const RELOAD_DELAY: Duration = Duration::from_millis(300);

/// Flash messages start fading after this long.
pub const MESSAGE_FADE_DELAY: Duration = Duration::from_secs(5);

/// Matches the CSS opacity transition on flash messages.
pub const MESSAGE_FADE_DURATION: Duration = Duration::from_millis(500);

pub const TOAST_FADE_IN: Duration = Duration::from_millis(400);
pub const TOAST_HOLD: Duration = Duration::from_secs(2);
pub const TOAST_FADE_OUT: Duration = Duration::from_millis(400);

pub const REMOVE_TOAST_HOLD: Duration = Duration::from_millis(1500);

pub const LOGIN_PROMPT_DELAY: Duration = Duration::from_millis(500);
pub const LOGIN_PROMPT_HOLD: Duration = Duration::from_secs(3);

pub const ENV_BASE_URL: &str = "COURSE_SHOP_BASE_URL";
pub const ENV_COOKIE: &str = "COURSE_SHOP_COOKIE";
pub const ENV_CSRF_COOKIE: &str = "COURSE_SHOP_CSRF_COOKIE";
pub const ENV_TIMEOUT_SECS: &str = "COURSE_SHOP_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopConfig {
    /// Origin the storefront is served from. Empty in the browser, where
    /// requests go to the page's own origin.
    pub base_url: String,

    /// Raw `Cookie` header sent by the native client (session + csrf cookies).
    pub cookie: Option<String>,

    /// Name of the cookie carrying the CSRF token.
    pub csrf_cookie: String,

    /// Native request timeout.
    pub timeout: Duration,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            cookie: None,
            csrf_cookie: DEFAULT_CSRF_COOKIE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ShopConfig {
    /// Defaults overridden by whatever `COURSE_SHOP_*` variables are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ShopConfig::from_env`] with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url.trim().trim_end_matches('/').to_string();
        }
        if let Some(cookie) = lookup(ENV_COOKIE).filter(|v| !v.trim().is_empty()) {
            config.cookie = Some(cookie);
        }
        if let Some(name) = lookup(ENV_CSRF_COOKIE).filter(|v| !v.trim().is_empty()) {
            config.csrf_cookie = name.trim().to_string();
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            match secs.trim().parse::<u64>() {
                Ok(secs) => config.timeout = Duration::from_secs(secs),
                Err(_) => log::warn!("ignoring invalid {ENV_TIMEOUT_SECS}={secs:?}"),
            }
        }

        config
    }

    /// Config for a page served by the storefront itself.
    pub fn same_origin() -> Self {
        Self {
            base_url: String::new(),
            ..Self::default()
        }
    }

    /// Joins an endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn env_overrides_defaults() {
        let vars: HashMap<&str, &str> = [
            (ENV_BASE_URL, "https://shop.example/"),
            (ENV_COOKIE, "csrftoken=abc; sessionid=xyz"),
            (ENV_TIMEOUT_SECS, "5"),
        ]
        .into_iter()
        .collect();

        let config = ShopConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.base_url, "https://shop.example");
        assert_eq!(config.cookie.as_deref(), Some("csrftoken=abc; sessionid=xyz"));
        assert_eq!(config.csrf_cookie, "csrftoken");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_timeout_keeps_default() {
        let config = ShopConfig::from_lookup(|k| (k == ENV_TIMEOUT_SECS).then(|| "soon".to_string()));
        assert_eq!(config.timeout, ShopConfig::default().timeout);
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = ShopConfig {
            base_url: "http://localhost:8000/".to_string(),
            ..ShopConfig::default()
        };
        assert_eq!(config.endpoint("/cart/total/"), "http://localhost:8000/cart/total/");
        assert_eq!(ShopConfig::same_origin().endpoint("/cart/total/"), "/cart/total/");
    }
}
