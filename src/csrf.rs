use crate::error::{ErrorKind, Result};
use percent_encoding::percent_decode_str;

pub const DEFAULT_CSRF_COOKIE: &str = "csrftoken";

/// Header the storefront checks the token against.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Looks up `name` in a `Cookie`-style string (`a=1; b=2`) and percent-decodes
/// its value. The first matching cookie wins.
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .map(str::trim)
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| percent_decode_str(value).decode_utf8_lossy().into_owned())
}

/// Token extracted once at page load and attached to every mutating request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn from_cookies(cookies: &str, name: &str) -> Result<Self> {
        cookie_value(cookies, name)
            .filter(|v| !v.is_empty())
            .map(CsrfToken)
            .ok_or_else(|| ErrorKind::MissingCsrfToken(name.to_string()).into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
