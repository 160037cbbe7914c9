use axum::http::header;
use axum::http::HeaderMap;

pub const REFRESH_COOKIE_NAME: &str = "refresh_token";
pub const REFRESH_COOKIE_PATH: &str = "/api/v1/auth";

/// Builds and reads the `refresh_token` cookie.
///
/// The cookie is HttpOnly, Secure, SameSite=Strict and scoped to the auth routes so the
/// browser never sends it anywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshCookie {
    max_age_seconds: i64,
}

impl RefreshCookie {
    pub fn new(max_age_seconds: i64) -> Self {
        Self { max_age_seconds }
    }

    /// `Set-Cookie` value carrying a freshly issued refresh token.
    pub fn set(&self, token: &str) -> String {
        Self::build(token, self.max_age_seconds)
    }

    /// `Set-Cookie` value that makes the browser drop the cookie.
    pub fn clear(&self) -> String {
        Self::build("", 0)
    }

    fn build(value: &str, max_age_seconds: i64) -> String {
        format!(
            "{}={}; Max-Age={}; Path={}; HttpOnly; Secure; SameSite=Strict",
            REFRESH_COOKIE_NAME, value, max_age_seconds, REFRESH_COOKIE_PATH
        )
    }

    /// Refresh token from the request's `Cookie` headers, if present and non-empty.
    pub fn extract(headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|cookies| cookies.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, value)| *name == REFRESH_COOKIE_NAME && !value.is_empty())
            .map(|(_, value)| value.to_string())
    }
}
