//! Cookie parsing and building for authentication.

use axum::http::header;

/// Cookie name for the access token (short-lived, 5 minutes).
pub const ACCESS_COOKIE_NAME: &str = "access_token";

/// Cookie name for the refresh token (long-lived, 7 days).
pub const REFRESH_COOKIE_NAME: &str = "refresh_token";

// Every auth cookie carries these attributes. HttpOnly keeps the tokens out
// of script reach; SameSite=None requires Secure.
const COOKIE_ATTRIBUTES: &str = "HttpOnly; Secure; SameSite=None; Path=/";

/// Extract a cookie value from the Cookie header.
pub fn get_cookie<'a>(headers: &'a axum::http::HeaderMap, name: &str) -> Option<&'a str> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in cookie_header.split(';') {
        let part = part.trim();
        if let Some((key, value)) = part.split_once('=') {
            if key.trim() == name {
                return Some(value.trim());
            }
        }
    }
    None
}

/// Build a Set-Cookie value carrying a token.
pub fn auth_cookie(name: &str, token: &str, max_age: u64) -> String {
    format!("{}={}; {}; Max-Age={}", name, token, COOKIE_ATTRIBUTES, max_age)
}

/// Build a Set-Cookie value that clears a cookie.
pub fn clear_cookie(name: &str) -> String {
    format!("{}=; {}; Max-Age=0", name, COOKIE_ATTRIBUTES)
}
