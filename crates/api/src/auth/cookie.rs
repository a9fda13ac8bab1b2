//! The `userToken` session cookie.

use axum_extra::extract::cookie::{Cookie, SameSite};

/// Name of the cookie carrying the identity token.
pub const AUTH_COOKIE: &str = "userToken";

/// Cookie holding a freshly issued token, valid for `max_age_secs`.
pub fn session_cookie(token: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(secure)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// Cookie that overwrites and immediately expires the session cookie.
pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(secure)
        .max_age(time::Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_http_only_and_lax() {
        let cookie = session_cookie("abc".into(), 604_800, false);
        let header = cookie.to_string();
        assert!(header.starts_with("userToken=abc"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("SameSite=Lax"));
        assert!(header.contains("Path=/"));
        assert!(header.contains("Max-Age=604800"));
        assert!(!header.contains("Secure"));
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let header = removal_cookie(true).to_string();
        assert!(header.starts_with("userToken=;"));
        assert!(header.contains("Max-Age=0"));
        assert!(header.contains("Secure"));
    }
}
