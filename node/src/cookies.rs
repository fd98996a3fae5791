//! Cookie adapters: the engine deals in opaque token strings; these
//! helpers bind them to `httpOnly` cookies scoped to the whole site.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use snackquest_types::SESSION_TTL_SECS;

pub const SESSION_COOKIE: &str = "sq_session";
pub const ADMIN_COOKIE: &str = "sq_admin";
pub const CHARACTER_COOKIE: &str = "sq_character";

pub fn session(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .path("/")
        .max_age(time::Duration::seconds(SESSION_TTL_SECS))
        .build()
}

pub fn admin(token: String) -> Cookie<'static> {
    Cookie::build((ADMIN_COOKIE, token))
        .http_only(true)
        .path("/")
        .build()
}

pub fn character(character_id: i64) -> Cookie<'static> {
    Cookie::build((CHARACTER_COOKIE, character_id.to_string()))
        .http_only(true)
        .path("/")
        .build()
}

/// Logout: expire the session, admin, and character-selection cookies in
/// one response. Expired cookies are added unconditionally; `remove`
/// would only emit removals for cookies present on the request.
pub fn clear_all(jar: CookieJar) -> CookieJar {
    let mut jar = jar;
    for name in [SESSION_COOKIE, ADMIN_COOKIE, CHARACTER_COOKIE] {
        let expired = Cookie::build((name, ""))
            .path("/")
            .max_age(time::Duration::ZERO)
            .build();
        jar = jar.add(expired);
    }
    jar
}
