use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

pub const ACCESS_COOKIE_NAME: &str = "accessToken";
pub const REFRESH_COOKIE_NAME: &str = "refreshToken";

fn build(name: &'static str, value: String, max_age: Duration) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);
    cookie.set_http_only(true);
    cookie.set_secure(true);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_path("/");
    cookie.set_max_age(max_age);
    cookie
}

/// Set both token cookies on the jar.
pub fn with_auth_cookies(
    jar: CookieJar,
    access_token: &str,
    access_ttl: std::time::Duration,
    refresh_token: &str,
    refresh_ttl: std::time::Duration,
) -> CookieJar {
    jar.add(build(
        ACCESS_COOKIE_NAME,
        access_token.to_string(),
        Duration::seconds(access_ttl.as_secs() as i64),
    ))
    .add(build(
        REFRESH_COOKIE_NAME,
        refresh_token.to_string(),
        Duration::seconds(refresh_ttl.as_secs() as i64),
    ))
}

/// Remove both token cookies (logout).
pub fn without_auth_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(ACCESS_COOKIE_NAME).path("/"))
        .remove(Cookie::build(REFRESH_COOKIE_NAME).path("/"))
}

#[cfg(test)]
mod cookie_tests {
    use super::*;

    #[test]
    fn auth_cookies_are_http_only_and_secure() {
        let jar = with_auth_cookies(
            CookieJar::new(),
            "acc",
            std::time::Duration::from_secs(300),
            "ref",
            std::time::Duration::from_secs(3600),
        );
        let access = jar.get(ACCESS_COOKIE_NAME).expect("access cookie set");
        let refresh = jar.get(REFRESH_COOKIE_NAME).expect("refresh cookie set");
        assert_eq!(access.value(), "acc");
        assert_eq!(refresh.value(), "ref");
        for c in [access, refresh] {
            assert_eq!(c.http_only(), Some(true));
            assert_eq!(c.secure(), Some(true));
            assert_eq!(c.path(), Some("/"));
        }
        assert_eq!(
            access.max_age(),
            Some(Duration::seconds(300))
        );
    }

    #[test]
    fn removal_clears_both_cookies() {
        let jar = with_auth_cookies(
            CookieJar::new(),
            "acc",
            std::time::Duration::from_secs(300),
            "ref",
            std::time::Duration::from_secs(3600),
        );
        let jar = without_auth_cookies(jar);
        assert!(jar.get(ACCESS_COOKIE_NAME).is_none());
        assert!(jar.get(REFRESH_COOKIE_NAME).is_none());
    }
}
