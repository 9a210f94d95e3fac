//! Injected platform context.
//!
//! The core never reads ambient globals; the transport and cookie
//! collaborators receive everything environment-specific through
//! [`PlatformContext`]: the current origin (for the same-origin decision
//! behind CSRF header injection) and a cookie store.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use url::Url;

/// Read access to the environment's cookies.
pub trait CookieStore: fmt::Debug + Send + Sync {
    /// Returns the value of the cookie named `name`, if present.
    fn read(&self, name: &str) -> Option<String>;
}

/// In-memory [`CookieStore`], used in tests and embedded environments
/// without a browser-style cookie jar.
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    cookies: RwLock<HashMap<String, String>>,
}

impl MemoryCookieStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a cookie.
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), value.into());
    }
}

impl CookieStore for MemoryCookieStore {
    fn read(&self, name: &str) -> Option<String> {
        self.cookies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

/// Scheme/host/port triple identifying an origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    /// Url scheme.
    pub scheme: String,
    /// Host name.
    pub host: String,
    /// Port, defaulted from the scheme when the url names none.
    pub port: Option<u16>,
}

impl Origin {
    /// Extracts the origin of an absolute url. Returns `None` for relative
    /// or host-less urls.
    #[must_use]
    pub fn parse(url: &str) -> Option<Self> {
        let parsed = Url::parse(url).ok()?;
        Some(Self {
            scheme: parsed.scheme().to_string(),
            host: parsed.host_str()?.to_string(),
            port: parsed.port_or_known_default(),
        })
    }
}

/// Returns `true` when `url` shares scheme, host and port with `origin`.
#[must_use]
pub fn same_origin(url: &str, origin: &Origin) -> bool {
    Origin::parse(url).as_ref() == Some(origin)
}

/// Everything environment-specific the transport needs, injected at
/// construction.
#[derive(Debug, Clone, Default)]
pub struct PlatformContext {
    /// The origin requests are issued from; `None` means no same-origin
    /// decision can be made and only credentialed requests get CSRF headers.
    pub origin: Option<Origin>,
    /// Cookie store consulted for the CSRF cookie.
    pub cookie_store: Option<Arc<dyn CookieStore>>,
}

impl PlatformContext {
    /// Context with an origin and a cookie store.
    #[must_use]
    pub fn new(origin: Option<Origin>, cookie_store: Option<Arc<dyn CookieStore>>) -> Self {
        Self {
            origin,
            cookie_store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_parsing_defaults_ports() {
        let origin = Origin::parse("https://a.com/path?q=1").expect("origin");
        assert_eq!(origin.scheme, "https");
        assert_eq!(origin.host, "a.com");
        assert_eq!(origin.port, Some(443));
        assert!(Origin::parse("/relative").is_none());
    }

    #[test]
    fn same_origin_compares_scheme_host_port() {
        let origin = Origin::parse("http://a.com:8080").expect("origin");
        assert!(same_origin("http://a.com:8080/api/x", &origin));
        assert!(!same_origin("https://a.com:8080/x", &origin));
        assert!(!same_origin("http://b.com:8080/x", &origin));
        assert!(!same_origin("http://a.com:9090/x", &origin));
    }

    #[test]
    fn memory_cookie_store_round_trips() {
        let store = MemoryCookieStore::new();
        store.set("XSRF-TOKEN", "abc123");
        assert_eq!(store.read("XSRF-TOKEN"), Some("abc123".to_string()));
        assert_eq!(store.read("missing"), None);
    }
}
