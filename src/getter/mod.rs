//! Source backends for chart archives
//!
//! A [`Getter`] downloads the bytes behind a URL. The fetch coordinator
//! picks one per URL scheme from a [`GetterSet`]:
//! - `http` / `https`: [`HttpGetter`], optional bearer token per repository
//! - `file`: [`FileGetter`], for repositories on local disk

mod file;
mod http;

pub use file::FileGetter;
pub use http::HttpGetter;

use crate::config::{Config, Settings};
use crate::error::{SkegError, SkegResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Abstract download backend
#[async_trait]
pub trait Getter: Send + Sync {
    /// URL schemes this getter serves
    fn schemes(&self) -> &'static [&'static str];

    /// Download the full body behind `url`
    async fn get(&self, url: &str) -> SkegResult<Vec<u8>>;

    /// Human-readable backend name for logs
    fn name(&self) -> &'static str;
}

/// The enabled getters, looked up by URL scheme
#[derive(Clone, Default)]
pub struct GetterSet {
    getters: Vec<Arc<dyn Getter>>,
}

impl GetterSet {
    /// An empty set (every URL fails with a network error)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a getter; later registrations win for shared schemes
    pub fn with(mut self, getter: Arc<dyn Getter>) -> Self {
        self.getters.insert(0, getter);
        self
    }

    /// The standard set: HTTP(S) with configured tokens, plus local files
    pub fn from_config(config: &Config, settings: &Settings) -> Self {
        let mut http = HttpGetter::new(settings.fetch_timeout, settings.max_archive_bytes);
        for repo in config.repositories.values() {
            if let Some(token) = &repo.token {
                http = http.with_token(&repo.url, token);
            }
        }

        Self::new()
            .with(Arc::new(FileGetter::new(settings.max_archive_bytes)))
            .with(Arc::new(http))
    }

    /// Find the getter for a URL's scheme
    pub fn for_url(&self, url: &str) -> SkegResult<Arc<dyn Getter>> {
        let scheme = url_scheme(url)
            .ok_or_else(|| SkegError::network(url, "URL has no scheme"))?
            .to_ascii_lowercase();

        self.getters
            .iter()
            .find(|g| g.schemes().contains(&scheme.as_str()))
            .cloned()
            .ok_or_else(|| {
                SkegError::network(url, format!("no getter registered for scheme '{}'", scheme))
            })
    }

    /// Names of registered getters, in lookup order
    pub fn names(&self) -> Vec<&'static str> {
        self.getters.iter().map(|g| g.name()).collect()
    }
}

fn url_scheme(url: &str) -> Option<&str> {
    url.split_once("://")
        .map(|(scheme, _)| scheme)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct Fixed(&'static [&'static str], &'static str);

    #[async_trait]
    impl Getter for Fixed {
        fn schemes(&self) -> &'static [&'static str] {
            self.0
        }

        async fn get(&self, _url: &str) -> SkegResult<Vec<u8>> {
            Ok(self.1.as_bytes().to_vec())
        }

        fn name(&self) -> &'static str {
            self.1
        }
    }

    #[test]
    fn url_scheme_parsing() {
        assert_eq!(url_scheme("https://a/b"), Some("https"));
        assert_eq!(url_scheme("file:///tmp/x"), Some("file"));
        assert_eq!(url_scheme("/tmp/x"), None);
        assert_eq!(url_scheme("://x"), None);
    }

    #[test]
    fn standard_set_covers_http_and_file() {
        let config = Config::default();
        let settings = Settings::from_config(&config, Some(PathBuf::from("/h")));
        let getters = GetterSet::from_config(&config, &settings);

        assert_eq!(getters.for_url("https://x/a.tgz").unwrap().name(), "http");
        assert_eq!(getters.for_url("HTTP://x/a.tgz").unwrap().name(), "http");
        assert_eq!(getters.for_url("file:///a.tgz").unwrap().name(), "file");
    }

    #[test]
    fn unsupported_scheme_is_network_error() {
        let getters = GetterSet::new().with(Arc::new(Fixed(&["http"], "one")));
        let err = getters.for_url("oci://registry/chart").err().unwrap();
        assert!(matches!(err, SkegError::Network { .. }));
        assert!(err.to_string().contains("oci"));
    }

    #[tokio::test]
    async fn later_registration_wins() {
        let getters = GetterSet::new()
            .with(Arc::new(Fixed(&["http"], "first")))
            .with(Arc::new(Fixed(&["http"], "second")));

        let getter = getters.for_url("http://x").unwrap();
        assert_eq!(getter.get("http://x").await.unwrap(), b"second");
        assert_eq!(getters.names(), vec!["second", "first"]);
    }
}
