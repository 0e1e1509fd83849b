//! Server endpoint configuration.

use url::Url;

use crate::error::TransportError;

/// Where the game server listens.
///
/// The full URL for a user is `{ws|wss}://<host>/<path>/<user_id>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Host and optional port, e.g. `localhost:8000`.
    pub host: String,
    /// Path prefix, without leading or trailing slashes.
    pub path: String,
    /// Use `wss` instead of `ws`.
    pub secure: bool,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self { host: "localhost:8000".to_string(), path: "api/ws".to_string(), secure: false }
    }
}

impl Endpoint {
    /// Create an endpoint.
    pub fn new(host: impl Into<String>, path: impl Into<String>, secure: bool) -> Self {
        Self { host: host.into(), path: path.into(), secure }
    }

    /// URL a given user connects to.
    ///
    /// The user id becomes a single percent-encoded path segment, so ids
    /// containing `/` or `?` cannot escape it.
    pub fn url(&self, user_id: &str) -> Result<Url, TransportError> {
        if user_id.is_empty() {
            return Err(TransportError::InvalidEndpoint("user id is empty".to_string()));
        }

        let scheme = if self.secure { "wss" } else { "ws" };
        let mut url = Url::parse(&format!("{scheme}://{}/", self.host))
            .map_err(|e| TransportError::InvalidEndpoint(format!("{}: {e}", self.host)))?;

        if url.host_str().is_none_or(str::is_empty) {
            return Err(TransportError::InvalidEndpoint(format!("{}: missing host", self.host)));
        }

        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                TransportError::InvalidEndpoint(format!("{}: cannot carry a path", self.host))
            })?;
            segments.pop_if_empty();
            segments.extend(self.path.split('/').filter(|s| !s.is_empty()));
            segments.push(user_id);
        }

        Ok(url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_dev_server() {
        let url = Endpoint::default().url("alice").unwrap();
        assert_eq!(url.as_str(), "ws://localhost:8000/api/ws/alice");
    }

    #[test]
    fn secure_uses_wss() {
        let url = Endpoint::new("example.com", "ws", true).url("bob").unwrap();
        assert_eq!(url.as_str(), "wss://example.com/ws/bob");
    }

    #[test]
    fn stray_slashes_in_path_are_ignored() {
        let url = Endpoint::new("example.com", "/api//ws/", false).url("bob").unwrap();
        assert_eq!(url.as_str(), "ws://example.com/api/ws/bob");
    }

    #[test]
    fn user_id_is_one_segment() {
        let url = Endpoint::default().url("a/b?c").unwrap();
        assert_eq!(url.as_str(), "ws://localhost:8000/api/ws/a%2Fb%3Fc");
    }

    #[test]
    fn empty_user_is_rejected() {
        let result = Endpoint::default().url("");
        assert!(matches!(result, Err(TransportError::InvalidEndpoint(_))));
    }

    #[test]
    fn bad_host_is_rejected() {
        let result = Endpoint::new("exa mple:port", "api/ws", false).url("bob");
        assert!(matches!(result, Err(TransportError::InvalidEndpoint(_))));
    }
}
