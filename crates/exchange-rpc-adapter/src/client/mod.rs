/*
[INPUT]:  Client configuration (app key, session token, locale, certificates)
[OUTPUT]: Client context consumed by endpoints (base URI, headers, cert, session)
[POS]:    Client layer - state shared by every endpoint call
[UPDATE]: When header set, certificate handling or default session changes
*/

pub mod config;

use std::collections::BTreeMap;
use std::fmt;

use crate::http::{ClientCertificate, ReqwestTransport, Transport};

pub use config::{CertConfig, ClientConfig, Locale};

/// What an endpoint needs from the client it is bound to
///
/// Endpoints only read from the context, so implementations that are safe to
/// read concurrently can serve many threads.
pub trait ClientContext {
    fn base_api_uri(&self) -> &str;

    /// Headers attached to every request
    fn request_headers(&self) -> BTreeMap<String, String>;

    /// TLS client certificate, when one is configured
    fn cert(&self) -> Option<ClientCertificate>;

    /// Transport used when a call does not supply its own
    fn session(&self) -> &dyn Transport;
}

/// Client context built from a [`ClientConfig`]
pub struct ApiClient {
    config: ClientConfig,
    session: Box<dyn Transport>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("app_key", &self.config.app_key)
            .field("locale", &self.config.locale)
            .field("base_api_uri", &self.base_api_uri())
            .field("logged_in", &self.config.session_token.is_some())
            .finish()
    }
}

impl ApiClient {
    /// Create a client using the default reqwest transport
    pub fn new(config: ClientConfig) -> Self {
        Self::with_session(config, Box::new(ReqwestTransport::new()))
    }

    /// Create a client with a custom default transport
    pub fn with_session(config: ClientConfig, session: Box<dyn Transport>) -> Self {
        Self { config, session }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn lightweight(&self) -> bool {
        self.config.lightweight
    }

    pub fn session_token(&self) -> Option<&str> {
        self.config.session_token.as_deref()
    }

    /// Store a token obtained by an external login flow
    pub fn set_session_token(&mut self, token: impl Into<String>) {
        self.config.session_token = Some(token.into());
    }

    pub fn clear_session_token(&mut self) {
        self.config.session_token = None;
    }
}

impl ClientContext for ApiClient {
    fn base_api_uri(&self) -> &str {
        self.config.base_api_uri()
    }

    fn request_headers(&self) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert("X-Application".to_string(), self.config.app_key.clone());
        if let Some(token) = &self.config.session_token {
            headers.insert("X-Authentication".to_string(), token.clone());
        }
        headers.insert("content-type".to_string(), "application/json".to_string());
        headers.insert("Connection".to_string(), "keep-alive".to_string());
        headers
    }

    fn cert(&self) -> Option<ClientCertificate> {
        self.config.cert()
    }

    fn session(&self) -> &dyn Transport {
        self.session.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_without_session() {
        let client = ApiClient::new(ClientConfig::new("app_key"));
        let headers = client.request_headers();

        assert_eq!(headers.get("X-Application").map(String::as_str), Some("app_key"));
        assert_eq!(headers.get("content-type").map(String::as_str), Some("application/json"));
        assert!(!headers.contains_key("X-Authentication"));
    }

    #[test]
    fn test_session_token_lifecycle() {
        let mut client = ApiClient::new(ClientConfig::new("app_key"));
        client.set_session_token("token123");
        assert_eq!(client.session_token(), Some("token123"));
        assert_eq!(
            client.request_headers().get("X-Authentication").map(String::as_str),
            Some("token123")
        );

        client.clear_session_token();
        assert_eq!(client.session_token(), None);
    }

    #[test]
    fn test_cert_and_base_uri_from_config() {
        let config = ClientConfig::new("app_key")
            .with_locale(Locale::Italy)
            .with_certs("/certs/client.crt", "/certs/client.key");
        let client = ApiClient::new(config);

        assert_eq!(client.base_api_uri(), "https://api.betfair.it/exchange/");
        assert_eq!(
            client.cert(),
            Some(ClientCertificate::new("/certs/client.crt", "/certs/client.key"))
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let client = ApiClient::new(ClientConfig::new("app_key").with_session_token("secret"));
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("logged_in: true"));
    }
}
