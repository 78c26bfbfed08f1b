/*
[INPUT]:  YAML configuration file or programmatic settings
[OUTPUT]: Validated client configuration
[POS]:    Configuration layer - client context setup
[UPDATE]: When adding new configuration options or locales
*/

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::http::{ClientCertificate, EndpointError, Result};

/// Exchange jurisdiction, selects the base API URI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    #[serde(alias = "uk")]
    Global,
    Italy,
    Spain,
    Australia,
}

impl Locale {
    pub fn api_uri(&self) -> &'static str {
        match self {
            Locale::Global => "https://api.betfair.com/exchange/",
            Locale::Italy => "https://api.betfair.it/exchange/",
            Locale::Spain => "https://api.betfair.es/exchange/",
            Locale::Australia => "https://api-au.betfair.com/exchange/",
        }
    }
}

/// Certificate and key file locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Application key sent with every request
    pub app_key: String,
    /// Session token obtained by a separate login flow
    #[serde(default)]
    pub session_token: Option<String>,
    #[serde(default)]
    pub locale: Locale,
    /// Overrides the locale's base URI, e.g. for a test exchange
    #[serde(default)]
    pub api_uri: Option<String>,
    #[serde(default)]
    pub certs: Option<CertConfig>,
    /// Default for callers choosing between raw and hydrated responses
    #[serde(default)]
    pub lightweight: bool,
}

impl ClientConfig {
    pub fn new(app_key: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            session_token: None,
            locale: Locale::default(),
            api_uri: None,
            certs: None,
            lightweight: false,
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_api_uri(mut self, api_uri: impl Into<String>) -> Self {
        self.api_uri = Some(api_uri.into());
        self
    }

    pub fn with_certs(mut self, cert_path: impl Into<PathBuf>, key_path: impl Into<PathBuf>) -> Self {
        self.certs = Some(CertConfig {
            cert_path: cert_path.into(),
            key_path: key_path.into(),
        });
        self
    }

    pub fn with_lightweight(mut self, lightweight: bool) -> Self {
        self.lightweight = lightweight;
        self
    }

    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|err| EndpointError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path)
            .map_err(|err| EndpointError::Config(format!("{}: {err}", path.display())))?;
        Self::from_yaml_str(&yaml)
    }

    /// Base URI all endpoint paths are appended to
    pub fn base_api_uri(&self) -> &str {
        self.api_uri.as_deref().unwrap_or_else(|| self.locale.api_uri())
    }

    pub fn cert(&self) -> Option<ClientCertificate> {
        self.certs
            .as_ref()
            .map(|certs| ClientCertificate::new(&certs.cert_path, &certs.key_path))
    }

    pub fn validate(&self) -> Result<()> {
        if self.app_key.trim().is_empty() {
            return Err(EndpointError::Config("app_key cannot be empty".to_string()));
        }

        if let Some(api_uri) = &self.api_uri {
            let parsed = Url::parse(api_uri)
                .map_err(|err| EndpointError::Config(format!("api_uri {api_uri}: {err}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(EndpointError::Config(
                    "api_uri must start with http:// or https://".to_string(),
                ));
            }
        }

        Ok(())
    }
}
