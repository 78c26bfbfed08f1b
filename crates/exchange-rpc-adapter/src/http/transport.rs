/*
[INPUT]:  Prepared HTTP requests (URL, body, headers, certificate, timeouts)
[OUTPUT]: Raw HTTP responses or transport errors
[POS]:    HTTP layer - blocking transport seam and reqwest implementation
[UPDATE]: When changing TLS setup, timeout handling or the transport contract
*/

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use tokio::runtime::{Builder, Runtime};

use super::error::TransportError;

/// Client certificate and private key, both PEM encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCertificate {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

impl ClientCertificate {
    pub fn new(cert_path: impl Into<PathBuf>, key_path: impl Into<PathBuf>) -> Self {
        Self {
            cert_path: cert_path.into(),
            key_path: key_path.into(),
        }
    }

    /// Read certificate and key into one PEM bundle
    pub fn read_pem(&self) -> Result<Vec<u8>, TransportError> {
        let mut pem = read_file(&self.cert_path)?;
        if !pem.ends_with(b"\n") {
            pem.push(b'\n');
        }
        pem.extend(read_file(&self.key_path)?);
        Ok(pem)
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, TransportError> {
    fs::read(path).map_err(|source| TransportError::Certificate {
        path: path.to_path_buf(),
        source,
    })
}

/// Connect and read budgets, bounded independently
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeouts {
    pub connect: Duration,
    pub read: Duration,
}

/// A single outgoing HTTP request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
    pub cert: Option<ClientCertificate>,
    pub timeouts: Timeouts,
}

/// Status and raw body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking HTTP primitive used by endpoints
///
/// Implementations must not retry; a failed attempt is reported as is.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Default transport backed by reqwest
///
/// A client is built per call so each request gets its own certificate and
/// timeout pair and no connection is shared between calls. The call blocks
/// on a current-thread runtime; it must not be made from inside an async
/// task (use `spawn_blocking` there).
///
/// The read timeout bounds each wait for bytes from the server, not the
/// whole exchange, so a slow but steady body is not cut off.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport;

impl ReqwestTransport {
    pub fn new() -> Self {
        Self
    }

    fn build_client(&self, request: &HttpRequest) -> Result<Client, TransportError> {
        let mut builder = Client::builder()
            .use_rustls_tls()
            .connect_timeout(request.timeouts.connect)
            .read_timeout(request.timeouts.read);

        if let Some(cert) = &request.cert {
            let identity = reqwest::Identity::from_pem(&cert.read_pem()?)
                .map_err(|err| TransportError::Tls(err.to_string()))?;
            builder = builder.identity(identity);
        }

        Ok(builder.build()?)
    }
}

fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| TransportError::InvalidHeader(name.clone()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| TransportError::InvalidHeader(name.clone()))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

fn runtime() -> Result<Runtime, TransportError> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(TransportError::Runtime)
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let headers = header_map(&request.headers)?;
        let runtime = runtime()?;

        runtime.block_on(async move {
            let client = self.build_client(&request)?;
            let HttpRequest { method, url, body, .. } = request;
            let response = client
                .request(method, &url)
                .headers(headers)
                .body(body)
                .send()
                .await?;

            let status = response.status().as_u16();
            let body = response.bytes().await?.to_vec();
            Ok::<_, TransportError>(HttpResponse { status, body })
        })
    }
}
