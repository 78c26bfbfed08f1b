/*
[INPUT]:  Client context, endpoint descriptor, RPC method and params
[OUTPUT]: Decoded response bodies with elapsed time, or classified errors
[POS]:    HTTP layer - endpoint base shared by every API operation
[UPDATE]: When changing timeouts, error policy or the call cycle
*/

use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::ClientContext;
use crate::types::HydrationContext;

use super::envelope::build_request_envelope;
use super::error::{
    ApplicationError, EndpointError, ErrorKind, ErrorPolicy, FailureCause, Result, ShapeError,
};
use super::response::{Processed, process};
use super::transport::{HttpRequest, Timeouts, Transport};

/// Identity and policy of one remote operation family
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointDescriptor {
    /// Path appended to the client's base API URI
    pub uri: Option<String>,
    /// HTTP method requests are sent with; POST when unset
    pub method: Option<Method>,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub error_policy: ErrorPolicy,
}

impl Default for EndpointDescriptor {
    fn default() -> Self {
        Self {
            uri: None,
            method: None,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            read_timeout: Self::DEFAULT_READ_TIMEOUT,
            error_policy: ErrorPolicy::default(),
        }
    }
}

impl EndpointDescriptor {
    /// 3.05 seconds
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(3050);
    /// 16 seconds
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(16);

    pub fn new(uri: impl Into<String>, method: Method) -> Self {
        Self {
            uri: Some(uri.into()),
            method: Some(method),
            ..Default::default()
        }
    }

    /// Sports betting JSON-RPC endpoint
    pub fn betting() -> Self {
        Self::new("betting/json-rpc/v1", Method::POST)
    }

    /// Account JSON-RPC endpoint
    pub fn account() -> Self {
        Self::new("account/json-rpc/v1", Method::POST)
    }

    /// Scores JSON-RPC endpoint
    pub fn scores() -> Self {
        Self::new("scores/json-rpc/v1", Method::POST)
    }

    /// Plain REST endpoint; failures are never wrapped
    pub fn rest() -> Self {
        Self {
            error_policy: ErrorPolicy::Passthrough,
            ..Default::default()
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Wrap failures into `kind`
    pub fn with_error_kind(self, kind: ErrorKind) -> Self {
        self.with_error_policy(ErrorPolicy::Wrap(kind))
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: self.connect_timeout,
            read: self.read_timeout,
        }
    }
}

/// Endpoint bound to a client context
///
/// Holds no mutable state, so one instance can serve concurrent callers.
#[derive(Debug)]
pub struct Endpoint<'c, C: ClientContext + ?Sized> {
    client: &'c C,
    descriptor: EndpointDescriptor,
}

impl<'c, C: ClientContext + ?Sized> Endpoint<'c, C> {
    pub fn new(client: &'c C, descriptor: EndpointDescriptor) -> Self {
        Self { client, descriptor }
    }

    pub fn client(&self) -> &'c C {
        self.client
    }

    pub fn descriptor(&self) -> &EndpointDescriptor {
        &self.descriptor
    }

    pub fn connect_timeout(&self) -> Duration {
        self.descriptor.connect_timeout
    }

    pub fn read_timeout(&self) -> Duration {
        self.descriptor.read_timeout
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.descriptor.error_policy
    }

    /// Base API URI followed by the endpoint's path
    pub fn resource_url(&self) -> String {
        let base = self.client.base_api_uri();
        match &self.descriptor.uri {
            Some(uri) => format!("{base}{uri}"),
            None => base.to_string(),
        }
    }

    /// Descriptor's HTTP method, POST when none is set
    pub fn http_method(&self) -> Method {
        self.descriptor.method.clone().unwrap_or(Method::POST)
    }

    /// Serialize the JSON-RPC envelope for `method`
    pub fn build_request_envelope<P: Serialize + ?Sized>(
        &self,
        method: &str,
        params: Option<&P>,
    ) -> Result<Vec<u8>> {
        build_request_envelope(method, params)
    }

    /// Send `method` on the client's default session
    ///
    /// Returns the decoded body and the seconds spent waiting on the
    /// transport. Application errors inside the body are left for
    /// [`Endpoint::classify_application_error`].
    pub fn send<P: Serialize + ?Sized>(
        &self,
        method: &str,
        params: Option<&P>,
    ) -> Result<(Value, f64)> {
        self.send_with_session(method, params, self.client.session())
    }

    /// Send `method` on an explicit session
    pub fn send_with_session<P: Serialize + ?Sized>(
        &self,
        method: &str,
        params: Option<&P>,
        session: &dyn Transport,
    ) -> Result<(Value, f64)> {
        let url = self.resource_url();
        let body = self.build_request_envelope(method, params)?;
        let request = HttpRequest {
            method: self.http_method(),
            url,
            headers: self.client.request_headers(),
            body,
            cert: self.client.cert(),
            timeouts: self.descriptor.timeouts(),
        };

        debug!(url = %request.url, method, "sending request");
        let started = Instant::now();
        let outcome = session.execute(request);
        let elapsed = started.elapsed().as_secs_f64();

        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                warn!(method, elapsed, error = %err, "request failed");
                return Err(self.fail(method, params, FailureCause::Transport(err)));
            }
        };

        if !response.is_success() {
            warn!(method, status = response.status, "non-success status");
        }

        match serde_json::from_slice::<Value>(&response.body) {
            Ok(decoded) => {
                debug!(method, status = response.status, elapsed, "response received");
                Ok((decoded, elapsed))
            }
            Err(err) => {
                warn!(method, error = %err, "response is not valid JSON");
                Err(self.fail(method, params, FailureCause::Decode(err)))
            }
        }
    }

    /// Fail when a decoded body carries a non-null `error`
    ///
    /// A null body, a `null` result without an error, and a JSON-RPC body
    /// holding neither `result` nor `error` are rejected as invalid. Both
    /// outcomes follow the endpoint's error policy.
    pub fn classify_application_error(&self, body: &Value) -> Result<()> {
        self.classify(body, None, None)
    }

    fn classify(&self, body: &Value, method: Option<&str>, params: Option<Value>) -> Result<()> {
        if body.is_null() {
            return Err(self.reject(method, params, "empty response body"));
        }

        if let Some(error) = body.get("error").filter(|error| !error.is_null()) {
            let application = ApplicationError::from_error_value(error);
            warn!(method, error = %application, "application error in response");
            return Err(EndpointError::from_cause(
                self.descriptor.error_policy,
                method,
                params,
                FailureCause::Application(application),
            ));
        }

        match body.get("result") {
            Some(Value::Null) => Err(self.reject(
                method,
                params,
                "`result` is null and no `error` is present",
            )),
            None if body.get("jsonrpc").is_some() => Err(self.reject(
                method,
                params,
                "JSON-RPC response has neither `result` nor `error`",
            )),
            _ => Ok(()),
        }
    }

    fn reject(&self, method: Option<&str>, params: Option<Value>, reason: &str) -> EndpointError {
        warn!(method, reason, "invalid response body");
        EndpointError::from_cause(
            self.descriptor.error_policy,
            method,
            params,
            FailureCause::InvalidResponse(reason.to_string()),
        )
    }

    /// Send, classify and hydrate in one call
    ///
    /// The hydration context carries the measured elapsed time.
    pub fn invoke<P, R, E, F>(
        &self,
        method: &str,
        params: Option<&P>,
        construct: F,
        lightweight: bool,
    ) -> std::result::Result<Processed<R>, E>
    where
        P: Serialize + ?Sized,
        F: FnMut(Value, &HydrationContext) -> std::result::Result<R, E>,
        E: From<EndpointError> + From<ShapeError>,
    {
        let (body, elapsed_time) = self.send(method, params)?;
        let params_value = params.and_then(|params| serde_json::to_value(params).ok());
        self.classify(&body, Some(method), params_value)?;

        let context = HydrationContext {
            elapsed_time,
            datetime_created: Utc::now(),
        };
        process(body, construct, &context, lightweight)
    }

    fn fail<P: Serialize + ?Sized>(
        &self,
        method: &str,
        params: Option<&P>,
        cause: FailureCause,
    ) -> EndpointError {
        let params = params.and_then(|params| serde_json::to_value(params).ok());
        EndpointError::from_cause(self.descriptor.error_policy, Some(method), params, cause)
    }
}
