/*
[INPUT]:  Test configuration and canned transport outcomes
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for exchange-rpc-adapter tests

use std::sync::Mutex;

use exchange_rpc_adapter::http::{HttpRequest, HttpResponse};
use exchange_rpc_adapter::{ApiClient, ClientConfig, Transport, TransportError};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
#[allow(dead_code)]
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Transport replaying one canned outcome per call and recording requests
#[allow(dead_code)]
pub struct RecordingTransport {
    outcomes: Mutex<Vec<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

#[allow(dead_code)]
impl RecordingTransport {
    pub fn new(outcomes: Vec<Result<HttpResponse, TransportError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().rev().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn ok(status: u16, body: &str) -> Self {
        Self::new(vec![Ok(HttpResponse {
            status,
            body: body.as_bytes().to_vec(),
        })])
    }

    pub fn failing(err: TransportError) -> Self {
        Self::new(vec![Err(err)])
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.outcomes
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(TransportError::Connect("no canned outcome left".to_string())))
    }
}

/// Client pointed at the global exchange with a session token
#[allow(dead_code)]
pub fn test_client() -> ApiClient {
    ApiClient::new(ClientConfig::new("app_key").with_session_token(mock_session_token()))
}

/// Mock session token for testing
#[allow(dead_code)]
pub fn mock_session_token() -> String {
    "Kk0+ILEa/N6/9UOHFAg4Mz6XGUY0umeo2PXY0tIq+yM=".to_string()
}

/// Successful listEventTypes reply
#[allow(dead_code)]
pub const LIST_EVENT_TYPES: &str = r#"{
    "jsonrpc": "2.0",
    "result": [
        {"eventType": {"id": "1", "name": "Soccer"}, "marketCount": 2012},
        {"eventType": {"id": "7", "name": "Horse Racing"}, "marketCount": 301}
    ],
    "id": 1
}"#;

/// Reply carrying an application error
#[allow(dead_code)]
pub const INVALID_SESSION: &str = r#"{
    "jsonrpc": "2.0",
    "error": {
        "code": -32099,
        "message": "ANGX-0003",
        "data": {
            "APINGException": {
                "requestUUID": "prdang001-07091103-0003bc0a5d",
                "errorCode": "INVALID_SESSION_INFORMATION",
                "errorDetails": "The session token hasn't been provided"
            },
            "exceptionname": "APINGException"
        }
    },
    "id": 1
}"#;
