/*
[INPUT]:  RPC method name and request params
[OUTPUT]: Serialized JSON-RPC 2.0 request body
[POS]:    HTTP layer - request envelope construction
[UPDATE]: When the envelope format changes
*/

use serde::Serialize;

use super::error::{EndpointError, Result};

pub const JSONRPC_VERSION: &str = "2.0";

/// Requests are never pipelined, so every envelope carries the same id.
pub const REQUEST_ID: u64 = 1;

/// JSON-RPC request envelope; field order is the wire order
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest<'a, P: Serialize + ?Sized> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub params: Option<&'a P>,
    pub id: u64,
}

impl<'a, P: Serialize + ?Sized> RpcRequest<'a, P> {
    pub fn new(method: &'a str, params: Option<&'a P>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method,
            params,
            id: REQUEST_ID,
        }
    }
}

/// Serialize the envelope for `method`; absent params are sent as `null`
pub fn build_request_envelope<P: Serialize + ?Sized>(
    method: &str,
    params: Option<&P>,
) -> Result<Vec<u8>> {
    serde_json::to_vec(&RpcRequest::new(method, params)).map_err(EndpointError::Envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::collections::HashMap;

    #[test]
    fn test_envelope_exact_bytes() {
        let body = build_request_envelope("test", Some("empty")).unwrap();
        assert_eq!(
            body,
            br#"{"jsonrpc":"2.0","method":"test","params":"empty","id":1}"#
        );
    }

    #[test]
    fn test_envelope_absent_params_is_null() {
        let body = build_request_envelope::<Value>("SportsAPING/v1.0/listEventTypes", None).unwrap();
        let decoded: Value = serde_json::from_slice(&body).unwrap();

        let fields = decoded.as_object().unwrap();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields["params"], Value::Null);
        assert_eq!(fields["id"], json!(1));
    }

    #[test]
    fn test_envelope_is_deterministic() {
        let mut params = HashMap::new();
        params.insert("filter", json!({"eventTypeIds": ["1", "7"]}));
        params.insert("maxResults", json!(100));
        params.insert("locale", json!("en"));

        let first = build_request_envelope("SportsAPING/v1.0/listMarketCatalogue", Some(&json!(params))).unwrap();
        for _ in 0..10 {
            let again =
                build_request_envelope("SportsAPING/v1.0/listMarketCatalogue", Some(&json!(params)))
                    .unwrap();
            assert_eq!(again, first);
        }
    }

    #[test]
    fn test_envelope_rejects_unserializable_params() {
        let mut params = HashMap::new();
        params.insert(vec![1u8], "non-string key");

        let err = build_request_envelope("test", Some(&params)).unwrap_err();
        assert!(matches!(err, EndpointError::Envelope(_)));
    }
}
