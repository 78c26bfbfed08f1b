/*
[INPUT]:  Decoded response bodies and a resource constructor
[OUTPUT]: Raw bodies (lightweight) or hydrated resources shaped like the input
[POS]:    HTTP layer - response shape normalization and hydration
[UPDATE]: When the response wrapper format or hydration contract changes
*/

use serde_json::Value;

use super::error::ShapeError;

/// Shape of a response body, resolved once before hydration
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// Bare JSON array
    List(Vec<Value>),
    /// `{"result": [...]}`
    ResultList(Vec<Value>),
    /// `{"result": {...}}`
    ResultObject(Value),
    /// Object without a `result` key
    Object(Value),
}

impl ResponseShape {
    pub fn normalize(body: Value) -> Result<Self, ShapeError> {
        match body {
            Value::Array(items) => Ok(ResponseShape::List(items)),
            Value::Object(mut fields) => match fields.remove("result") {
                Some(Value::Array(items)) => Ok(ResponseShape::ResultList(items)),
                Some(Value::Null) => Err(ShapeError::NullResult),
                Some(result) => Ok(ResponseShape::ResultObject(result)),
                None => Ok(ResponseShape::Object(Value::Object(fields))),
            },
            other => Err(ShapeError::Unsupported(json_type(&other))),
        }
    }

    /// List-shaped bodies hydrate into lists, whatever their length
    pub fn is_list(&self) -> bool {
        matches!(self, ResponseShape::List(_) | ResponseShape::ResultList(_))
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Output of [`process`]
#[derive(Debug, Clone, PartialEq)]
pub enum Processed<R> {
    /// Lightweight mode: the body as received
    Raw(Value),
    List(Vec<R>),
    Single(R),
}

impl<R> Processed<R> {
    pub fn is_raw(&self) -> bool {
        matches!(self, Processed::Raw(_))
    }

    pub fn into_raw(self) -> Option<Value> {
        match self {
            Processed::Raw(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_list(self) -> Option<Vec<R>> {
        match self {
            Processed::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn into_single(self) -> Option<R> {
        match self {
            Processed::Single(item) => Some(item),
            _ => None,
        }
    }
}

/// Hydrate `body` through `construct`, or return it untouched when
/// `lightweight` is set.
///
/// Constructor errors are returned as produced; only body shapes that cannot
/// be normalized are reported through `ShapeError`.
pub fn process<R, X, E, F>(
    body: Value,
    mut construct: F,
    context: &X,
    lightweight: bool,
) -> Result<Processed<R>, E>
where
    X: ?Sized,
    F: FnMut(Value, &X) -> Result<R, E>,
    E: From<ShapeError>,
{
    if lightweight {
        return Ok(Processed::Raw(body));
    }

    match ResponseShape::normalize(body)? {
        ResponseShape::List(items) | ResponseShape::ResultList(items) => items
            .into_iter()
            .map(|item| construct(item, context))
            .collect::<Result<Vec<_>, E>>()
            .map(Processed::List),
        ResponseShape::ResultObject(item) | ResponseShape::Object(item) => {
            construct(item, context).map(Processed::Single)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::error::EndpointError;
    use rstest::rstest;
    use serde_json::json;

    fn echo(value: Value, _: &()) -> Result<Value, EndpointError> {
        Ok(value)
    }

    #[rstest]
    #[case(json!([{}, {}]))]
    #[case(json!({"a": 1}))]
    #[case(json!({"result": [{}, {}]}))]
    #[case(json!({"result": {}}))]
    fn test_lightweight_returns_body(#[case] body: Value) {
        let processed = process(body.clone(), echo, &(), true).unwrap();
        assert_eq!(processed, Processed::Raw(body));
    }

    #[rstest]
    #[case(json!([]), 0)]
    #[case(json!([{}, {}]), 2)]
    #[case(json!({"result": [{}]}), 1)]
    #[case(json!({"result": [{}, {}]}), 2)]
    fn test_list_shapes_stay_lists(#[case] body: Value, #[case] len: usize) {
        let items = process(body, echo, &(), false).unwrap().into_list().unwrap();
        assert_eq!(items.len(), len);
    }

    #[rstest]
    #[case(json!({"result": {}}), json!({}))]
    #[case(json!({}), json!({}))]
    #[case(json!({"marketId": "1.23"}), json!({"marketId": "1.23"}))]
    fn test_single_shapes_unwrap(#[case] body: Value, #[case] expected: Value) {
        let item = process(body, echo, &(), false).unwrap().into_single().unwrap();
        assert_eq!(item, expected);
    }

    #[test]
    fn test_result_key_is_stripped_from_object() {
        let shape = ResponseShape::normalize(json!({"result": {"x": 1}, "id": 1})).unwrap();
        assert_eq!(shape, ResponseShape::ResultObject(json!({"x": 1})));
    }

    #[test]
    fn test_empty_list_never_calls_constructor() {
        let mut calls = 0;
        let processed = process(
            json!([]),
            |value: Value, _: &()| -> Result<Value, EndpointError> {
                calls += 1;
                Ok(value)
            },
            &(),
            false,
        )
        .unwrap();

        assert_eq!(processed, Processed::List(Vec::new()));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_context_reaches_constructor() {
        let processed = process(
            json!([{"id": 1}, {"id": 2}]),
            |value: Value, offset: &i64| -> Result<i64, EndpointError> {
                Ok(value["id"].as_i64().unwrap_or_default() + offset)
            },
            &10,
            false,
        )
        .unwrap();

        assert_eq!(processed, Processed::List(vec![11, 12]));
    }

    #[test]
    fn test_constructor_error_propagates() {
        #[derive(Debug, PartialEq)]
        enum HydrateError {
            Missing,
            Shape,
        }

        impl From<ShapeError> for HydrateError {
            fn from(_: ShapeError) -> Self {
                HydrateError::Shape
            }
        }

        let err = process(
            json!([{}]),
            |_: Value, _: &()| -> Result<(), HydrateError> { Err(HydrateError::Missing) },
            &(),
            false,
        )
        .unwrap_err();

        assert_eq!(err, HydrateError::Missing);
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!("text"))]
    #[case(json!(42))]
    #[case(json!({"result": null}))]
    fn test_unsupported_shapes(#[case] body: Value) {
        let err = process(body, echo, &(), false).unwrap_err();
        assert!(matches!(err, EndpointError::Shape(_)));
    }
}
