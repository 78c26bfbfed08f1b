/*
[INPUT]:  Raw JSON elements and hydration context
[OUTPUT]: Hydrated resources (generic envelope or serde-typed values)
[POS]:    Data layer - resource constructors injected into the response processor
[UPDATE]: When resource metadata or constructor helpers change
*/

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::http::EndpointError;

/// Side-channel data handed to every resource constructor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HydrationContext {
    /// Seconds the request spent on the transport
    pub elapsed_time: f64,
    pub datetime_created: DateTime<Utc>,
}

impl HydrationContext {
    pub fn new(elapsed_time: f64) -> Self {
        Self {
            elapsed_time,
            datetime_created: Utc::now(),
        }
    }
}

/// Hydrated resource keeping the raw element and its timing metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseResource {
    pub elapsed_time: f64,
    pub datetime_created: DateTime<Utc>,
    pub datetime_updated: DateTime<Utc>,
    pub data: Value,
}

impl BaseResource {
    /// Constructor usable with [`crate::http::process`]
    pub fn from_raw(data: Value, context: &HydrationContext) -> Result<Self, EndpointError> {
        Ok(Self {
            elapsed_time: context.elapsed_time,
            datetime_created: context.datetime_created,
            datetime_updated: context.datetime_created,
            data,
        })
    }

    /// Look up a top-level field of the raw element
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Record that the resource was refreshed now
    pub fn touch(&mut self) {
        self.datetime_updated = Utc::now();
    }

    /// Raw element serialized back to a JSON string
    pub fn json(&self) -> String {
        self.data.to_string()
    }
}

/// Constructor deserializing each element into `T`
pub fn typed<T, X>(data: Value, _context: &X) -> Result<T, EndpointError>
where
    T: DeserializeOwned,
    X: ?Sized,
{
    serde_json::from_value(data).map_err(EndpointError::Hydration)
}
