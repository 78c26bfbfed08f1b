/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public exchange JSON-RPC adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod client;
pub mod http;
pub mod types;

// Re-export commonly used types from client
pub use client::{ApiClient, ClientConfig, ClientContext, Locale};

// Re-export commonly used types from http
pub use http::{
    ApplicationError,
    ClientCertificate,
    Endpoint,
    EndpointDescriptor,
    EndpointError,
    ErrorKind,
    ErrorPolicy,
    Processed,
    ReqwestTransport,
    Result,
    Transport,
    TransportError,
    process,
};

// Re-export all types
pub use types::*;
