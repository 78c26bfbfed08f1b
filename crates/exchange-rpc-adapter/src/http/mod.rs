/*
[INPUT]:  Client context, endpoint descriptors and RPC calls
[OUTPUT]: Decoded bodies, classified errors and hydrated resources
[POS]:    HTTP layer - JSON-RPC request/response pipeline
[UPDATE]: When adding pipeline stages or changing transport behavior
*/

pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod response;
pub mod transport;

pub use error::{
    ApiFailure, ApplicationError, EndpointError, ErrorKind, ErrorPolicy, FailureCause, Result,
    ShapeError, TransportError,
};

pub use endpoint::{Endpoint, EndpointDescriptor};
pub use envelope::{RpcRequest, build_request_envelope};
pub use response::{Processed, ResponseShape, process};
pub use transport::{
    ClientCertificate, HttpRequest, HttpResponse, ReqwestTransport, Timeouts, Transport,
};
