pub mod dispatch;
pub mod envelope;
pub mod response;

pub use dispatch::{WireResponse, handle_request};
pub use envelope::{DecodeError, OperationRequest};
