//! MaxKB REST API adapter

mod client;
mod envelope;
mod factory;
mod records;
mod shape;
mod transport;

pub use client::MaxKbClient;
pub use envelope::{Envelope, EnvelopeData, SUCCESS_CODE};
pub use shape::{shape_for, ApiShape, DatasetApi, UpstreamCall, WorkspaceApi};
pub use transport::{HttpMethod, ReqwestTransport, Transport, DEFAULT_TIMEOUT};

#[cfg(test)]
pub use transport::MockTransport;
