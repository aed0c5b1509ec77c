//! Observability module - request IDs on top of the tracing setup.

mod request_id;

pub use request_id::RequestIdMiddleware;
