//! Observability setup shared by the workspace binaries. For now this is only
//! the initialization of the global tracing subscriber.
pub mod tracing;
