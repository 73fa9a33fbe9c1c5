//! dlphost: the DLP native messaging host.
//!
//! This crate wires the transport framing, policy engine, audit logger, and
//! host loop into the process behind the browser extension. It is consumed
//! by the binary (`main.rs`) and by integration tests, which drive the loop
//! over in-memory streams instead of stdin/stdout.

pub mod audit;
pub mod discovery;
pub mod host;
pub mod policy;
pub mod transport;
