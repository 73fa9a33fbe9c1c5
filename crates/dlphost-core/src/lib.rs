//! dlphost core: transport-agnostic protocol primitives, wire schema, and
//! the shared error surface.
//!
//! This crate defines the native-messaging wire contracts (frame header,
//! message envelope, telemetry/decision schema) used by the host process.
//! It intentionally carries no transport or runtime dependencies so the
//! same types can be exercised against in-memory streams in tests.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `DlpError`/`Result` so the host never
//! crashes on malformed input from the browser side.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;
pub mod schema;

/// Shared result type.
pub use error::{DlpError, Result};
