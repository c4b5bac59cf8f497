//! # hwv-schema
//!
//! Submission schema handling for the hardware survey service.
//!
//! This crate provides:
//! - `SchemaProvider`: where the authoritative schema document comes from
//!   (built-in, file, or remote via `hwv-client`)
//! - `SchemaSession`: fetch-once, read-only schema cache for one session
//! - `validate`: the pure document validator used identically by the client
//!   and the server
//!
//! ## Architecture
//!
//! The built-in schema is generated from `hwv_core::survey::TranscodeSubmission`
//! with [`schemars::schema_for!`]. Validation runs `jsonschema` against an
//! untyped `serde_json::Value` and maps each error back to a line and column
//! in the submitted text.

mod document;
mod error;
mod locate;
mod provider;
mod session;
mod validator;

pub use document::{CompiledSchema, SchemaDocument};
pub use error::SchemaError;
pub use locate::{Located, Position, PositionIndex};
pub use provider::{EmbeddedSchemaProvider, FileSchemaProvider, SchemaProvider};
pub use session::SchemaSession;
pub use validator::validate;
