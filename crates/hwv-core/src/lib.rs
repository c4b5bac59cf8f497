//! # hwv-core
//!
//! Core types shared by every hardware survey crate:
//! - Persisted entities (`HardwareSurveySubmission`, `HardwareDisplayModel`)
//! - Validation error records and the field-error projection used on the wire
//! - The default survey document shape the embedded schema is generated from
//! - Device-key extraction from untyped payloads
//! - Submission ID formatting

pub mod entities;
pub mod enums;
pub mod ids;
pub mod survey;
pub mod validation;
