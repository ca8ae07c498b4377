//! Core types and rules for the missive contact form.
//!
//! This crate is deliberately free of HTTP and storage dependencies. Both the
//! intake endpoint and the submitting client depend on it, so the validation
//! rules they run are the same code on either side of the wire.

#![allow(async_fn_in_trait)]

pub mod delivery;
pub mod error;
pub mod input;
pub mod outcome;
pub mod sink;
pub mod validate;

pub use error::{Error, Result};
pub use input::{Field, SubmissionInput};
pub use outcome::{Rejection, Reply, SubmissionResult};
pub use validate::{FieldViolation, ViolationKind, general_message, validate};
