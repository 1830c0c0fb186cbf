//! Schema validation for untrusted upstream JSON

mod validator;

pub use validator::{validate, Field, FieldType, Presence, Schema};
