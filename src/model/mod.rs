//! Data exchanged with the host at process start.
//!
//! This module provides:
//! - `Parameter`: Single- and multi-valued configuration parameters
//! - `Scheme` / `Argument`: The introspection document
//! - `InputDefinition`: One stanza to stream events for
//! - `Validation`: A candidate stanza awaiting acceptance
//!
//! Everything here is parsed once from host XML and read-only afterwards.

mod input_definition;
mod parameter;
mod raw;
mod scheme;
mod validation;

pub use input_definition::{InputDefinition, InputDefinitionCollection};
pub use parameter::{MultiValueParameter, Parameter, SingleValueParameter};
pub use scheme::{Argument, DataType, Scheme, StreamingMode, ValidationDelegate};
pub use validation::{Validation, ValidationOutcome};
