//! Boolean parsing for parameter values.

use crate::error::ParameterError;

/// Parse the textual booleans the host writes into configuration files.
///
/// Accepts `true/false`, `t/f`, `yes/no`, `y/n` and `1/0`, ignoring case
/// and surrounding whitespace. `name` is only used for the error.
pub fn parse_bool(name: &str, value: &str) -> Result<bool, ParameterError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Ok(true),
        "false" | "f" | "no" | "n" | "0" => Ok(false),
        _ => Err(ParameterError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
            target: "bool",
        }),
    }
}
