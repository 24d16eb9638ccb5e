//! Typed access to `<param>` and `<param_list>` values.

use std::str::FromStr;

use crate::error::{ParameterError, ParameterShape};
use crate::format::parse_bool;

fn parse_as<T: FromStr>(name: &str, value: &str, target: &'static str) -> Result<T, ParameterError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ParameterError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
            target,
        })
}

/// A parameter holding exactly one value (`<param name="..">value</param>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleValueParameter {
    pub name: String,
    pub value: String,
}

impl SingleValueParameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn to_bool(&self) -> Result<bool, ParameterError> {
        parse_bool(&self.name, &self.value)
    }

    pub fn to_i32(&self) -> Result<i32, ParameterError> {
        parse_as(&self.name, &self.value, "i32")
    }

    pub fn to_i64(&self) -> Result<i64, ParameterError> {
        parse_as(&self.name, &self.value, "i64")
    }

    pub fn to_f32(&self) -> Result<f32, ParameterError> {
        parse_as(&self.name, &self.value, "f32")
    }

    pub fn to_f64(&self) -> Result<f64, ParameterError> {
        parse_as(&self.name, &self.value, "f64")
    }
}

/// A parameter holding an ordered list of values
/// (`<param_list name=".."><value>..</value>..</param_list>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiValueParameter {
    pub name: String,
    pub values: Vec<String>,
}

impl MultiValueParameter {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn to_string_list(&self) -> Vec<String> {
        self.values.clone()
    }

    pub fn to_bool_list(&self) -> Result<Vec<bool>, ParameterError> {
        self.values.iter().map(|v| parse_bool(&self.name, v)).collect()
    }

    pub fn to_i32_list(&self) -> Result<Vec<i32>, ParameterError> {
        self.parse_all("i32")
    }

    pub fn to_i64_list(&self) -> Result<Vec<i64>, ParameterError> {
        self.parse_all("i64")
    }

    pub fn to_f32_list(&self) -> Result<Vec<f32>, ParameterError> {
        self.parse_all("f32")
    }

    pub fn to_f64_list(&self) -> Result<Vec<f64>, ParameterError> {
        self.parse_all("f64")
    }

    fn parse_all<T: FromStr>(&self, target: &'static str) -> Result<Vec<T>, ParameterError> {
        self.values
            .iter()
            .map(|v| parse_as(&self.name, v, target))
            .collect()
    }
}

/// A configuration parameter of either shape.
///
/// The scalar and list conversions on this type check the shape first, so
/// asking a `<param>` for a list fails with `ParameterError::WrongShape`
/// rather than a parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    Single(SingleValueParameter),
    Multi(MultiValueParameter),
}

impl Parameter {
    pub fn name(&self) -> &str {
        match self {
            Parameter::Single(p) => &p.name,
            Parameter::Multi(p) => &p.name,
        }
    }

    pub fn shape(&self) -> ParameterShape {
        match self {
            Parameter::Single(_) => ParameterShape::Single,
            Parameter::Multi(_) => ParameterShape::Multi,
        }
    }

    pub fn as_single(&self) -> Result<&SingleValueParameter, ParameterError> {
        match self {
            Parameter::Single(p) => Ok(p),
            Parameter::Multi(p) => Err(ParameterError::WrongShape {
                name: p.name.clone(),
                expected: ParameterShape::Single,
                found: ParameterShape::Multi,
            }),
        }
    }

    pub fn as_multi(&self) -> Result<&MultiValueParameter, ParameterError> {
        match self {
            Parameter::Multi(p) => Ok(p),
            Parameter::Single(p) => Err(ParameterError::WrongShape {
                name: p.name.clone(),
                expected: ParameterShape::Multi,
                found: ParameterShape::Single,
            }),
        }
    }

    pub fn as_str(&self) -> Result<&str, ParameterError> {
        self.as_single().map(SingleValueParameter::as_str)
    }

    pub fn to_bool(&self) -> Result<bool, ParameterError> {
        self.as_single()?.to_bool()
    }

    pub fn to_i32(&self) -> Result<i32, ParameterError> {
        self.as_single()?.to_i32()
    }

    pub fn to_i64(&self) -> Result<i64, ParameterError> {
        self.as_single()?.to_i64()
    }

    pub fn to_f32(&self) -> Result<f32, ParameterError> {
        self.as_single()?.to_f32()
    }

    pub fn to_f64(&self) -> Result<f64, ParameterError> {
        self.as_single()?.to_f64()
    }

    pub fn to_string_list(&self) -> Result<Vec<String>, ParameterError> {
        Ok(self.as_multi()?.to_string_list())
    }

    pub fn to_bool_list(&self) -> Result<Vec<bool>, ParameterError> {
        self.as_multi()?.to_bool_list()
    }

    pub fn to_i32_list(&self) -> Result<Vec<i32>, ParameterError> {
        self.as_multi()?.to_i32_list()
    }

    pub fn to_i64_list(&self) -> Result<Vec<i64>, ParameterError> {
        self.as_multi()?.to_i64_list()
    }

    pub fn to_f32_list(&self) -> Result<Vec<f32>, ParameterError> {
        self.as_multi()?.to_f32_list()
    }

    pub fn to_f64_list(&self) -> Result<Vec<f64>, ParameterError> {
        self.as_multi()?.to_f64_list()
    }
}

impl From<SingleValueParameter> for Parameter {
    fn from(p: SingleValueParameter) -> Self {
        Parameter::Single(p)
    }
}

impl From<MultiValueParameter> for Parameter {
    fn from(p: MultiValueParameter) -> Self {
        Parameter::Multi(p)
    }
}
