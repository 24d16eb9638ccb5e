//! Tests for typed parameter conversions.

use crate::error::{ParameterError, ParameterShape};
use crate::{MultiValueParameter, Parameter, SingleValueParameter};

fn single(value: &str) -> Parameter {
    SingleValueParameter::new("p", value).into()
}

fn multi(values: &[&str]) -> Parameter {
    MultiValueParameter::new("p", values.iter().map(|v| v.to_string()).collect()).into()
}

#[test]
fn scalar_conversions() {
    assert_eq!(single("42").to_i32().unwrap(), 42);
    assert_eq!(single(" -7 ").to_i64().unwrap(), -7);
    assert_eq!(single("1.5").to_f32().unwrap(), 1.5);
    assert_eq!(single("2.25").to_f64().unwrap(), 2.25);
    assert!(single("Yes").to_bool().unwrap());
    assert_eq!(single("abc").as_str().unwrap(), "abc");
}

#[test]
fn unparsable_value_reports_target_type() {
    let err = single("forty-two").to_i32().unwrap_err();
    assert_eq!(
        err,
        ParameterError::InvalidValue {
            name: "p".into(),
            value: "forty-two".into(),
            target: "i32",
        }
    );
    assert!(err.to_string().contains("forty-two"));
}

#[test]
fn list_conversions() {
    let p = multi(&["1", "2", "3"]);
    assert_eq!(p.to_i32_list().unwrap(), vec![1, 2, 3]);
    assert_eq!(p.to_i64_list().unwrap(), vec![1, 2, 3]);
    assert_eq!(p.to_f64_list().unwrap(), vec![1.0, 2.0, 3.0]);
    assert_eq!(p.to_string_list().unwrap(), vec!["1", "2", "3"]);

    let flags = multi(&["true", "f", "1", "NO"]);
    assert_eq!(flags.to_bool_list().unwrap(), vec![true, false, true, false]);
}

#[test]
fn one_bad_list_entry_fails_the_whole_list() {
    let err = multi(&["1", "x", "3"]).to_i32_list().unwrap_err();
    assert!(matches!(err, ParameterError::InvalidValue { ref value, .. } if value == "x"));
}

#[test]
fn empty_list_converts_to_empty_vec() {
    assert!(multi(&[]).to_f32_list().unwrap().is_empty());
}

#[test]
fn shape_mismatch_is_reported() {
    let err = single("1").to_i32_list().unwrap_err();
    assert_eq!(
        err,
        ParameterError::WrongShape {
            name: "p".into(),
            expected: ParameterShape::Multi,
            found: ParameterShape::Single,
        }
    );

    let err = multi(&["1"]).to_i32().unwrap_err();
    assert!(matches!(
        err,
        ParameterError::WrongShape {
            expected: ParameterShape::Single,
            found: ParameterShape::Multi,
            ..
        }
    ));
    assert_eq!(err.to_string(), "parameter 'p' is multi-value, not single-value");
}

#[test]
fn name_and_shape_accessors() {
    let p = multi(&[]);
    assert_eq!(p.name(), "p");
    assert_eq!(p.shape(), ParameterShape::Multi);
    assert_eq!(single("v").shape(), ParameterShape::Single);
}
