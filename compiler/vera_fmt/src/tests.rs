use super::*;
use pretty_assertions::assert_eq;

fn ints(values: &[i64]) -> Vec<ConstantValue> {
    values.iter().map(|v| ConstantValue::Integer(*v)).collect()
}

#[test]
fn formats_text_and_arguments() {
    let out = format_values("a=%0d b=%h%%", &ints(&[12, 255]), "top");
    assert_eq!(out.text, "a=12 b=ff%");
    assert!(out.issues.is_empty());
}

#[test]
fn scope_and_library_names() {
    let out = format_values("%m in %l", &[], "top.f");
    assert_eq!(out.text, "top.f in work");
    assert!(!out.has_errors());
}

#[test]
fn too_few_arguments() {
    let out = format_values("%d %d", &ints(&[1]), "top");
    assert_eq!(out.text, "1 ");
    assert_eq!(out.issues.len(), 1);
    assert_eq!(out.issues[0].code, ErrorCode::E7004);
    assert_eq!((out.issues[0].offset, out.issues[0].len), (3, 2));
    assert!(out.has_errors());
}

#[test]
fn too_many_arguments_is_a_warning() {
    let out = format_values("%d", &ints(&[1, 2, 3]), "top");
    assert_eq!(out.text, "1");
    assert_eq!(out.issues.len(), 1);
    assert_eq!(out.issues[0].code, ErrorCode::W7001);
    assert_eq!(out.issues[0].arg, Some(1));
    assert!(!out.has_errors());
}

#[test]
fn bad_argument_still_consumes_it() {
    let args = vec![ConstantValue::string("s"), ConstantValue::Integer(7)];
    let out = format_values("%d-%d", &args, "top");
    assert_eq!(out.text, "-7");
    assert_eq!(out.issues.len(), 1);
    assert_eq!(out.issues[0].code, ErrorCode::E7005);
    assert_eq!(out.issues[0].arg, Some(0));
}

#[test]
fn oversized_width_is_an_error() {
    let out = format_values("v=%50000000d", &ints(&[1]), "top");
    assert_eq!(out.text, "v=");
    assert!(out.has_errors());
    assert_eq!(out.issues[0].code, ErrorCode::E7007);
    assert_eq!((out.issues[0].offset, out.issues[0].len), (2, 10));
}

#[test]
fn malformed_specifier_is_reported_and_skipped() {
    let out = format_values("x%qy%", &[], "top");
    assert_eq!(out.text, "xy");
    let codes: Vec<_> = out.issues.iter().map(|i| i.code).collect();
    assert_eq!(codes, vec![ErrorCode::E7002, ErrorCode::E7001]);
    assert_eq!(out.issues[0].message, "unknown format specifier '%q'");
}
