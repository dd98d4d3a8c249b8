use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E6001.to_string(), "E6001");
    assert_eq!(ErrorCode::W7001.as_str(), "W7001");
}

#[test]
fn test_ranges() {
    assert!(ErrorCode::E6002.is_eval_error());
    assert!(!ErrorCode::E6002.is_format_error());
    assert!(ErrorCode::E7002.is_format_error());
    assert!(ErrorCode::E9001.is_internal_error());
    assert!(ErrorCode::W6001.is_warning());
    assert!(!ErrorCode::E6006.is_warning());
}

#[test]
fn test_parse_roundtrips_every_code() {
    for code in ErrorCode::ALL {
        assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(*code));
    }
    assert_eq!("e6003".parse::<ErrorCode>(), Ok(ErrorCode::E6003));
    assert!("E0000".parse::<ErrorCode>().is_err());
}

#[test]
fn test_every_code_has_a_description() {
    for code in ErrorCode::ALL {
        assert!(!code.description().is_empty(), "{code} has no description");
    }
}
