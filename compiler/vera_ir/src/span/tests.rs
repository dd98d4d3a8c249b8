use super::*;

#[test]
fn test_span_basic() {
    let span = Span::new(10, 20);
    assert_eq!(span.len(), 10);
    assert!(!span.is_empty());
    assert!(span.contains(15));
    assert!(!span.contains(20));
}

#[test]
fn test_span_merge() {
    let merged = Span::new(10, 20).merge(Span::new(15, 30));
    assert_eq!(merged, Span::new(10, 30));
}

#[test]
fn test_point_is_location() {
    let loc = Span::new(4, 9).start_location();
    assert!(loc.is_empty());
    assert_eq!(loc.start, 4);
    assert_eq!(loc.to_string(), "4");
}

#[test]
fn test_display_and_debug() {
    assert_eq!(Span::new(3, 7).to_string(), "3..7");
    assert_eq!(format!("{:?}", Span::new(3, 7)), "3..7");
}

#[test]
fn test_from_range() {
    assert_eq!(Span::from(2..5), Span::new(2, 5));
}
