use super::*;
use pretty_assertions::assert_eq;

fn collect(format: &str) -> Vec<Segment<'_>> {
    segments(format).collect()
}

#[test]
fn plain_text_is_one_segment() {
    assert_eq!(collect("hello"), vec![Segment::Text("hello")]);
    assert_eq!(collect(""), vec![]);
}

#[test]
fn percent_escape_is_text() {
    assert_eq!(
        collect("100%% done"),
        vec![Segment::Text("100"), Segment::Text("%"), Segment::Text(" done")]
    );
}

#[test]
fn simple_specifier() {
    assert_eq!(
        collect("x=%d;"),
        vec![
            Segment::Text("x="),
            Segment::Arg {
                specifier: 'd',
                offset: 2,
                len: 2,
                options: FormatOptions::default(),
            },
            Segment::Text(";"),
        ]
    );
}

#[test]
fn flags_width_and_precision() {
    let segs = collect("%-08.3f");
    assert_eq!(
        segs,
        vec![Segment::Arg {
            specifier: 'f',
            offset: 0,
            len: 7,
            options: FormatOptions {
                width: Some(8),
                precision: Some(3),
                left_justify: true,
                zero_pad: true,
            },
        }]
    );
}

#[test]
fn zero_flag_alone_means_minimal_width() {
    let segs = collect("%0d");
    let Segment::Arg { options, .. } = &segs[0] else {
        panic!("expected an argument segment, got {segs:?}");
    };
    assert_eq!(options.width, Some(0));
    assert!(options.zero_pad);
}

#[test]
fn uppercase_specifiers_are_accepted() {
    assert!(is_specifier('H'));
    assert!(is_specifier('S'));
    assert!(!is_specifier('q'));
    assert!(parse("%H %D", |_| {}, |_, _, _, _| {}, |_, _, _, _| {}));
}

#[test]
fn missing_specifier_at_end() {
    assert_eq!(
        collect("abc%"),
        vec![
            Segment::Text("abc"),
            Segment::Error {
                code: ErrorCode::E7001,
                offset: 3,
                len: 1,
                specifier: None,
            },
        ]
    );
    assert_eq!(
        collect("%12"),
        vec![Segment::Error {
            code: ErrorCode::E7001,
            offset: 0,
            len: 3,
            specifier: None,
        }]
    );
}

#[test]
fn unknown_specifier_reports_character() {
    assert_eq!(
        collect("%5q"),
        vec![Segment::Error {
            code: ErrorCode::E7002,
            offset: 0,
            len: 3,
            specifier: Some('q'),
        }]
    );
}

#[test]
fn width_not_allowed() {
    let segs = collect("%4m %.2d %3s");
    let codes: Vec<_> = segs
        .iter()
        .filter_map(|s| match s {
            Segment::Error { code, .. } => Some(*code),
            _ => None,
        })
        .collect();
    assert_eq!(codes, vec![ErrorCode::E7003, ErrorCode::E7003]);
}

#[test]
fn width_and_precision_are_capped() {
    let at_cap = format!("%{MAX_FIELD_WIDTH}d");
    assert!(matches!(
        collect(&at_cap)[..],
        [Segment::Arg { specifier: 'd', .. }]
    ));

    let over = format!("ab%{}d", MAX_FIELD_WIDTH + 1);
    assert_eq!(
        collect(&over),
        vec![
            Segment::Text("ab"),
            Segment::Error {
                code: ErrorCode::E7007,
                offset: 2,
                len: over.len() - 2,
                specifier: Some('d'),
            },
        ]
    );

    for format in ["%4294967295d", "%99999999999999s", "%.70000f"] {
        let segs = collect(format);
        assert!(
            matches!(segs[..], [Segment::Error { code: ErrorCode::E7007, offset: 0, .. }]),
            "{format}: {segs:?}"
        );
    }
}

#[test]
fn parse_continues_after_errors() {
    let mut texts = Vec::new();
    let mut args = Vec::new();
    let mut errors = Vec::new();
    let ok = parse(
        "a%qb%dc",
        |t| texts.push(t),
        |spec, offset, len, _| args.push((spec, offset, len)),
        |code, offset, len, spec| errors.push((code, offset, len, spec)),
    );
    assert!(!ok);
    assert_eq!(texts, vec!["a", "b", "c"]);
    assert_eq!(args, vec![('d', 4, 2)]);
    assert_eq!(errors, vec![(ErrorCode::E7002, 1, 2, Some('q'))]);
}

#[test]
fn non_ascii_text_and_specifier() {
    assert_eq!(
        collect("é%é"),
        vec![
            Segment::Text("é"),
            Segment::Error {
                code: ErrorCode::E7002,
                offset: 2,
                len: 3,
                specifier: Some('é'),
            },
        ]
    );
}

#[test]
fn scope_specifiers_take_no_argument() {
    assert!(!consumes_argument('m'));
    assert!(!consumes_argument('L'));
    assert!(consumes_argument('d'));
}
