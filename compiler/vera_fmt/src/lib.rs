//! Vera Fmt - format strings for `$sformatf` and friends.
//!
//! - [`parse`] / [`segments`]: split a format string into text and
//!   specifiers, reporting malformed specifiers with byte offsets
//! - [`format_int`] / [`format_arg`]: render one value under a specifier
//! - [`format_values`]: the whole pipeline, collecting every problem as a
//!   [`FormatIssue`] instead of stopping at the first

mod error;
mod parse;
mod render;

pub use error::FormatError;
pub use parse::{
    consumes_argument, is_specifier, parse, segments, FormatOptions, Segment, Segments,
    MAX_FIELD_WIDTH,
};
pub use render::{format_arg, format_int, LiteralBase};

use vera_diagnostic::ErrorCode;
use vera_value::ConstantValue;

/// Library name printed by `%l`.
const LIBRARY_NAME: &str = "work";

/// A problem found while formatting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatIssue {
    pub code: ErrorCode,
    /// Byte offset of the offending specifier in the format string.
    pub offset: usize,
    /// Byte length of the offending specifier.
    pub len: usize,
    /// Index of the argument involved, if any.
    pub arg: Option<usize>,
    pub message: String,
}

/// Output of [`format_values`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Formatted {
    pub text: String,
    pub issues: Vec<FormatIssue>,
}

impl Formatted {
    /// Whether any issue is an error rather than a warning.
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| !i.code.is_warning())
    }
}

/// Format `args` according to `format`.
///
/// `%m` prints `scope_name`. Arguments left over after the last specifier
/// produce a warning pointing at the first unused one.
pub fn format_values(format: &str, args: &[ConstantValue], scope_name: &str) -> Formatted {
    let mut out = Formatted::default();
    let mut next_arg = 0;

    for segment in segments(format) {
        match segment {
            Segment::Text(text) => out.text.push_str(text),
            Segment::Error {
                code,
                offset,
                len,
                specifier,
            } => {
                let message = match specifier {
                    Some(c) if code == ErrorCode::E7002 => format!("unknown format specifier '%{c}'"),
                    Some(c) => format!("'%{c}': {}", code.description()),
                    None => code.description().to_owned(),
                };
                out.issues.push(FormatIssue {
                    code,
                    offset,
                    len,
                    arg: None,
                    message,
                });
            }
            Segment::Arg {
                specifier,
                offset,
                len,
                options,
            } => {
                if !consumes_argument(specifier) {
                    let name = if specifier.eq_ignore_ascii_case(&'m') {
                        scope_name
                    } else {
                        LIBRARY_NAME
                    };
                    out.text.push_str(name);
                    continue;
                }
                let Some(arg) = args.get(next_arg) else {
                    out.issues.push(FormatIssue {
                        code: ErrorCode::E7004,
                        offset,
                        len,
                        arg: None,
                        message: format!("no argument for '%{specifier}'"),
                    });
                    continue;
                };
                if let Err(err) = format_arg(&mut out.text, arg, specifier, &options) {
                    out.issues.push(FormatIssue {
                        code: err.code(),
                        offset,
                        len,
                        arg: Some(next_arg),
                        message: err.to_string(),
                    });
                }
                next_arg += 1;
            }
        }
    }

    if next_arg < args.len() {
        out.issues.push(FormatIssue {
            code: ErrorCode::W7001,
            offset: format.len(),
            len: 0,
            arg: Some(next_arg),
            message: format!(
                "{} unused argument(s) for format string",
                args.len() - next_arg
            ),
        });
    }
    out
}

#[cfg(test)]
mod tests;
