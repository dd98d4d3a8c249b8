//! Format string parsing.
//!
//! A format string is literal text interleaved with `%` specifiers:
//!
//! ```text
//! %[-][0][width][.precision]<specifier>
//! ```
//!
//! The parser is a [`Segments`] iterator; [`parse`] drives it and forwards
//! each piece to caller-supplied callbacks.

use vera_diagnostic::ErrorCode;

/// Options applied when rendering a single argument.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FormatOptions {
    /// Field width. `None` uses the natural width of the value.
    pub width: Option<u32>,
    /// Digits after the decimal point for real specifiers.
    pub precision: Option<u32>,
    /// Pad on the right instead of the left.
    pub left_justify: bool,
    /// Pad numbers with zeros instead of spaces.
    pub zero_pad: bool,
}

impl FormatOptions {
    fn has_width_options(&self) -> bool {
        self.width.is_some() || self.left_justify || self.zero_pad
    }
}

/// One parsed piece of a format string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text, including the `%` produced by `%%`.
    Text(&'a str),
    /// A valid specifier. `offset` and `len` cover the whole `%...` sequence.
    Arg {
        specifier: char,
        offset: usize,
        len: usize,
        options: FormatOptions,
    },
    /// A malformed specifier.
    Error {
        code: ErrorCode,
        offset: usize,
        len: usize,
        specifier: Option<char>,
    },
}

/// Whether `c` (in either case) is a known specifier.
pub fn is_specifier(c: char) -> bool {
    matches!(
        c.to_ascii_lowercase(),
        'd' | 'b'
            | 'o'
            | 'h'
            | 'x'
            | 'c'
            | 's'
            | 'e'
            | 'f'
            | 'g'
            | 't'
            | 'm'
            | 'l'
            | 'v'
            | 'u'
            | 'z'
            | 'p'
    )
}

/// Whether the specifier consumes an argument.
///
/// `%m` and `%l` print the current scope and library instead.
pub fn consumes_argument(c: char) -> bool {
    !matches!(c.to_ascii_lowercase(), 'm' | 'l')
}

/// Largest width or precision a specifier may request.
pub const MAX_FIELD_WIDTH: u32 = 1 << 16;

fn allows_width(c: char) -> bool {
    !matches!(c.to_ascii_lowercase(), 'm' | 'l' | 'v' | 'u' | 'z')
}

fn allows_precision(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'e' | 'f' | 'g')
}

/// Iterator over the segments of a format string.
#[derive(Clone, Debug)]
pub struct Segments<'a> {
    format: &'a str,
    pos: usize,
}

/// Split `format` into text and specifier segments.
pub fn segments(format: &str) -> Segments<'_> {
    Segments { format, pos: 0 }
}

impl<'a> Segments<'a> {
    fn peek_byte(&self) -> Option<u8> {
        self.format.as_bytes().get(self.pos).copied()
    }

    fn read_number(&mut self) -> Option<u32> {
        let start = self.pos;
        let mut value: u32 = 0;
        while let Some(b) = self.peek_byte().filter(u8::is_ascii_digit) {
            value = value.saturating_mul(10).saturating_add(u32::from(b - b'0'));
            self.pos += 1;
        }
        (self.pos > start).then_some(value)
    }

    fn specifier(&mut self, start: usize) -> Segment<'a> {
        // Skip the '%'.
        self.pos += 1;
        if self.peek_byte() == Some(b'%') {
            self.pos += 1;
            return Segment::Text("%");
        }

        let mut options = FormatOptions::default();
        loop {
            match self.peek_byte() {
                Some(b'-') => options.left_justify = true,
                Some(b'0') => options.zero_pad = true,
                _ => break,
            }
            self.pos += 1;
        }
        options.width = self.read_number();
        if options.zero_pad && options.width.is_none() {
            options.width = Some(0);
        }
        if self.peek_byte() == Some(b'.') {
            self.pos += 1;
            options.precision = Some(self.read_number().unwrap_or(0));
        }

        let Some(c) = self.format[self.pos..].chars().next() else {
            return Segment::Error {
                code: ErrorCode::E7001,
                offset: start,
                len: self.pos - start,
                specifier: None,
            };
        };
        self.pos += c.len_utf8();
        let len = self.pos - start;

        let code = if !is_specifier(c) {
            ErrorCode::E7002
        } else if (options.has_width_options() && !allows_width(c))
            || (options.precision.is_some() && !allows_precision(c))
        {
            ErrorCode::E7003
        } else if options.width.max(options.precision) > Some(MAX_FIELD_WIDTH) {
            ErrorCode::E7007
        } else {
            return Segment::Arg {
                specifier: c,
                offset: start,
                len,
                options,
            };
        };
        Segment::Error {
            code,
            offset: start,
            len,
            specifier: Some(c),
        }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        let rest = &self.format[self.pos..];
        if rest.is_empty() {
            return None;
        }
        let start = self.pos;
        match rest.find('%') {
            Some(0) => Some(self.specifier(start)),
            Some(n) => {
                self.pos += n;
                Some(Segment::Text(&rest[..n]))
            }
            None => {
                self.pos = self.format.len();
                Some(Segment::Text(rest))
            }
        }
    }
}

/// Parse `format`, invoking `on_text` for literal text, `on_arg` for each
/// valid specifier and `on_error` for each malformed one.
///
/// Parsing continues past errors so every problem is reported. Returns
/// `true` if no error was found.
pub fn parse<'a>(
    format: &'a str,
    mut on_text: impl FnMut(&'a str),
    mut on_arg: impl FnMut(char, usize, usize, &FormatOptions),
    mut on_error: impl FnMut(ErrorCode, usize, usize, Option<char>),
) -> bool {
    let mut ok = true;
    for segment in segments(format) {
        match segment {
            Segment::Text(text) => on_text(text),
            Segment::Arg {
                specifier,
                offset,
                len,
                options,
            } => on_arg(specifier, offset, len, &options),
            Segment::Error {
                code,
                offset,
                len,
                specifier,
            } => {
                ok = false;
                on_error(code, offset, len, specifier);
            }
        }
    }
    ok
}

#[cfg(test)]
mod tests;
