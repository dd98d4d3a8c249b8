//! Rendering of constant values under a format specifier.

use vera_value::ConstantValue;

use crate::{FormatError, FormatOptions, MAX_FIELD_WIDTH};

/// Radix used for integer output.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LiteralBase {
    Binary,
    Octal,
    Decimal,
    Hex,
}

impl LiteralBase {
    /// Base implied by an integer specifier, in either case.
    pub fn from_specifier(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'b' => Some(LiteralBase::Binary),
            'o' => Some(LiteralBase::Octal),
            'd' | 't' => Some(LiteralBase::Decimal),
            'h' | 'x' => Some(LiteralBase::Hex),
            _ => None,
        }
    }
}

/// Width or precision as a count, capped at [`MAX_FIELD_WIDTH`].
fn capped(value: Option<u32>) -> Option<usize> {
    value.map(|v| usize::try_from(v.min(MAX_FIELD_WIDTH)).unwrap_or(usize::MAX))
}

fn field_width(options: &FormatOptions) -> usize {
    capped(options.width).unwrap_or(0)
}

fn push_fill(result: &mut String, fill: char, count: usize) {
    result.extend(std::iter::repeat_n(fill, count));
}

/// Append `sign` and `digits` padded to the field width. Zero padding goes
/// between the sign and the digits.
fn pad_number(result: &mut String, sign: &str, digits: &str, options: &FormatOptions) {
    let len = sign.len() + digits.len();
    let fill = field_width(options).saturating_sub(len);
    if options.left_justify {
        result.push_str(sign);
        result.push_str(digits);
        push_fill(result, ' ', fill);
    } else if options.zero_pad {
        result.push_str(sign);
        push_fill(result, '0', fill);
        result.push_str(digits);
    } else {
        push_fill(result, ' ', fill);
        result.push_str(sign);
        result.push_str(digits);
    }
}

/// Append `text` padded with spaces to the field width.
fn pad_text(result: &mut String, text: &str, options: &FormatOptions) {
    let fill = field_width(options).saturating_sub(text.chars().count());
    if options.left_justify {
        result.push_str(text);
        push_fill(result, ' ', fill);
    } else {
        push_fill(result, ' ', fill);
        result.push_str(text);
    }
}

/// Format `value` in `base` and append it to `result`.
///
/// Decimal output is signed. Other bases print the two's complement bit
/// pattern, so negative values show all 64 bits.
pub fn format_int(result: &mut String, value: i64, base: LiteralBase, options: &FormatOptions) {
    let (sign, digits) = match base {
        LiteralBase::Decimal => (
            if value < 0 { "-" } else { "" },
            value.unsigned_abs().to_string(),
        ),
        LiteralBase::Binary => ("", format!("{value:b}")),
        LiteralBase::Octal => ("", format!("{value:o}")),
        LiteralBase::Hex => ("", format!("{value:x}")),
    };
    pad_number(result, sign, &digits, options);
}

/// Rewrite Rust exponent notation (`1.5e-7`) in C style (`1.5e-07`).
fn c_exponent(formatted: &str) -> String {
    let Some((mantissa, exp)) = formatted.split_once('e') else {
        return formatted.to_owned();
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
}

fn strip_fraction_zeros(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

/// `%g`: fixed or exponent notation, whichever is shorter for `precision`
/// significant digits, with trailing zeros removed.
fn format_general(value: f64, precision: usize) -> String {
    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let exp: i64 = scientific
        .split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0);
    let significant = i64::try_from(precision).unwrap_or(i64::MAX);
    if exp < -4 || exp >= significant {
        let (mantissa, rest) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
        c_exponent(&format!("{}e{rest}", strip_fraction_zeros(mantissa)))
    } else {
        let decimals = usize::try_from(significant - 1 - exp).unwrap_or(0);
        strip_fraction_zeros(&format!("{value:.decimals$}")).to_owned()
    }
}

fn format_real(result: &mut String, value: f64, specifier: char, options: &FormatOptions) {
    let text = if value.is_nan() {
        "nan".to_owned()
    } else if value.is_infinite() {
        String::from(if value < 0.0 { "-inf" } else { "inf" })
    } else {
        let precision = capped(options.precision).unwrap_or(6);
        match specifier {
            'e' => c_exponent(&format!("{value:.precision$e}")),
            'g' => format_general(value, precision),
            _ => format!("{value:.precision$}"),
        }
    };
    match text.strip_prefix('-') {
        Some(digits) => pad_number(result, "-", digits, options),
        None => pad_number(result, "", &text, options),
    }
}

/// Integral view of an argument for integer specifiers. Reals round to the
/// nearest integer.
#[expect(
    clippy::cast_possible_truncation,
    reason = "real to integer conversion saturates by language semantics"
)]
fn integral(value: &ConstantValue, specifier: char) -> Result<i64, FormatError> {
    match value {
        ConstantValue::Integer(v) => Ok(*v),
        ConstantValue::Real(r) => Ok(r.round() as i64),
        other => Err(FormatError::ArgumentKind {
            specifier,
            kind: other.kind_name(),
        }),
    }
}

/// Characters packed into an integer, most significant byte first, with
/// leading zero bytes dropped.
fn packed_chars(value: i64) -> String {
    value
        .to_be_bytes()
        .iter()
        .skip_while(|b| **b == 0)
        .map(|&b| char::from(b))
        .collect()
}

/// Format `arg` under `specifier` and append it to `result`.
///
/// Specifiers are case-insensitive. `%m` and `%l` take no argument and are
/// rejected here; callers substitute the scope or library name themselves.
pub fn format_arg(
    result: &mut String,
    arg: &ConstantValue,
    specifier: char,
    options: &FormatOptions,
) -> Result<(), FormatError> {
    let lower = specifier.to_ascii_lowercase();
    let kind_error = || FormatError::ArgumentKind {
        specifier,
        kind: arg.kind_name(),
    };

    match lower {
        'd' | 'b' | 'o' | 'h' | 'x' | 't' => {
            let value = integral(arg, specifier)?;
            let base = LiteralBase::from_specifier(lower).unwrap_or(LiteralBase::Decimal);
            format_int(result, value, base, options);
        }
        'c' => {
            let value = integral(arg, specifier)?;
            let byte = value.to_le_bytes()[0];
            pad_text(result, &char::from(byte).to_string(), options);
        }
        's' => match arg {
            ConstantValue::Str(s) => pad_text(result, s, options),
            ConstantValue::Integer(v) => pad_text(result, &packed_chars(*v), options),
            _ => return Err(kind_error()),
        },
        'e' | 'f' | 'g' => {
            let value = match arg {
                ConstantValue::Integer(_) | ConstantValue::Real(_) => arg.as_real(),
                _ => None,
            }
            .ok_or_else(kind_error)?;
            format_real(result, value, lower, options);
        }
        'v' => {
            let value = arg.as_integer().ok_or_else(kind_error)?;
            let bits = format!("{value:b}");
            for (i, bit) in bits.chars().enumerate() {
                if i > 0 {
                    result.push(' ');
                }
                result.push_str("St");
                result.push(bit);
            }
        }
        'u' | 'z' => {
            let value = arg.as_integer().ok_or_else(kind_error)?;
            result.extend(value.to_le_bytes().iter().map(|&b| char::from(b)));
        }
        'p' => {
            if arg.is_invalid() {
                return Err(kind_error());
            }
            pad_text(result, &arg.to_string(), options);
        }
        'm' | 'l' => return Err(FormatError::NoArgument(specifier)),
        _ => return Err(FormatError::UnknownSpecifier(specifier)),
    }
    Ok(())
}
