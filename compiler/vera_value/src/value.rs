//! The constant value representation.

use std::fmt;

use crate::ValueError;

/// A compile-time constant.
///
/// `Invalid` is the sentinel for "failed or not yet computed". Aggregates
/// own their elements, so cloning a value is a deep copy.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ConstantValue {
    /// A failed or missing result.
    #[default]
    Invalid,
    /// A two-state integral value.
    Integer(i64),
    /// A double-precision real.
    Real(f64),
    /// A string.
    Str(String),
    /// A fixed-size unpacked array.
    Array(Vec<ConstantValue>),
    /// A dynamically sized queue.
    Queue(Vec<ConstantValue>),
    /// A struct; members are stored in declaration order.
    Struct(Vec<ConstantValue>),
    /// Stand-in for an unbounded `$` literal that has no queue to resolve against.
    UnboundedPlaceholder,
}

impl ConstantValue {
    /// Truth values produced by comparisons and logical operators.
    pub const TRUE: ConstantValue = ConstantValue::Integer(1);
    pub const FALSE: ConstantValue = ConstantValue::Integer(0);

    /// Build a boolean result.
    #[inline]
    pub fn from_bool(b: bool) -> Self {
        if b {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }

    /// Build a string value.
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        ConstantValue::Str(s.into())
    }

    /// Check for the invalid sentinel.
    #[inline]
    pub fn is_invalid(&self) -> bool {
        matches!(self, ConstantValue::Invalid)
    }

    /// Check for the unbounded placeholder.
    #[inline]
    pub fn is_unbounded(&self) -> bool {
        matches!(self, ConstantValue::UnboundedPlaceholder)
    }

    /// Check whether the value is a queue.
    #[inline]
    pub fn is_queue(&self) -> bool {
        matches!(self, ConstantValue::Queue(_))
    }

    /// Short human-readable kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ConstantValue::Invalid => "invalid",
            ConstantValue::Integer(_) => "integer",
            ConstantValue::Real(_) => "real",
            ConstantValue::Str(_) => "string",
            ConstantValue::Array(_) => "array",
            ConstantValue::Queue(_) => "queue",
            ConstantValue::Struct(_) => "struct",
            ConstantValue::UnboundedPlaceholder => "unbounded",
        }
    }

    /// Integral view of the value, if it has one.
    #[inline]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ConstantValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Real view of the value; integers convert.
    #[expect(
        clippy::cast_precision_loss,
        reason = "integer to real conversion follows language semantics"
    )]
    pub fn as_real(&self) -> Option<f64> {
        match self {
            ConstantValue::Real(v) => Some(*v),
            ConstantValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// String view of the value, if it is a string.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConstantValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Truthiness as used by conditions. `None` for values with no truth value.
    pub fn is_true(&self) -> Option<bool> {
        match self {
            ConstantValue::Integer(v) => Some(*v != 0),
            ConstantValue::Real(v) => Some(*v != 0.0),
            ConstantValue::Str(s) => Some(!s.is_empty()),
            _ => None,
        }
    }

    /// Number of elements for aggregates and characters for strings.
    pub fn len(&self) -> Option<usize> {
        match self {
            ConstantValue::Array(v) | ConstantValue::Queue(v) | ConstantValue::Struct(v) => {
                Some(v.len())
            }
            ConstantValue::Str(s) => Some(s.len()),
            _ => None,
        }
    }

    /// Whether an aggregate or string has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    fn elements(&self) -> Result<&Vec<ConstantValue>, ValueError> {
        match self {
            ConstantValue::Array(v) | ConstantValue::Queue(v) => Ok(v),
            other => Err(ValueError::InvalidOperand {
                op: "[]",
                operand: other.kind_name(),
            }),
        }
    }

    fn elements_mut(&mut self) -> Result<&mut Vec<ConstantValue>, ValueError> {
        match self {
            ConstantValue::Array(v) | ConstantValue::Queue(v) => Ok(v),
            other => Err(ValueError::InvalidOperand {
                op: "[]",
                operand: other.kind_name(),
            }),
        }
    }

    fn checked_index(index: i64, len: usize) -> Result<usize, ValueError> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < len)
            .ok_or(ValueError::OutOfBounds { index, len })
    }

    /// Read one element of an array or queue.
    pub fn element(&self, index: i64) -> Result<&ConstantValue, ValueError> {
        let elems = self.elements()?;
        let i = Self::checked_index(index, elems.len())?;
        Ok(&elems[i])
    }

    /// Mutable access to one element of an array or queue.
    pub fn element_mut(&mut self, index: i64) -> Result<&mut ConstantValue, ValueError> {
        let elems = self.elements_mut()?;
        let i = Self::checked_index(index, elems.len())?;
        Ok(&mut elems[i])
    }

    /// Read one struct member.
    pub fn member(&self, index: usize) -> Result<&ConstantValue, ValueError> {
        match self {
            ConstantValue::Struct(members) => members
                .get(index)
                .ok_or(ValueError::NoSuchMember { index }),
            other => Err(ValueError::InvalidOperand {
                op: ".",
                operand: other.kind_name(),
            }),
        }
    }

    /// Mutable access to one struct member.
    pub fn member_mut(&mut self, index: usize) -> Result<&mut ConstantValue, ValueError> {
        match self {
            ConstantValue::Struct(members) => members
                .get_mut(index)
                .ok_or(ValueError::NoSuchMember { index }),
            other => Err(ValueError::InvalidOperand {
                op: ".",
                operand: other.kind_name(),
            }),
        }
    }

    /// Resolve `[left:right]` to a half-open element range.
    ///
    /// Queues clamp out-of-range bounds and yield an empty range when
    /// `left > right`; fixed arrays require both bounds in range.
    fn slice_bounds(&self, left: i64, right: i64) -> Result<std::ops::Range<usize>, ValueError> {
        let elems = self.elements()?;
        let len = elems.len();
        if self.is_queue() {
            let last = i64::try_from(len).unwrap_or(i64::MAX).saturating_sub(1);
            let lo = left.max(0);
            let hi = right.min(last);
            if lo > hi {
                return Ok(0..0);
            }
            let lo = Self::checked_index(lo, len)?;
            let hi = Self::checked_index(hi, len)?;
            return Ok(lo..hi.saturating_add(1));
        }
        let lo = Self::checked_index(left.min(right), len)?;
        let hi = Self::checked_index(left.max(right), len)?;
        Ok(lo..hi.saturating_add(1))
    }

    /// Read `[left:right]` of an array or queue. The result has the same kind.
    pub fn slice(&self, left: i64, right: i64) -> Result<ConstantValue, ValueError> {
        let range = self.slice_bounds(left, right)?;
        let picked = self.elements()?[range].to_vec();
        Ok(match self {
            ConstantValue::Queue(_) => ConstantValue::Queue(picked),
            _ => ConstantValue::Array(picked),
        })
    }

    /// Overwrite `[left:right]` with the elements of `value`.
    ///
    /// Queues may change length; arrays require an exact length match.
    /// Unlike reads, a queue write does not clamp: both bounds must be in
    /// range with `left <= right`, and a rejected write leaves the queue
    /// unchanged.
    pub fn replace_slice(
        &mut self,
        left: i64,
        right: i64,
        value: ConstantValue,
    ) -> Result<(), ValueError> {
        let is_queue = self.is_queue();
        let range = if is_queue {
            let len = self.elements()?.len();
            let lo = Self::checked_index(left, len)?;
            let hi = Self::checked_index(right, len)?;
            if lo > hi {
                return Err(ValueError::OutOfBounds { index: left, len });
            }
            lo..hi + 1
        } else {
            self.slice_bounds(left, right)?
        };
        let incoming = match value {
            ConstantValue::Array(v) | ConstantValue::Queue(v) => v,
            other => {
                return Err(ValueError::Mismatch {
                    op: "=",
                    left: "slice",
                    right: other.kind_name(),
                })
            }
        };
        if !is_queue && incoming.len() != range.len() {
            return Err(ValueError::OutOfBounds {
                index: i64::try_from(incoming.len()).unwrap_or(i64::MAX),
                len: range.len(),
            });
        }
        self.elements_mut()?.splice(range, incoming);
        Ok(())
    }
}

impl From<i64> for ConstantValue {
    fn from(v: i64) -> Self {
        ConstantValue::Integer(v)
    }
}

impl From<f64> for ConstantValue {
    fn from(v: f64) -> Self {
        ConstantValue::Real(v)
    }
}

impl From<&str> for ConstantValue {
    fn from(v: &str) -> Self {
        ConstantValue::Str(v.to_owned())
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, open: &str, items: &[ConstantValue]) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str("}")
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Invalid => f.write_str("<invalid>"),
            ConstantValue::Integer(v) => write!(f, "{v}"),
            ConstantValue::Real(v) => write!(f, "{v}"),
            ConstantValue::Str(s) => write!(f, "\"{s}\""),
            ConstantValue::Array(items) | ConstantValue::Struct(items) => {
                write_list(f, "'{", items)
            }
            ConstantValue::Queue(items) => write_list(f, "{", items),
            ConstantValue::UnboundedPlaceholder => f.write_str("$"),
        }
    }
}
