//! Value and index domain
//!
//! Every numeric type the store can hold carries its limits and an "invalid"
//! sentinel that marks a slot as not present / not yet visited:
//!
//! | type          | invalid      |
//! |---------------|--------------|
//! | unsigned ints | `MAX`        |
//! | signed ints   | `-1`         |
//! | floats        | `NaN`        |
//!
//! Integers use the all-ones bit pattern, so the sentinel survives a
//! reinterpretation between signed and unsigned ids of the same width.
//!
//! [`ValueType`] is the runtime descriptor for the same information, used by
//! the parameter registry where the type is only known at declaration time.

use crate::error::{GraphError, Result};
use std::fmt;
use std::hash::Hash;
use std::num::IntErrorKind;
use std::sync::atomic::{AtomicI32, AtomicI64, AtomicU32, AtomicU64, AtomicUsize, Ordering};

/// A fixed-width value that can live in a graph array
pub trait GraphValue:
    Copy + Send + Sync + PartialEq + PartialOrd + fmt::Debug + fmt::Display + 'static
{
    /// Human-readable type name
    const TYPE_NAME: &'static str;
    /// Largest representable value
    const MAX: Self;
    /// Smallest representable value
    const MIN: Self;
    /// "Not present / not yet visited" sentinel
    const INVALID: Self;
    /// All bits cleared
    const ALL_ZEROS: Self;

    /// Whether `self` is the invalid sentinel
    fn is_invalid(self) -> bool;

    /// Parse a decimal string, clamping out-of-range input to `MIN`/`MAX`
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the text is not a number at all
    fn parse_saturating(text: &str) -> Result<Self>;
}

/// An integer type usable as a vertex id or as an offset/count
pub trait Index: GraphValue + Ord + Hash {
    /// Atomic cell holding one value of this type
    type Atomic: AtomicCell<Self>;

    /// Convert to an array index; `None` for negative or oversized values
    fn to_usize(self) -> Option<usize>;

    /// Convert from an array index; `None` if it does not fit
    fn from_usize(index: usize) -> Option<Self>;

    /// `self + 1`, saturating at `MAX`
    #[must_use]
    fn successor(self) -> Self;
}

/// Compare-and-swap cell over a fixed-width integer
///
/// All operations are sequentially consistent with respect to each other on the
/// same cell: a successful `compare_exchange` is visible to every later `load`
/// on any worker.
pub trait AtomicCell<T>: Send + Sync {
    /// Create a cell holding `value`
    fn with_value(value: T) -> Self;

    /// Read the current value
    fn load_value(&self) -> T;

    /// Overwrite the current value
    fn store_value(&self, value: T);

    /// Replace `current` with `new` if the cell still holds `current`
    ///
    /// # Errors
    ///
    /// Returns `Err(actual)` with the observed value when another writer got
    /// there first
    fn compare_exchange_value(&self, current: T, new: T) -> std::result::Result<T, T>;
}

macro_rules! impl_integer {
    ($t:ty, $atomic:ty, $invalid:expr) => {
        impl GraphValue for $t {
            const TYPE_NAME: &'static str = stringify!($t);
            const MAX: Self = <$t>::MAX;
            const MIN: Self = <$t>::MIN;
            const INVALID: Self = $invalid;
            const ALL_ZEROS: Self = 0;

            fn is_invalid(self) -> bool {
                self == Self::INVALID
            }

            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            fn parse_saturating(text: &str) -> Result<Self> {
                let wide = match text.trim().parse::<i128>() {
                    Ok(v) => v,
                    Err(e) => match e.kind() {
                        IntErrorKind::PosOverflow => return Ok(Self::MAX),
                        IntErrorKind::NegOverflow => return Ok(Self::MIN),
                        _ => {
                            return Err(GraphError::invalid(format!(
                                "`{text}` is not a valid {}",
                                Self::TYPE_NAME
                            )))
                        }
                    },
                };
                Ok(wide.clamp(Self::MIN as i128, Self::MAX as i128) as Self)
            }
        }

        impl Index for $t {
            type Atomic = $atomic;

            fn to_usize(self) -> Option<usize> {
                usize::try_from(self).ok()
            }

            fn from_usize(index: usize) -> Option<Self> {
                <$t>::try_from(index).ok()
            }

            fn successor(self) -> Self {
                self.saturating_add(1)
            }
        }

        impl AtomicCell<$t> for $atomic {
            fn with_value(value: $t) -> Self {
                <$atomic>::new(value)
            }

            fn load_value(&self) -> $t {
                <$atomic>::load(self, Ordering::Acquire)
            }

            fn store_value(&self, value: $t) {
                <$atomic>::store(self, value, Ordering::Release);
            }

            fn compare_exchange_value(&self, current: $t, new: $t) -> std::result::Result<$t, $t> {
                <$atomic>::compare_exchange(self, current, new, Ordering::AcqRel, Ordering::Acquire)
            }
        }
    };
}

impl_integer!(u32, AtomicU32, u32::MAX);
impl_integer!(u64, AtomicU64, u64::MAX);
impl_integer!(usize, AtomicUsize, usize::MAX);
impl_integer!(i32, AtomicI32, -1);
impl_integer!(i64, AtomicI64, -1);

macro_rules! impl_float {
    ($t:ty) => {
        impl GraphValue for $t {
            const TYPE_NAME: &'static str = stringify!($t);
            const MAX: Self = <$t>::MAX;
            const MIN: Self = <$t>::MIN;
            const INVALID: Self = <$t>::NAN;
            const ALL_ZEROS: Self = 0.0;

            fn is_invalid(self) -> bool {
                self.is_nan()
            }

            #[allow(clippy::cast_possible_truncation)]
            fn parse_saturating(text: &str) -> Result<Self> {
                let wide = text.trim().parse::<f64>().map_err(|_| {
                    GraphError::invalid(format!("`{text}` is not a valid {}", Self::TYPE_NAME))
                })?;
                if wide.is_nan() {
                    return Ok(Self::INVALID);
                }
                Ok(wide.clamp(f64::from(Self::MIN), f64::from(Self::MAX)) as Self)
            }
        }
    };
}

impl_float!(f32);
impl_float!(f64);

/// Limits of a numeric type, rendered as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Largest value
    pub max: String,
    /// Smallest value
    pub min: String,
    /// Invalid sentinel
    pub invalid: String,
    /// All-zeros value
    pub all_zeros: String,
}

impl Limits {
    fn of<T: GraphValue>() -> Self {
        Self {
            max: T::MAX.to_string(),
            min: T::MIN.to_string(),
            invalid: T::INVALID.to_string(),
            all_zeros: T::ALL_ZEROS.to_string(),
        }
    }
}

/// Runtime type descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// `bool`
    Bool,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `usize`
    Usize,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// Free-form text
    Str,
}

impl ValueType {
    /// Type name as shown in help output
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Str => "string",
        }
    }

    /// Numeric limits of the described type
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedType` for `Bool` and `Str`
    pub fn limits(self) -> Result<Limits> {
        match self {
            Self::I32 => Ok(Limits::of::<i32>()),
            Self::I64 => Ok(Limits::of::<i64>()),
            Self::U32 => Ok(Limits::of::<u32>()),
            Self::U64 => Ok(Limits::of::<u64>()),
            Self::Usize => Ok(Limits::of::<usize>()),
            Self::F32 => Ok(Limits::of::<f32>()),
            Self::F64 => Ok(Limits::of::<f64>()),
            Self::Bool | Self::Str => Err(GraphError::UnsupportedType(self.name())),
        }
    }

    /// Whether `text` is an acceptable value of this type
    #[must_use]
    pub fn validate(self, text: &str) -> bool {
        match self {
            Self::Bool => matches!(text.trim(), "true" | "false" | "1" | "0"),
            Self::I32 => i32::parse_saturating(text).is_ok(),
            Self::I64 => i64::parse_saturating(text).is_ok(),
            Self::U32 => u32::parse_saturating(text).is_ok() && !text.trim().starts_with('-'),
            Self::U64 => u64::parse_saturating(text).is_ok() && !text.trim().starts_with('-'),
            Self::Usize => {
                usize::parse_saturating(text).is_ok() && !text.trim().starts_with('-')
            }
            Self::F32 => f32::parse_saturating(text).is_ok(),
            Self::F64 => f64::parse_saturating(text).is_ok(),
            Self::Str => true,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_sentinels() {
        assert_eq!(u32::INVALID, u32::MAX);
        assert_eq!(i32::INVALID, -1);
        assert_eq!(i64::INVALID, -1);
        assert!(f32::INVALID.is_invalid());
        assert!(!0.5_f64.is_invalid());
        assert!(u64::MAX.is_invalid());
        assert!(!0_u64.is_invalid());
    }

    #[test]
    fn test_parse_saturating() {
        assert_eq!(u32::parse_saturating("42").unwrap(), 42);
        assert_eq!(u32::parse_saturating("99999999999").unwrap(), u32::MAX);
        assert_eq!(u32::parse_saturating("-5").unwrap(), 0);
        assert_eq!(i32::parse_saturating("-99999999999").unwrap(), i32::MIN);
        assert_eq!(
            i64::parse_saturating("999999999999999999999999999999999999999999").unwrap(),
            i64::MAX
        );
        assert_eq!(f32::parse_saturating("1e300").unwrap(), f32::MAX);
        assert_eq!(f64::parse_saturating(" 2.5 ").unwrap(), 2.5);
        assert!(u32::parse_saturating("abc").is_err());
        assert!(f32::parse_saturating("").is_err());
    }

    #[test]
    fn test_index_conversions() {
        assert_eq!(7_u32.to_usize(), Some(7));
        assert_eq!((-1_i32).to_usize(), None);
        assert_eq!(u32::from_usize(usize::MAX), None);
        assert_eq!(i64::from_usize(3), Some(3));
        assert_eq!(u32::MAX.successor(), u32::MAX);
        assert_eq!(4_i32.successor(), 5);
    }

    #[test]
    fn test_atomic_cell_claim() {
        let cell = <u32 as Index>::Atomic::with_value(u32::INVALID);
        assert_eq!(cell.compare_exchange_value(u32::INVALID, 3), Ok(u32::INVALID));
        assert_eq!(cell.compare_exchange_value(u32::INVALID, 4), Err(3));
        assert_eq!(cell.load_value(), 3);
        cell.store_value(9);
        assert_eq!(cell.load_value(), 9);
    }

    #[test]
    fn test_value_type_limits() {
        let limits = ValueType::U32.limits().unwrap();
        assert_eq!(limits.max, "4294967295");
        assert_eq!(limits.invalid, "4294967295");
        assert_eq!(limits.all_zeros, "0");

        let limits = ValueType::I32.limits().unwrap();
        assert_eq!(limits.invalid, "-1");

        assert!(matches!(
            ValueType::Str.limits(),
            Err(GraphError::UnsupportedType("string"))
        ));
        assert!(matches!(
            ValueType::Bool.limits(),
            Err(GraphError::UnsupportedType("bool"))
        ));
    }

    #[test]
    fn test_value_type_validate() {
        assert!(ValueType::Bool.validate("true"));
        assert!(ValueType::Bool.validate("0"));
        assert!(!ValueType::Bool.validate("yes"));
        assert!(ValueType::U32.validate("12"));
        assert!(!ValueType::U32.validate("-12"));
        assert!(ValueType::I32.validate("-12"));
        assert!(!ValueType::F64.validate("x1"));
        assert!(ValueType::Str.validate("anything"));
    }
}
