//! Parameter flag bits

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// How a parameter is given on the command line and whether it must be
///
/// Three independent groups: argument arity, value cardinality and presence.
/// Combine with `|`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParameterFlags(u32);

impl ParameterFlags {
    /// `--name` alone; only valid for bool parameters
    pub const NO_ARGUMENT: Self = Self(0x01);
    /// `--name value` or `--name=value`
    pub const REQUIRED_ARGUMENT: Self = Self(0x02);
    /// `--name` or `--name=value`
    pub const OPTIONAL_ARGUMENT: Self = Self(0x04);
    /// One value; commas are rejected
    pub const SINGLE_VALUE: Self = Self(0x20);
    /// Comma-separated list; repeated options append
    pub const MULTI_VALUE: Self = Self(0x40);
    /// Must end up with a non-empty value
    pub const REQUIRED_PARAMETER: Self = Self(0x100);
    /// May stay empty
    pub const OPTIONAL_PARAMETER: Self = Self(0x200);

    /// `OPTIONAL_ARGUMENT | SINGLE_VALUE | OPTIONAL_PARAMETER`
    pub const DEFAULT: Self = Self(0x04 | 0x20 | 0x200);

    /// Raw bit pattern
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every bit of `other` is set
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether the value is a comma-separated list
    #[must_use]
    pub const fn is_multi_value(self) -> bool {
        self.contains(Self::MULTI_VALUE)
    }

    /// Whether the parameter must end up with a value
    #[must_use]
    pub const fn is_required(self) -> bool {
        self.contains(Self::REQUIRED_PARAMETER)
    }
}

impl Default for ParameterFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BitOr for ParameterFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ParameterFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for ParameterFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(ParameterFlags, &str); 7] = [
            (ParameterFlags::NO_ARGUMENT, "NO_ARGUMENT"),
            (ParameterFlags::REQUIRED_ARGUMENT, "REQUIRED_ARGUMENT"),
            (ParameterFlags::OPTIONAL_ARGUMENT, "OPTIONAL_ARGUMENT"),
            (ParameterFlags::SINGLE_VALUE, "SINGLE_VALUE"),
            (ParameterFlags::MULTI_VALUE, "MULTI_VALUE"),
            (ParameterFlags::REQUIRED_PARAMETER, "REQUIRED_PARAMETER"),
            (ParameterFlags::OPTIONAL_PARAMETER, "OPTIONAL_PARAMETER"),
        ];
        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "ParameterFlags({})", names.join(" | "))
    }
}

/// How a parameter consumes its argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Arity {
    None,
    Required,
    Optional,
}

impl ParameterFlags {
    pub(crate) const fn arity(self) -> Arity {
        if self.contains(Self::NO_ARGUMENT) {
            Arity::None
        } else if self.contains(Self::REQUIRED_ARGUMENT) {
            Arity::Required
        } else {
            Arity::Optional
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flags() {
        let flags = ParameterFlags::default();
        assert!(flags.contains(ParameterFlags::OPTIONAL_ARGUMENT));
        assert!(!flags.is_multi_value());
        assert!(!flags.is_required());
        assert_eq!(flags.bits(), 0x224);
        assert_eq!(flags.arity(), Arity::Optional);
    }

    #[test]
    fn test_combine_and_debug() {
        let mut flags = ParameterFlags::REQUIRED_ARGUMENT | ParameterFlags::MULTI_VALUE;
        flags |= ParameterFlags::REQUIRED_PARAMETER;
        assert!(flags.is_required());
        assert_eq!(flags.arity(), Arity::Required);
        assert_eq!(
            format!("{flags:?}"),
            "ParameterFlags(REQUIRED_ARGUMENT | MULTI_VALUE | REQUIRED_PARAMETER)"
        );
    }
}
