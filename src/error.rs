//! Error taxonomy shared by the graph store, operators and parameter registry

use thiserror::Error;

/// Errors returned by every fallible core operation
#[derive(Debug, Error)]
pub enum GraphError {
    /// Backing storage could not be reserved at the requested size
    #[error("failed to allocate {len} elements for array `{name}`")]
    Allocation {
        /// Array name
        name: String,
        /// Requested element count
        len: usize,
    },

    /// Inconsistent sizes, out-of-range ids, or otherwise unusable input
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A parameter name was declared more than once
    #[error("parameter `{name}` has been defined before")]
    DuplicateDefinition {
        /// Parameter name
        name: String,
    },

    /// A numeric routine was requested for a type without limits or sentinel
    #[error("type `{0}` has no numeric limits")]
    UnsupportedType(&'static str),

    /// Malformed edge-list input
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// I/O failure while reading graph input
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GraphError {
    /// Shorthand for [`GraphError::InvalidArgument`]
    pub fn invalid<T: Into<String>>(msg: T) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Shorthand for [`GraphError::Allocation`]
    pub fn allocation<T: Into<String>>(name: T, len: usize) -> Self {
        Self::Allocation {
            name: name.into(),
            len,
        }
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GraphError::allocation("row_offsets", 42);
        assert_eq!(
            err.to_string(),
            "failed to allocate 42 elements for array `row_offsets`"
        );

        let err = GraphError::DuplicateDefinition {
            name: "src".to_string(),
        };
        assert_eq!(err.to_string(), "parameter `src` has been defined before");

        let err = GraphError::Parse {
            line: 3,
            message: "missing destination".to_string(),
        };
        assert_eq!(err.to_string(), "line 3: missing destination");
    }
}
