//! Runtime configuration
//!
//! An explicit [`Parameters`] registry is created by the caller, filled from
//! the command line or programmatically, and handed to whichever component
//! reads its settings.

mod flags;
mod parameters;

pub use flags::ParameterFlags;
pub use parameters::Parameters;
