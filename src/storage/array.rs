//! Named backing arrays with explicit allocation state and placement
//!
//! Every array in the graph store goes through [`Array1D`], so allocation
//! failures surface as [`GraphError::Allocation`] instead of aborting, and a
//! partially built structure can always be released.

use crate::error::{GraphError, Result};

/// Where an array's authoritative copy lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Host memory only
    #[default]
    Host,
    /// Device memory only; host reads are rejected
    Device,
    /// Kept on both sides
    Mirrored,
}

impl Placement {
    /// Whether the host copy may be read
    #[must_use]
    pub const fn on_host(self) -> bool {
        matches!(self, Self::Host | Self::Mirrored)
    }

    /// Whether the array must be present on the device
    #[must_use]
    pub const fn on_device(self) -> bool {
        matches!(self, Self::Device | Self::Mirrored)
    }
}

/// Fixed-length array with allocate/release lifecycle
#[derive(Debug, Clone)]
pub struct Array1D<T> {
    name: &'static str,
    data: Vec<T>,
    allocated: bool,
    placement: Placement,
}

impl<T: Copy> Array1D<T> {
    /// Create an unallocated array
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            data: Vec::new(),
            allocated: false,
            placement: Placement::Host,
        }
    }

    /// Wrap an existing vector as an allocated host array
    #[must_use]
    pub fn from_vec(name: &'static str, data: Vec<T>) -> Self {
        Self {
            name,
            data,
            allocated: true,
            placement: Placement::Host,
        }
    }

    /// Reserve `len` elements, each set to `fill`
    ///
    /// Calling this again with the same length keeps the existing contents.
    /// A different length releases and reallocates.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `len` elements overflow the address space
    /// - `Allocation` if the memory cannot be reserved
    pub fn allocate(&mut self, len: usize, fill: T) -> Result<()> {
        if self.allocated && self.data.len() == len {
            return Ok(());
        }
        self.release();

        if len.checked_mul(std::mem::size_of::<T>()).is_none() {
            return Err(GraphError::invalid(format!(
                "array `{}` of {len} elements overflows usize bytes",
                self.name
            )));
        }

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| GraphError::allocation(self.name, len))?;
        data.resize(len, fill);

        self.data = data;
        self.allocated = true;
        Ok(())
    }

    /// Free the backing storage; safe to call repeatedly
    pub fn release(&mut self) {
        self.data = Vec::new();
        self.allocated = false;
    }

    /// Array name (for diagnostics)
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether storage is currently reserved
    #[must_use]
    pub const fn is_allocated(&self) -> bool {
        self.allocated
    }

    /// Number of elements (0 when released)
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the array holds no elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current placement
    #[must_use]
    pub const fn placement(&self) -> Placement {
        self.placement
    }

    /// Change the placement directive
    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
    }

    /// Host view of the contents
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the array is released or device-only
    pub fn as_slice(&self) -> Result<&[T]> {
        self.check_host()?;
        Ok(&self.data)
    }

    /// Mutable host view of the contents
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the array is released or device-only
    pub fn as_mut_slice(&mut self) -> Result<&mut [T]> {
        self.check_host()?;
        Ok(&mut self.data)
    }

    /// Contents regardless of placement, for uploading to the device
    #[cfg(feature = "gpu")]
    pub(crate) fn staging_slice(&self) -> &[T] {
        &self.data
    }

    fn check_host(&self) -> Result<()> {
        if !self.allocated {
            return Err(GraphError::invalid(format!(
                "array `{}` is not allocated",
                self.name
            )));
        }
        if !self.placement.on_host() {
            return Err(GraphError::invalid(format!(
                "array `{}` is device-only",
                self.name
            )));
        }
        Ok(())
    }
}
