//! Fixed-capacity overwrite buffer.
//!
//! Every push evicts the value written `N` pushes earlier and hands it back
//! to the caller, which is what lets a sliding-window mean be updated in
//! constant time without re-summing the window.

/// Circular buffer of the last `N` values pushed.
///
/// Slots that have not been written yet hold `T::default()`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct HistoryBuffer<T, const N: usize> {
    slots: [T; N],
    cursor: usize,
}

impl<T, const N: usize> HistoryBuffer<T, N>
where
    T: Copy + Default,
{
    const NON_ZERO_CAPACITY: () = assert!(N > 0, "history buffer capacity must be non-zero");

    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_ZERO_CAPACITY;
        Self {
            slots: [T::default(); N],
            cursor: 0,
        }
    }

    /// Advance the cursor, store `value` there and return the value it replaced.
    pub fn push(&mut self, value: T) -> T {
        self.cursor = (self.cursor + 1) % N;
        core::mem::replace(&mut self.slots[self.cursor], value)
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<T, const N: usize> Default for HistoryBuffer<T, N>
where
    T: Copy + Default,
{
    fn default() -> Self {
        Self::new()
    }
}
