use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::error::{Error, Result};
use crate::fenwick::Fenwick;

/// Smallest size an item can have. Zero-sized items would make offset lookups ambiguous.
pub const MIN_ITEM_SIZE: u32 = 1;

/// Estimate used by [`SizeSource::default`].
pub const DEFAULT_ESTIMATED_SIZE: u32 = 30;

pub type EstimateSize = Arc<dyn Fn(usize) -> u32 + Send + Sync>;

/// Per-index size provider, selected once at configuration time.
#[derive(Clone)]
pub enum SizeSource {
    /// Every item has the same size. Offsets are computed in `O(1)` without a table.
    Fixed(u32),
    /// Sizes start as estimates and are replaced by measurements as items are materialized.
    ///
    /// The provider must be deterministic for a given index.
    Estimated(EstimateSize),
}

impl SizeSource {
    pub fn estimated(estimate: impl Fn(usize) -> u32 + Send + Sync + 'static) -> Self {
        Self::Estimated(Arc::new(estimate))
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }

    pub(crate) fn resolve(&self, index: usize) -> u32 {
        match self {
            Self::Fixed(size) => clamp_size(*size),
            Self::Estimated(f) => clamp_size(f(index)),
        }
    }

    /// Same variant and, for providers, the same closure.
    pub(crate) fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Fixed(a), Self::Fixed(b)) => a == b,
            (Self::Estimated(a), Self::Estimated(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Default for SizeSource {
    fn default() -> Self {
        Self::estimated(|_| DEFAULT_ESTIMATED_SIZE)
    }
}

impl From<u32> for SizeSource {
    fn from(size: u32) -> Self {
        Self::Fixed(size)
    }
}

impl core::fmt::Debug for SizeSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Fixed(size) => f.debug_tuple("Fixed").field(size).finish(),
            Self::Estimated(_) => f.write_str("Estimated(..)"),
        }
    }
}

pub(crate) fn clamp_size(size: u32) -> u32 {
    if size < MIN_ITEM_SIZE {
        vwarn!(size, min = MIN_ITEM_SIZE, "clamping degenerate item size");
        return MIN_ITEM_SIZE;
    }
    size
}

#[derive(Clone, Debug)]
enum Layout {
    Fixed(u32),
    Table(SizeTable),
}

#[derive(Clone, Debug)]
struct SizeTable {
    sizes: Vec<u32>,
    measured: Vec<bool>,
    sums: Fenwick,
}

impl SizeTable {
    fn build(count: usize, source: &SizeSource) -> Self {
        let sizes: Vec<u32> = (0..count).map(|i| source.resolve(i)).collect();
        let sums = Fenwick::from_sizes(&sizes);
        Self {
            measured: alloc::vec![false; count],
            sizes,
            sums,
        }
    }
}

/// Sizes and cumulative offsets of every item along the scroll axis.
///
/// Fixed sizing stores nothing per item. Estimated sizing keeps a size per index plus a Fenwick
/// tree of prefix sums, so a measurement is an `O(log n)` point update and offset lookups stay
/// `O(log n)` without ever walking the table.
#[derive(Clone, Debug)]
pub struct SizeModel {
    source: SizeSource,
    count: usize,
    layout: Layout,
}

impl SizeModel {
    pub fn new(count: usize, source: SizeSource) -> Self {
        let layout = Self::initial_layout(count, &source);
        Self {
            source,
            count,
            layout,
        }
    }

    fn initial_layout(count: usize, source: &SizeSource) -> Layout {
        match source {
            SizeSource::Fixed(size) => Layout::Fixed(clamp_size(*size)),
            SizeSource::Estimated(_) => Layout::Table(SizeTable::build(count, source)),
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn source(&self) -> &SizeSource {
        &self.source
    }

    /// `true` while offsets are computed in closed form.
    pub fn is_fixed(&self) -> bool {
        matches!(self.layout, Layout::Fixed(_))
    }

    fn check(&self, index: usize) -> Result<()> {
        if index < self.count {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index,
                count: self.count,
            })
        }
    }

    pub fn size(&self, index: usize) -> Result<u32> {
        self.check(index)?;
        Ok(self.size_unchecked(index))
    }

    /// Leading edge of `index`: the sum of all sizes before it.
    pub fn offset(&self, index: usize) -> Result<u64> {
        self.check(index)?;
        Ok(self.start_of(index))
    }

    /// Whether the size at `index` is authoritative. Fixed sizes always are.
    pub fn is_measured(&self, index: usize) -> bool {
        match &self.layout {
            Layout::Fixed(_) => index < self.count,
            Layout::Table(t) => t.measured.get(index).copied().unwrap_or(false),
        }
    }

    /// Sum of all sizes, using the estimate for anything not yet measured.
    pub fn total_size(&self) -> u64 {
        match &self.layout {
            Layout::Fixed(size) => (self.count as u64).saturating_mul(*size as u64),
            Layout::Table(t) => t.sums.total(),
        }
    }

    /// Records an authoritative measurement and returns the size delta it applied.
    ///
    /// Re-reporting the current size is a no-op. A zero size is clamped to [`MIN_ITEM_SIZE`].
    pub fn set_measured_size(&mut self, index: usize, size: u32) -> Result<i64> {
        self.check(index)?;
        let size = clamp_size(size);
        if let Layout::Fixed(fixed) = self.layout {
            if fixed == size {
                return Ok(0);
            }
            vdebug!(index, size, fixed, "promoting fixed layout to a measured table");
            self.layout = Layout::Table(SizeTable::build(self.count, &SizeSource::Fixed(fixed)));
        }
        let Layout::Table(t) = &mut self.layout else {
            return Ok(0);
        };

        t.measured[index] = true;
        let cur = t.sizes[index];
        if cur == size {
            return Ok(0);
        }
        t.sizes[index] = size;
        let delta = size as i64 - cur as i64;
        t.sums.add(index, delta);
        vtrace!(index, size, delta, "set_measured_size");
        Ok(delta)
    }

    /// Forgets measurements at `index` and beyond and recomputes their offsets from the source.
    ///
    /// Use it when items change structurally (reordered, replaced) rather than just visually.
    pub fn invalidate_from(&mut self, index: usize) {
        if index >= self.count {
            return;
        }
        vdebug!(index, count = self.count, "invalidate_from");
        if index == 0 {
            self.layout = Self::initial_layout(self.count, &self.source);
            return;
        }
        let Layout::Table(t) = &mut self.layout else {
            return;
        };
        for i in index..self.count {
            t.sizes[i] = self.source.resolve(i);
            t.measured[i] = false;
        }
        t.sums = Fenwick::from_sizes(&t.sizes);
    }

    /// Drops every measurement.
    pub fn reset(&mut self) {
        self.layout = Self::initial_layout(self.count, &self.source);
    }

    /// Replaces the size source; all measurements are dropped.
    pub fn set_source(&mut self, source: SizeSource) {
        self.source = source;
        self.reset();
    }

    /// Grows or shrinks the model, keeping sizes of surviving indices.
    pub fn set_count(&mut self, count: usize) {
        if self.count == count {
            return;
        }
        vdebug!(from = self.count, to = count, "set_count");
        if let Layout::Table(t) = &mut self.layout {
            if count < self.count {
                t.sizes.truncate(count);
                t.measured.truncate(count);
                t.sums.truncate(count);
            } else {
                t.sizes.reserve_exact(count - self.count);
                t.measured.reserve_exact(count - self.count);
                for i in self.count..count {
                    let size = self.source.resolve(i);
                    t.sizes.push(size);
                    t.measured.push(false);
                    t.sums.push(size);
                }
            }
            debug_assert_eq!(t.sums.len(), count);
        }
        self.count = count;
    }

    /// Index of the item whose interval contains `offset`, clamped to the last item.
    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        let index = match &self.layout {
            Layout::Fixed(size) => {
                let i = offset / *size as u64;
                usize::try_from(i).unwrap_or(usize::MAX).min(self.count - 1)
            }
            Layout::Table(t) => t.sums.index_at(offset),
        };
        Some(index)
    }

    pub(crate) fn size_unchecked(&self, index: usize) -> u32 {
        match &self.layout {
            Layout::Fixed(size) => *size,
            Layout::Table(t) => t.sizes[index],
        }
    }

    pub(crate) fn start_of(&self, index: usize) -> u64 {
        match &self.layout {
            Layout::Fixed(size) => (index as u64).saturating_mul(*size as u64),
            Layout::Table(t) => t.sums.prefix_sum(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_offsets_are_closed_form() {
        let m = SizeModel::new(1000, SizeSource::Fixed(20));
        assert!(m.is_fixed());
        for i in [0usize, 1, 17, 500, 999] {
            assert_eq!(m.offset(i), Ok(i as u64 * 20));
            assert_eq!(m.size(i), Ok(20));
        }
        assert_eq!(m.total_size(), 20_000);
    }

    #[test]
    fn out_of_range_access_is_an_error() {
        let mut m = SizeModel::new(3, SizeSource::estimated(|_| 10));
        let err = Error::IndexOutOfRange { index: 3, count: 3 };
        assert_eq!(m.size(3), Err(err));
        assert_eq!(m.offset(3), Err(err));
        assert_eq!(m.set_measured_size(3, 5), Err(err));
    }

    #[test]
    fn measuring_first_row_shifts_following_offsets() {
        let mut m = SizeModel::new(100, SizeSource::estimated(|_| 30));
        assert_eq!(m.offset(1), Ok(30));
        assert_eq!(m.set_measured_size(0, 80), Ok(50));
        assert_eq!(m.offset(1), Ok(80));
        assert_eq!(m.offset(2), Ok(110));
        assert!(m.is_measured(0));
        assert!(!m.is_measured(1));
        assert_eq!(m.total_size(), 100 * 30 + 50);
    }

    #[test]
    fn unchanged_measurement_is_a_noop() {
        let mut m = SizeModel::new(4, SizeSource::estimated(|_| 10));
        assert_eq!(m.set_measured_size(2, 10), Ok(0));
        assert!(m.is_measured(2));
        assert_eq!(m.set_measured_size(2, 12), Ok(2));
        assert_eq!(m.set_measured_size(2, 12), Ok(0));
        assert_eq!(m.total_size(), 42);
    }

    #[test]
    fn zero_sizes_are_clamped() {
        let mut m = SizeModel::new(3, SizeSource::estimated(|i| if i == 1 { 0 } else { 5 }));
        assert_eq!(m.size(1), Ok(MIN_ITEM_SIZE));
        m.set_measured_size(0, 0).unwrap();
        assert_eq!(m.size(0), Ok(MIN_ITEM_SIZE));
        assert_eq!(m.total_size(), 1 + 1 + 5);

        let fixed = SizeModel::new(3, SizeSource::Fixed(0));
        assert_eq!(fixed.total_size(), 3);
    }

    #[test]
    fn fixed_layout_promotes_on_measurement_and_demotes_on_reset() {
        let mut m = SizeModel::new(5, SizeSource::Fixed(10));
        assert_eq!(m.set_measured_size(1, 10), Ok(0));
        assert!(m.is_fixed());

        assert_eq!(m.set_measured_size(1, 25), Ok(15));
        assert!(!m.is_fixed());
        assert_eq!(m.offset(2), Ok(35));
        assert_eq!(m.total_size(), 65);

        m.invalidate_from(0);
        assert!(m.is_fixed());
        assert_eq!(m.offset(2), Ok(20));
    }

    #[test]
    fn invalidate_from_keeps_measurements_before_index() {
        let mut m = SizeModel::new(6, SizeSource::estimated(|_| 10));
        for i in 0..6 {
            m.set_measured_size(i, 20).unwrap();
        }
        m.invalidate_from(3);
        assert_eq!(m.size(2), Ok(20));
        assert!(m.is_measured(2));
        assert_eq!(m.size(3), Ok(10));
        assert!(!m.is_measured(3));
        assert_eq!(m.offset(5), Ok(20 * 3 + 10 * 2));
        assert_eq!(m.total_size(), 90);
    }

    #[test]
    fn set_count_preserves_surviving_sizes() {
        let mut m = SizeModel::new(4, SizeSource::estimated(|_| 10));
        m.set_measured_size(1, 40).unwrap();
        m.set_measured_size(3, 40).unwrap();

        m.set_count(2);
        assert_eq!(m.total_size(), 50);
        assert_eq!(m.size(2), Err(Error::IndexOutOfRange { index: 2, count: 2 }));

        m.set_count(5);
        assert_eq!(m.size(1), Ok(40));
        assert_eq!(m.size(3), Ok(10));
        assert!(!m.is_measured(3));
        assert_eq!(m.offset(4), Ok(10 + 40 + 10 + 10));
    }

    #[test]
    fn index_at_offset_clamps_to_last_item() {
        let m = SizeModel::new(10, SizeSource::Fixed(20));
        assert_eq!(m.index_at_offset(0), Some(0));
        assert_eq!(m.index_at_offset(39), Some(1));
        assert_eq!(m.index_at_offset(40), Some(2));
        assert_eq!(m.index_at_offset(u64::MAX), Some(9));

        let v = SizeModel::new(3, SizeSource::estimated(|i| [5, 10, 15][i]));
        assert_eq!(v.index_at_offset(4), Some(0));
        assert_eq!(v.index_at_offset(5), Some(1));
        assert_eq!(v.index_at_offset(29), Some(2));
        assert_eq!(v.index_at_offset(1_000), Some(2));

        assert_eq!(SizeModel::new(0, SizeSource::Fixed(1)).index_at_offset(0), None);
    }
}
