//! Scroll offset → index range.

use core::cmp;

use crate::size_model::SizeModel;
use crate::types::{IndexRange, ScrollDirection, VisibleRange};

/// How overscan is distributed around the visible range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverscanPolicy {
    /// `overscan` items on both sides.
    #[default]
    Symmetric,
    /// `overscan` items behind, twice as many ahead in the direction of travel.
    ///
    /// Falls back to symmetric when the direction is unknown.
    Directional,
}

/// Computes the smallest index range whose items cover `[scroll_offset, scroll_offset + viewport)`.
///
/// The offset is clamped into the scrollable bounds first, so an overscrolled or stale offset
/// still yields a range that ends on the last item. A zero viewport (before layout) yields the
/// single item under the offset. Returns `None` only for an empty model.
pub fn compute_visible_range(
    sizes: &SizeModel,
    scroll_offset: u64,
    viewport_size: u32,
) -> Option<IndexRange> {
    let count = sizes.len();
    if count == 0 {
        return None;
    }

    let total = sizes.total_size();
    let view = viewport_size as u64;
    let offset = scroll_offset.min(total.saturating_sub(view));

    let start = sizes.index_at_offset(offset)?;
    if view == 0 {
        return Some(IndexRange::new(start, start));
    }

    // Last unit of the viewport that still lies on an item.
    let last = cmp::min(offset.saturating_add(view), total).saturating_sub(1);
    let stop = sizes.index_at_offset(cmp::max(last, offset))?;
    Some(IndexRange::new(start, cmp::max(start, stop)))
}

/// Expands `range` by `overscan` items on each side, clamped to `[0, count - 1]`.
pub fn apply_overscan(
    range: IndexRange,
    overscan: usize,
    count: usize,
    direction: Option<ScrollDirection>,
    policy: OverscanPolicy,
) -> VisibleRange {
    debug_assert!(range.stop_index < count);
    let (before, after) = match (policy, direction) {
        (OverscanPolicy::Directional, Some(ScrollDirection::Forward)) => {
            (overscan, overscan.saturating_mul(2))
        }
        (OverscanPolicy::Directional, Some(ScrollDirection::Backward)) => {
            (overscan.saturating_mul(2), overscan)
        }
        _ => (overscan, overscan),
    };

    let last = count.saturating_sub(1);
    VisibleRange {
        start_index: range.start_index,
        stop_index: range.stop_index,
        overscan_start_index: range.start_index.saturating_sub(before),
        overscan_stop_index: cmp::min(last, range.stop_index.saturating_add(after)),
    }
}
