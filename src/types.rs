use alloc::vec::Vec;

use crate::error::{Error, Result};

/// Where a scroll-to-index request places the item inside the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    /// Leave the offset alone when the item is fully inside the viewport, otherwise move the
    /// least distance that brings it fully into view.
    #[default]
    Auto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// An inclusive, non-empty index range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexRange {
    pub start_index: usize,
    pub stop_index: usize, // inclusive
}

impl IndexRange {
    pub fn new(start_index: usize, stop_index: usize) -> Self {
        debug_assert!(start_index <= stop_index);
        Self {
            start_index,
            stop_index,
        }
    }

    pub fn len(&self) -> usize {
        self.stop_index - self.start_index + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start_index <= index && index <= self.stop_index
    }

    pub fn iter(&self) -> core::ops::RangeInclusive<usize> {
        self.start_index..=self.stop_index
    }
}

/// The rows a render pass materializes: the strictly visible range plus its overscan margin.
///
/// This is also the payload of the rows-rendered notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    pub start_index: usize,
    pub stop_index: usize,
    pub overscan_start_index: usize,
    pub overscan_stop_index: usize,
}

impl VisibleRange {
    pub fn visible(&self) -> IndexRange {
        IndexRange::new(self.start_index, self.stop_index)
    }

    pub fn overscanned(&self) -> IndexRange {
        IndexRange::new(self.overscan_start_index, self.overscan_stop_index)
    }

    /// Checks `overscan_start <= start <= stop <= overscan_stop < count`.
    pub fn validate(&self, count: usize) -> Result<()> {
        let ordered = self.overscan_start_index <= self.start_index
            && self.start_index <= self.stop_index
            && self.stop_index <= self.overscan_stop_index;
        if ordered && self.overscan_stop_index < count {
            return Ok(());
        }
        Err(Error::InconsistentRange {
            start_index: self.start_index,
            stop_index: self.stop_index,
            overscan_start_index: self.overscan_start_index,
            overscan_stop_index: self.overscan_stop_index,
            count,
        })
    }
}

/// One item descriptor of the current render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderItem {
    pub index: usize,
    /// Leading edge along the scroll axis.
    pub start: u64,
    pub size: u32,
    /// `false` when the item is only materialized as overscan.
    pub is_visible: bool,
}

impl RenderItem {
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.size as u64)
    }
}

/// Arguments handed to the item renderer, by value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowRenderArgs {
    pub index: usize,
    pub is_scrolling: bool,
    pub is_visible: bool,
    pub start: u64,
    pub size: u32,
}

/// Output of [`crate::VirtualScroll::render`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rendered<T> {
    /// One rendered value per item of the overscanned range, in ascending index order.
    Rows(Vec<T>),
    /// The list is empty; holds the no-rows renderer's output.
    NoRows(T),
}
