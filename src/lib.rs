//! A headless windowing engine for large lists.
//!
//! Only the rows that intersect a fixed-size viewport (plus an overscan margin) are
//! materialized. The crate covers the parts that have to stay correct at every scroll tick:
//! per-item sizes and prefix offsets, offset → index lookup, overscanned visible ranges,
//! scroll-to-index requests, and deduplicated "rows rendered" notifications.
//!
//! It is UI-agnostic. A host is expected to provide:
//! - viewport size and raw scroll offsets
//! - a size source (fixed, or estimates refined by measurements)
//! - the item renderer itself
//!
//! ```
//! use virtual_scroll::{VirtualScroll, VirtualScrollOptions};
//!
//! let mut list = VirtualScroll::new(VirtualScrollOptions::fixed(1000, 20).with_overscan(5));
//! list.on_scroll(200, 500, list.total_size());
//! let range = list.update(1000, 500, 5).unwrap();
//! assert_eq!((range.start_index, range.stop_index), (10, 34));
//! assert_eq!((range.overscan_start_index, range.overscan_stop_index), (5, 39));
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod fenwick;
mod options;
mod range;
mod scroll;
mod size_model;
mod state;
mod types;
mod virtual_scroll;


pub use error::{Error, Result};
pub use options::{
    DEFAULT_OVERSCAN, InitialOffset, OnChangeCallback, OnRowsRenderedCallback, OnScrollCallback,
    VirtualScrollOptions,
};
pub use range::{OverscanPolicy, apply_overscan, compute_visible_range};
pub use scroll::{ScrollController, ScrollToIndex, max_scroll_offset, scroll_to_index_offset};
pub use size_model::{DEFAULT_ESTIMATED_SIZE, EstimateSize, MIN_ITEM_SIZE, SizeModel, SizeSource};
pub use state::{ScrollNotification, ScrollState};
pub use types::{
    Align, IndexRange, Rendered, RenderItem, RowRenderArgs, ScrollDirection, VisibleRange,
};
pub use virtual_scroll::VirtualScroll;
