use alloc::sync::Arc;

use crate::range::OverscanPolicy;
use crate::size_model::SizeSource;
use crate::state::ScrollNotification;
use crate::types::{Align, VisibleRange};
use crate::virtual_scroll::VirtualScroll;

/// Overscan used by [`VirtualScrollOptions::default`].
pub const DEFAULT_OVERSCAN: usize = 10;

/// Fired by a render pass when the overscanned range differs from the last one reported.
///
/// `None` means the list became empty and every previously reported index is stale.
pub type OnRowsRenderedCallback = Arc<dyn Fn(Option<VisibleRange>) + Send + Sync>;

/// Fired whenever a new authoritative scroll offset is accepted.
pub type OnScrollCallback = Arc<dyn Fn(ScrollNotification) + Send + Sync>;

/// A callback fired when the engine's state changes and the host should re-render.
///
/// The second argument is `is_scrolling`.
pub type OnChangeCallback = Arc<dyn Fn(&VirtualScroll, bool) + Send + Sync>;

/// Initial scroll offset configuration.
#[derive(Clone)]
pub enum InitialOffset {
    /// A fixed initial offset.
    Value(u64),
    /// A lazily evaluated initial offset provider (called by `VirtualScroll::new`).
    Provider(Arc<dyn Fn() -> u64 + Send + Sync>),
}

impl InitialOffset {
    pub(crate) fn resolve(&self) -> u64 {
        match self {
            Self::Value(v) => *v,
            Self::Provider(f) => f(),
        }
    }
}

impl Default for InitialOffset {
    fn default() -> Self {
        Self::Value(0)
    }
}

impl core::fmt::Debug for InitialOffset {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

/// Configuration for [`crate::VirtualScroll`].
///
/// Cheap to clone: the size provider and callbacks live in `Arc`s, so hosts can tweak a field and
/// call `VirtualScroll::set_options` without reallocating closures.
#[derive(Clone)]
pub struct VirtualScrollOptions {
    pub count: usize,
    pub size: SizeSource,
    /// Items materialized beyond each edge of the visible range.
    pub overscan: usize,
    pub overscan_policy: OverscanPolicy,
    /// Viewport extent along the scroll axis before the host reports one.
    pub viewport_size: u32,
    /// The host sizes its scroll container to the estimated total size instead of the viewport
    /// (e.g. when the page itself scrolls).
    pub auto_height: bool,
    /// Alignment used by `VirtualScroll::scroll_to`.
    pub scroll_to_alignment: Align,
    /// An item to bring into view on the first render pass.
    pub scroll_to_index: Option<usize>,
    pub initial_offset: InitialOffset,
    /// Quiet period after the last scroll event before `is_scrolling` resets.
    pub is_scrolling_reset_delay_ms: u64,

    pub on_rows_rendered: Option<OnRowsRenderedCallback>,
    pub on_scroll: Option<OnScrollCallback>,
    pub on_change: Option<OnChangeCallback>,
}

impl Default for VirtualScrollOptions {
    fn default() -> Self {
        Self {
            count: 0,
            size: SizeSource::default(),
            overscan: DEFAULT_OVERSCAN,
            overscan_policy: OverscanPolicy::Symmetric,
            viewport_size: 0,
            auto_height: false,
            scroll_to_alignment: Align::Auto,
            scroll_to_index: None,
            initial_offset: InitialOffset::default(),
            is_scrolling_reset_delay_ms: 150,
            on_rows_rendered: None,
            on_scroll: None,
            on_change: None,
        }
    }
}

impl VirtualScrollOptions {
    /// Every item is `size` units long.
    pub fn fixed(count: usize, size: u32) -> Self {
        Self {
            count,
            size: SizeSource::Fixed(size),
            ..Self::default()
        }
    }

    /// Items start at `estimate(i)` and are refined by measurements.
    pub fn estimated(
        count: usize,
        estimate: impl Fn(usize) -> u32 + Send + Sync + 'static,
    ) -> Self {
        Self {
            count,
            size: SizeSource::estimated(estimate),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: SizeSource) -> Self {
        self.size = size;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_overscan_policy(mut self, policy: OverscanPolicy) -> Self {
        self.overscan_policy = policy;
        self
    }

    pub fn with_viewport_size(mut self, viewport_size: u32) -> Self {
        self.viewport_size = viewport_size;
        self
    }

    pub fn with_auto_height(mut self, auto_height: bool) -> Self {
        self.auto_height = auto_height;
        self
    }

    pub fn with_scroll_to_alignment(mut self, align: Align) -> Self {
        self.scroll_to_alignment = align;
        self
    }

    pub fn with_scroll_to_index(mut self, index: Option<usize>) -> Self {
        self.scroll_to_index = index;
        self
    }

    pub fn with_initial_offset(mut self, initial_offset: InitialOffset) -> Self {
        self.initial_offset = initial_offset;
        self
    }

    pub fn with_initial_offset_value(mut self, initial_offset: u64) -> Self {
        self.initial_offset = InitialOffset::Value(initial_offset);
        self
    }

    pub fn with_initial_offset_provider(
        mut self,
        initial_offset: impl Fn() -> u64 + Send + Sync + 'static,
    ) -> Self {
        self.initial_offset = InitialOffset::Provider(Arc::new(initial_offset));
        self
    }

    pub fn with_is_scrolling_reset_delay_ms(mut self, delay_ms: u64) -> Self {
        self.is_scrolling_reset_delay_ms = delay_ms;
        self
    }

    pub fn with_on_rows_rendered(
        mut self,
        f: Option<impl Fn(Option<VisibleRange>) + Send + Sync + 'static>,
    ) -> Self {
        self.on_rows_rendered = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_scroll(
        mut self,
        f: Option<impl Fn(ScrollNotification) + Send + Sync + 'static>,
    ) -> Self {
        self.on_scroll = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_change(
        mut self,
        f: Option<impl Fn(&VirtualScroll, bool) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = f.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for VirtualScrollOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VirtualScrollOptions")
            .field("count", &self.count)
            .field("size", &self.size)
            .field("overscan", &self.overscan)
            .field("overscan_policy", &self.overscan_policy)
            .field("viewport_size", &self.viewport_size)
            .field("auto_height", &self.auto_height)
            .field("scroll_to_alignment", &self.scroll_to_alignment)
            .field("scroll_to_index", &self.scroll_to_index)
            .field("initial_offset", &self.initial_offset)
            .field(
                "is_scrolling_reset_delay_ms",
                &self.is_scrolling_reset_delay_ms,
            )
            .finish_non_exhaustive()
    }
}
