use alloc::vec::Vec;
use core::cell::Cell;

use crate::options::VirtualScrollOptions;
use crate::range::{apply_overscan, compute_visible_range};
use crate::scroll::{self, ScrollController, ScrollToIndex};
use crate::size_model::SizeModel;
use crate::state::ScrollState;
use crate::types::{Align, RenderItem, Rendered, RowRenderArgs, ScrollDirection, VisibleRange};

/// A headless windowing engine for one list.
///
/// It owns the [`SizeModel`] and the [`ScrollController`] and turns their state into the set of
/// rows a host must materialize:
/// - Raw scroll events go to [`Self::on_scroll`]; measurements to [`Self::measure`].
/// - Once per frame the host calls [`Self::update`], which recomputes the overscanned range and
///   reports it through `on_rows_rendered` only when it changed.
/// - [`Self::render`] / [`Self::for_each_item_to_render`] walk the current range.
///
/// Everything runs synchronously on the caller's thread.
#[derive(Clone, Debug)]
pub struct VirtualScroll {
    options: VirtualScrollOptions,
    sizes: SizeModel,
    scroll: ScrollController,
    rendered: Option<VisibleRange>,

    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl VirtualScroll {
    /// Creates an engine from options.
    ///
    /// `options.initial_offset` is applied immediately; `options.scroll_to_index` is queued for
    /// the first render pass.
    pub fn new(options: VirtualScrollOptions) -> Self {
        vdebug!(
            count = options.count,
            overscan = options.overscan,
            viewport_size = options.viewport_size,
            "VirtualScroll::new"
        );
        let sizes = SizeModel::new(options.count, options.size.clone());
        let mut scroll =
            ScrollController::new(options.initial_offset.resolve(), options.viewport_size);
        if let Some(index) = options.scroll_to_index {
            scroll.scroll_to_index(index, options.scroll_to_alignment, options.count);
        }
        Self {
            options,
            sizes,
            scroll,
            rendered: None,
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        }
    }

    pub fn options(&self) -> &VirtualScrollOptions {
        &self.options
    }

    /// Replaces the options, rebuilding only what changed.
    ///
    /// A new size source drops every measurement; a count change keeps surviving sizes. A new
    /// `scroll_to_index`/`scroll_to_alignment` pair queues a scroll-to request.
    pub fn set_options(&mut self, options: VirtualScrollOptions) {
        let prev_count = self.options.count;
        let prev_request = (
            self.options.scroll_to_index,
            self.options.scroll_to_alignment,
        );
        let size_unchanged = self.options.size.same_as(&options.size);
        self.options = options;
        vtrace!(
            count = self.options.count,
            overscan = self.options.overscan,
            "VirtualScroll::set_options"
        );

        if !size_unchanged {
            self.sizes.set_source(self.options.size.clone());
        }
        if self.options.count != prev_count {
            self.sizes.set_count(self.options.count);
        }

        let request = (
            self.options.scroll_to_index,
            self.options.scroll_to_alignment,
        );
        if let (Some(index), align) = request {
            if request != prev_request {
                self.scroll
                    .scroll_to_index(index, align, self.options.count);
            }
        }

        self.notify();
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut VirtualScrollOptions)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    fn notify_now(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(self, self.scroll.is_scrolling());
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Batches multiple updates into a single `on_change` notification.
    ///
    /// On a typical frame a host reports a scroll event, a few measurements, and then runs
    /// `update`; without batching each step may trigger `on_change`.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 && self.notify_pending.replace(false) {
            self.notify_now();
        }
    }

    fn emit_scroll(&mut self) {
        let Some(notification) = self.scroll.take_notification() else {
            return;
        };
        vtrace!(
            scroll_offset = notification.scroll_offset,
            viewport_size = notification.viewport_size,
            content_size = notification.content_size,
            "scroll notification"
        );
        if let Some(cb) = &self.options.on_scroll {
            cb(notification);
        }
    }

    /// Runs a render pass with new inputs.
    ///
    /// Reports the overscanned range through `on_rows_rendered` when any of its bounds changed
    /// since the last report, including the transition to an empty list. Calling it again with
    /// unchanged inputs reports nothing.
    pub fn update(
        &mut self,
        item_count: usize,
        viewport_size: u32,
        overscan_count: usize,
    ) -> Option<VisibleRange> {
        if item_count != self.options.count {
            self.options.count = item_count;
            self.sizes.set_count(item_count);
        }
        self.options.overscan = overscan_count;
        let (range, changed) = self.render_pass(viewport_size);
        if changed {
            self.notify();
        }
        range
    }

    fn render_pass(&mut self, viewport_size: u32) -> (Option<VisibleRange>, bool) {
        let mut moved = self
            .scroll
            .sync_bounds(viewport_size, self.sizes.total_size());
        let materialized = self.visible_range().map(|r| r.overscanned());
        let before = self.scroll.offset();
        if self.scroll.apply_pending(&self.sizes, materialized).is_some() {
            moved |= self.scroll.offset() != before;
        }
        if moved {
            self.emit_scroll();
        }

        let count = self.sizes.len();
        let range = self.visible_range();
        if let Some(range) = range {
            // overscan_start <= start <= stop <= overscan_stop < count
            if let Err(err) = range.validate(count) {
                panic!("{err}");
            }
        }

        if range == self.rendered {
            return (range, moved);
        }
        vtrace!(?range, prev = ?self.rendered, count, "rows rendered");
        self.rendered = range;
        if let Some(cb) = &self.options.on_rows_rendered {
            cb(range);
        }
        (range, true)
    }

    /// Re-runs the render pass with the current inputs and fires `on_change` unconditionally.
    ///
    /// The rows-rendered report is still deduplicated.
    pub fn force_update(&mut self) {
        vdebug!("force_update");
        self.render_pass(self.scroll.viewport_size());
        self.notify();
    }

    /// Forgets every measurement and goes back to the size source.
    pub fn measure_all_rows(&mut self) {
        vdebug!(count = self.sizes.len(), "measure_all_rows");
        self.sizes.reset();
        self.force_update();
    }

    /// Recomputes sizes from `index` onward (e.g. after the item at `index` changed structure).
    pub fn recompute_row_sizes(&mut self, index: usize) {
        self.sizes.invalidate_from(index);
        self.force_update();
    }

    /// The range the current state maps to, computed on demand without side effects.
    pub fn visible_range(&self) -> Option<VisibleRange> {
        let count = self.sizes.len();
        let visible =
            compute_visible_range(&self.sizes, self.scroll.offset(), self.scroll.viewport_size())?;
        Some(apply_overscan(
            visible,
            self.options.overscan,
            count,
            self.scroll.direction(),
            self.options.overscan_policy,
        ))
    }

    /// The range last reported through `on_rows_rendered`.
    pub fn rendered_range(&self) -> Option<VisibleRange> {
        self.rendered
    }

    /// Feeds a raw scroll event from the viewport.
    ///
    /// The offset is clamped into `[0, content_size - viewport_size]`. Returns `false` when the
    /// event was ignored because a scroll-to-index request has not been rendered yet.
    pub fn on_scroll(&mut self, raw_offset: u64, viewport_size: u32, content_size: u64) -> bool {
        if !self
            .scroll
            .on_scroll(raw_offset, viewport_size, content_size)
        {
            return false;
        }
        self.emit_scroll();
        self.notify();
        true
    }

    /// Same as `on_scroll`, using the current viewport and the estimated total size.
    pub fn set_scroll_offset(&mut self, offset: u64) -> bool {
        let viewport_size = self.scroll.viewport_size();
        let content_size = self.sizes.total_size();
        self.on_scroll(offset, viewport_size, content_size)
    }

    /// Applies a user scroll (wheel/drag) and marks the engine as scrolling.
    pub fn apply_scroll_event(&mut self, offset: u64, now_ms: u64) -> bool {
        vtrace!(offset, now_ms, "apply_scroll_event");
        let mut accepted = false;
        self.batch_update(|v| {
            accepted = v.set_scroll_offset(offset);
            if accepted {
                v.notify_scroll_event(now_ms);
            }
        });
        accepted
    }

    /// Queues a request to bring `index` into view on the next render pass.
    ///
    /// Returns `false` (and does nothing) when `index` is out of range.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> bool {
        let accepted = self.scroll.scroll_to_index(index, align, self.sizes.len());
        if accepted {
            self.notify();
        }
        accepted
    }

    /// `scroll_to_index` with the configured `scroll_to_alignment`.
    pub fn scroll_to(&mut self, index: usize) -> bool {
        self.scroll_to_index(index, self.options.scroll_to_alignment)
    }

    /// The offset a scroll-to-index request would apply right now.
    ///
    /// Under [`Align::Auto`], rows of the current overscanned range keep the current offset.
    pub fn scroll_to_index_offset(&self, index: usize, align: Align) -> Option<u64> {
        scroll::scroll_to_index_offset(
            &self.sizes,
            index,
            align,
            self.scroll.offset(),
            self.scroll.viewport_size(),
            self.visible_range().map(|r| r.overscanned()),
        )
    }

    /// Records a measurement reported by the host.
    ///
    /// Stale indexes (beyond the current count) are dropped and return `false`.
    pub fn measure(&mut self, index: usize, size: u32) -> bool {
        match self.sizes.set_measured_size(index, size) {
            Ok(delta) => {
                if delta != 0 {
                    self.notify();
                }
                true
            }
            Err(_err) => {
                vdebug!(%_err, "dropping stale measurement");
                false
            }
        }
    }

    pub fn measure_many(&mut self, measurements: impl IntoIterator<Item = (usize, u32)>) {
        self.batch_update(|v| {
            for (index, size) in measurements {
                v.measure(index, size);
            }
        });
    }

    /// Records a measurement and keeps the visible content in place.
    ///
    /// When the item starts before the current offset, the offset moves by the size delta so the
    /// rows on screen do not jump. Returns the applied offset adjustment.
    pub fn resize_item(&mut self, index: usize, size: u32) -> i64 {
        let Ok(start) = self.sizes.offset(index) else {
            return 0;
        };
        let Ok(delta) = self.sizes.set_measured_size(index, size) else {
            return 0;
        };
        if delta == 0 {
            return 0;
        }
        let offset = self.scroll.offset();
        if start >= offset {
            self.notify();
            return 0;
        }
        let adjusted = if delta > 0 {
            offset.saturating_add(delta as u64)
        } else {
            offset.saturating_sub(delta.unsigned_abs())
        };
        self.scroll.set_offset(adjusted);
        self.emit_scroll();
        self.notify();
        delta
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.sizes.is_measured(index)
    }

    /// Calls `f` for each item of the current overscanned range, in ascending order.
    pub fn for_each_item_to_render(&self, mut f: impl FnMut(RenderItem)) {
        let Some(range) = self.visible_range() else {
            return;
        };
        let visible = range.visible();
        let mut start = self.sizes.start_of(range.overscan_start_index);
        for index in range.overscanned().iter() {
            let size = self.sizes.size_unchecked(index);
            f(RenderItem {
                index,
                start,
                size,
                is_visible: visible.contains(index),
            });
            start = start.saturating_add(size as u64);
        }
    }

    pub fn items_to_render(&self) -> Vec<RenderItem> {
        let mut out = Vec::new();
        self.collect_items_to_render(&mut out);
        out
    }

    /// Collects the current items into `out` (clears `out` first).
    ///
    /// Prefer this over `items_to_render` when a scratch buffer can be reused across frames.
    pub fn collect_items_to_render(&self, out: &mut Vec<RenderItem>) {
        out.clear();
        self.for_each_item_to_render(|it| out.push(it));
    }

    /// Invokes the item renderer once per item of the current overscanned range, or the
    /// no-rows renderer when the list is empty.
    pub fn render<T>(
        &self,
        mut row_renderer: impl FnMut(RowRenderArgs) -> T,
        no_rows_renderer: impl FnOnce() -> T,
    ) -> Rendered<T> {
        if self.sizes.is_empty() {
            return Rendered::NoRows(no_rows_renderer());
        }
        let is_scrolling = self.scroll.is_scrolling();
        let mut rows = Vec::new();
        self.for_each_item_to_render(|it| {
            rows.push(row_renderer(RowRenderArgs {
                index: it.index,
                is_scrolling,
                is_visible: it.is_visible,
                start: it.start,
                size: it.size,
            }));
        });
        Rendered::Rows(rows)
    }

    pub fn count(&self) -> usize {
        self.sizes.len()
    }

    pub fn overscan(&self) -> usize {
        self.options.overscan
    }

    pub fn sizes(&self) -> &SizeModel {
        &self.sizes
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll.offset()
    }

    pub fn viewport_size(&self) -> u32 {
        self.scroll.viewport_size()
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.scroll.direction()
    }

    pub fn pending_scroll_to(&self) -> Option<ScrollToIndex> {
        self.scroll.pending()
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_scrolling()
    }

    pub fn set_is_scrolling(&mut self, is_scrolling: bool) {
        if self.scroll.set_is_scrolling(is_scrolling) {
            self.notify();
        }
    }

    pub fn notify_scroll_event(&mut self, now_ms: u64) {
        if self.scroll.notify_scroll_event(now_ms) {
            self.notify();
        }
    }

    /// Resets `is_scrolling` once `is_scrolling_reset_delay_ms` passed since the last event.
    pub fn update_scrolling(&mut self, now_ms: u64) {
        let delay = self.options.is_scrolling_reset_delay_ms;
        if self.scroll.update_scrolling(now_ms, delay) {
            self.notify();
        }
    }

    /// Sum of all item sizes; an estimate until every item has been measured.
    pub fn total_size(&self) -> u64 {
        self.sizes.total_size()
    }

    /// Extent the host should give its scroll container along the scroll axis.
    pub fn container_size(&self) -> u64 {
        if self.options.auto_height {
            self.total_size()
        } else {
            self.scroll.viewport_size() as u64
        }
    }

    pub fn max_scroll_offset(&self) -> u64 {
        scroll::max_scroll_offset(self.total_size(), self.scroll.viewport_size())
    }

    pub fn clamp_scroll_offset(&self, offset: u64) -> u64 {
        offset.min(self.max_scroll_offset())
    }

    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        self.sizes.index_at_offset(offset)
    }

    pub fn item_start(&self, index: usize) -> Option<u64> {
        self.sizes.offset(index).ok()
    }

    pub fn item_size(&self, index: usize) -> Option<u32> {
        self.sizes.size(index).ok()
    }

    pub fn item_end(&self, index: usize) -> Option<u64> {
        let start = self.item_start(index)?;
        let size = self.item_size(index)? as u64;
        Some(start.saturating_add(size))
    }

    /// Returns a lightweight snapshot of the current scroll state.
    pub fn scroll_state(&self) -> ScrollState {
        ScrollState {
            offset: self.scroll.offset(),
            viewport_size: self.scroll.viewport_size(),
            content_size: self.total_size(),
            is_scrolling: self.scroll.is_scrolling(),
        }
    }
}
