use core::cmp;

use crate::size_model::SizeModel;
use crate::state::ScrollNotification;
use crate::types::{Align, IndexRange, ScrollDirection};

/// A caller-driven request to bring an item into view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollToIndex {
    pub index: usize,
    pub align: Align,
}

/// Largest offset that still fills the viewport (0 when the content is shorter).
pub fn max_scroll_offset(content_size: u64, viewport_size: u32) -> u64 {
    content_size.saturating_sub(viewport_size as u64)
}

/// Computes where the viewport must start so that `index` lands at `align`.
///
/// `materialized` is the overscanned range currently on screen, if any. Under [`Align::Auto`] an
/// item inside it keeps the current offset; otherwise the offset moves the least distance that
/// brings the item fully into the viewport. With a zero viewport, `End` and `Auto` fall back to
/// the item's start.
///
/// The result is clamped into the scrollable bounds. Returns `None` when `index` does not exist.
pub fn scroll_to_index_offset(
    sizes: &SizeModel,
    index: usize,
    align: Align,
    current_offset: u64,
    viewport_size: u32,
    materialized: Option<IndexRange>,
) -> Option<u64> {
    let start = sizes.offset(index).ok()?;
    let size = sizes.size(index).ok()? as u64;
    let end = start.saturating_add(size);
    let view = viewport_size as u64;

    let target = match align {
        Align::Start => start,
        Align::End if view == 0 => start,
        Align::End => end.saturating_sub(view),
        Align::Center => {
            let shift = (view as i128 - size as i128) / 2;
            (start as i128 - shift).max(0) as u64
        }
        Align::Auto if materialized.is_some_and(|r| r.contains(index)) => current_offset,
        Align::Auto if view == 0 => start,
        Align::Auto => {
            let cur_end = current_offset.saturating_add(view);
            if start >= current_offset && end <= cur_end {
                current_offset
            } else if start < current_offset {
                start
            } else {
                end.saturating_sub(view)
            }
        }
    };

    Some(cmp::min(
        target,
        max_scroll_offset(sizes.total_size(), viewport_size),
    ))
}

/// Owns the authoritative scroll offset.
///
/// Raw viewport events and explicit scroll-to-index requests both end up here. A pending request
/// wins over raw events until the next render pass applies it, so the viewport scroll the request
/// itself provokes cannot fight it.
#[derive(Clone, Debug, Default)]
pub struct ScrollController {
    offset: u64,
    viewport_size: u32,
    content_size: u64,
    direction: Option<ScrollDirection>,
    pending: Option<ScrollToIndex>,
    is_scrolling: bool,
    last_scroll_event_ms: Option<u64>,
    last_notified: Option<ScrollNotification>,
}

impl ScrollController {
    pub fn new(offset: u64, viewport_size: u32) -> Self {
        Self {
            offset,
            viewport_size,
            ..Self::default()
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn viewport_size(&self) -> u32 {
        self.viewport_size
    }

    pub fn content_size(&self) -> u64 {
        self.content_size
    }

    pub fn direction(&self) -> Option<ScrollDirection> {
        self.direction
    }

    pub fn pending(&self) -> Option<ScrollToIndex> {
        self.pending
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    /// Normalizes a raw scroll event.
    ///
    /// Returns `false` when the event was ignored because a scroll-to-index request is pending.
    pub fn on_scroll(&mut self, raw_offset: u64, viewport_size: u32, content_size: u64) -> bool {
        if let Some(_pending) = self.pending {
            vtrace!(
                raw_offset,
                pending_index = _pending.index,
                "on_scroll ignored while a scroll-to-index is pending"
            );
            return false;
        }
        self.viewport_size = viewport_size;
        self.content_size = content_size;
        let clamped = cmp::min(raw_offset, max_scroll_offset(content_size, viewport_size));
        vtrace!(raw_offset, clamped, viewport_size, content_size, "on_scroll");
        self.set_offset(clamped);
        true
    }

    /// Queues a request to bring `index` into view on the next render pass.
    ///
    /// Out-of-range indexes are ignored (returns `false`). A newer request replaces an older one.
    pub fn scroll_to_index(&mut self, index: usize, align: Align, count: usize) -> bool {
        if index >= count {
            vdebug!(index, count, "scroll_to_index ignored: index out of range");
            return false;
        }
        let request = ScrollToIndex { index, align };
        if let Some(_prev) = self.pending.replace(request) {
            vdebug!(
                prev_index = _prev.index,
                index,
                "scroll_to_index replaced a pending request"
            );
        }
        true
    }

    pub fn cancel_pending(&mut self) -> Option<ScrollToIndex> {
        self.pending.take()
    }

    /// Converts the pending request into a concrete offset and clears it.
    ///
    /// `materialized` is the overscanned range the current offset maps to. Returns the applied
    /// offset, or `None` when nothing was pending or the target vanished.
    pub fn apply_pending(
        &mut self,
        sizes: &SizeModel,
        materialized: Option<IndexRange>,
    ) -> Option<u64> {
        let request = self.pending.take()?;
        let Some(target) = scroll_to_index_offset(
            sizes,
            request.index,
            request.align,
            self.offset,
            self.viewport_size,
            materialized,
        ) else {
            vdebug!(
                index = request.index,
                count = sizes.len(),
                "pending scroll_to_index dropped: item no longer exists"
            );
            return None;
        };
        self.set_offset(target);
        Some(target)
    }

    /// Records new bounds and pulls the offset back inside them.
    ///
    /// Returns `true` when the offset had to move.
    pub fn sync_bounds(&mut self, viewport_size: u32, content_size: u64) -> bool {
        self.viewport_size = viewport_size;
        self.content_size = content_size;
        let max = max_scroll_offset(content_size, viewport_size);
        if self.offset <= max {
            return false;
        }
        self.set_offset(max);
        true
    }

    /// Sets the offset directly (host-controlled scrolling, anchoring adjustments).
    pub fn set_offset(&mut self, offset: u64) {
        if self.offset == offset {
            return;
        }
        let prev = self.offset;
        self.offset = offset;
        self.direction = match offset.cmp(&prev) {
            cmp::Ordering::Greater => Some(ScrollDirection::Forward),
            cmp::Ordering::Less => Some(ScrollDirection::Backward),
            cmp::Ordering::Equal => self.direction,
        };
    }

    pub fn notification(&self) -> ScrollNotification {
        ScrollNotification {
            scroll_offset: self.offset,
            viewport_size: self.viewport_size,
            content_size: self.content_size,
        }
    }

    /// Returns the current notification unless it equals the last one handed out.
    pub fn take_notification(&mut self) -> Option<ScrollNotification> {
        let next = self.notification();
        if self.last_notified == Some(next) {
            return None;
        }
        self.last_notified = Some(next);
        Some(next)
    }

    pub fn set_is_scrolling(&mut self, is_scrolling: bool) -> bool {
        if self.is_scrolling == is_scrolling {
            return false;
        }
        self.is_scrolling = is_scrolling;
        if !is_scrolling {
            self.direction = None;
            self.last_scroll_event_ms = None;
        }
        true
    }

    pub fn notify_scroll_event(&mut self, now_ms: u64) -> bool {
        self.last_scroll_event_ms = Some(now_ms);
        self.set_is_scrolling(true)
    }

    /// Clears the scrolling flag once no event arrived for `reset_delay_ms`.
    pub fn update_scrolling(&mut self, now_ms: u64, reset_delay_ms: u64) -> bool {
        if !self.is_scrolling {
            return false;
        }
        let Some(last) = self.last_scroll_event_ms else {
            return false;
        };
        if now_ms.saturating_sub(last) >= reset_delay_ms {
            return self.set_is_scrolling(false);
        }
        false
    }
}
