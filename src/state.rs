/// Payload of the scroll notification, emitted whenever a new authoritative offset is accepted.
///
/// Hosts use it to keep several independently virtualized views in sync.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollNotification {
    pub scroll_offset: u64,
    pub viewport_size: u32,
    pub content_size: u64,
}

/// A lightweight snapshot of the current scroll state.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    pub offset: u64,
    pub viewport_size: u32,
    /// Estimated until every item has been measured.
    pub content_size: u64,
    pub is_scrolling: bool,
}
