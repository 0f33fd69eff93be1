use thiserror::Error;

/// Errors surfaced by index-addressed operations.
///
/// Degenerate layout input (zero sizes, zero viewports, stale counts) is absorbed by clamping and
/// never shows up here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("index {index} is out of range for {count} items")]
    IndexOutOfRange { index: usize, count: usize },
    #[error(
        "inconsistent range [{overscan_start_index}, {start_index}..={stop_index}, \
         {overscan_stop_index}] for {count} items"
    )]
    InconsistentRange {
        start_index: usize,
        stop_index: usize,
        overscan_start_index: usize,
        overscan_stop_index: usize,
        count: usize,
    },
}

pub type Result<T> = core::result::Result<T, Error>;
