//! Panel constants.

use std::time::Duration;

/// How long the block size input must rest before a preview run starts.
pub const PREVIEW_DEBOUNCE: Duration = Duration::from_millis(100);
