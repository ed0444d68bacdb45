//! Diff configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Knobs for a diff run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffConfig {
    /// Abort the search once this much wall time has elapsed.
    pub timeout: Option<Duration>,
    /// Extra ISOLATED slack vertices appended to both graphs beyond the
    /// per-kind deficit padding, letting the optimum replace a same-kind
    /// relabeling with a delete-plus-insert pair.
    pub extra_isolated: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        DiffConfig {
            timeout: None,
            extra_isolated: 0,
        }
    }
}
