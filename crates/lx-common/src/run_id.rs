//! Process-level run ID.
//!
//! Every ranking run and proposal record produced by this process carries the
//! same ULID, so a batch of matches can be traced back to the process that
//! produced it. Request-scoped ids come from [`generate`].

use once_cell::sync::Lazy;
use ulid::Ulid;

static RUN_ID: Lazy<String> = Lazy::new(|| Ulid::new().to_string());

/// Returns the process-level run ID (26 chars, time-ordered).
#[inline]
pub fn get() -> &'static str {
    &RUN_ID
}

/// Fresh ULID for match requests and proposals.
#[inline]
pub fn generate() -> String {
    Ulid::new().to_string()
}
