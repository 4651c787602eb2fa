//! Synchronization tunables

use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_check_delay_ms() -> u64 {
    750
}

fn default_workspace_check_delay_ms() -> u64 {
    3000
}

/// Delays and timeouts for the change coordinator
///
/// The two coalescing delays are independent: the fast delay restarts on
/// every mutation of a document and scopes the check to that document; the
/// slow delay restarts on every mutation anywhere and scopes the check to
/// the whole workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Per-document diagnostics delay, in milliseconds
    #[serde(default = "default_check_delay_ms")]
    pub check_delay_ms: u64,

    /// Whole-workspace diagnostics delay, in milliseconds
    #[serde(default = "default_workspace_check_delay_ms")]
    pub workspace_check_delay_ms: u64,

    /// Advisory timeout for backend analysis calls. Expiry is treated as
    /// cancellation: discard, no automatic retry, no hard error.
    #[serde(default)]
    pub backend_timeout_ms: Option<u64>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            check_delay_ms: default_check_delay_ms(),
            workspace_check_delay_ms: default_workspace_check_delay_ms(),
            backend_timeout_ms: None,
        }
    }
}

impl SyncConfig {
    pub fn check_delay(&self) -> Duration {
        Duration::from_millis(self.check_delay_ms)
    }

    pub fn workspace_check_delay(&self) -> Duration {
        Duration::from_millis(self.workspace_check_delay_ms)
    }

    pub fn backend_timeout(&self) -> Option<Duration> {
        self.backend_timeout_ms.map(Duration::from_millis)
    }
}
