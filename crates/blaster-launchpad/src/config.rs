use serde::{Deserialize, Serialize};

use blaster_core::constants::DEFAULT_LIQUIDITY_DEADLINE_SECS;

/// Operator-side knobs of the launchpad.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LaunchpadConfig {
    /// Deadline granted to the liquidity call, in seconds from the launch.
    #[serde(default = "default_deadline")]
    pub liquidity_deadline_secs: u64,
}

fn default_deadline() -> u64 {
    DEFAULT_LIQUIDITY_DEADLINE_SECS
}

impl Default for LaunchpadConfig {
    fn default() -> Self {
        Self { liquidity_deadline_secs: DEFAULT_LIQUIDITY_DEADLINE_SECS }
    }
}
