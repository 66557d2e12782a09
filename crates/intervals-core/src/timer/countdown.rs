//! Pre-start countdown sequencing.
//!
//! A countdown delivers the ticks `3, 2, 1` one second apart and then
//! resolves. It can be cancelled at any point through its
//! [`CountdownHandle`]; once cancelled, no further tick is delivered.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::ticker::sleep_or_cancel;

/// Tick values delivered by a countdown, in order.
pub const COUNTDOWN_TICKS: [u8; 3] = [3, 2, 1];

/// Spacing between countdown ticks.
pub const COUNTDOWN_CADENCE: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownOutcome {
    Completed,
    Cancelled,
}

/// Cancellation token for one in-flight countdown.
///
/// Clones refer to the same countdown. Each countdown started by the timer
/// gets a fresh id, so a handle left over from an earlier countdown never
/// matches the current one.
#[derive(Debug, Clone)]
pub struct CountdownHandle {
    id: u64,
    token: CancellationToken,
}

impl CountdownHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self {
            id,
            token: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl PartialEq for CountdownHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CountdownHandle {}

/// Run the three-tick sequence for `handle`.
///
/// `on_tick` is called synchronously with each value before the wait that
/// follows it. Cancellation is checked before every tick and every wait.
pub async fn run_countdown<F>(
    handle: &CountdownHandle,
    cadence: Duration,
    mut on_tick: F,
) -> CountdownOutcome
where
    F: FnMut(u8),
{
    for value in COUNTDOWN_TICKS {
        if handle.is_cancelled() {
            return CountdownOutcome::Cancelled;
        }
        on_tick(value);
        if !sleep_or_cancel(handle.token(), cadence).await {
            return CountdownOutcome::Cancelled;
        }
    }
    CountdownOutcome::Completed
}
