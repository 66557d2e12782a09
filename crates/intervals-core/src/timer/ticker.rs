//! Cancellable delays and periodic ticks.
//!
//! Both the countdown and the redraw loop are built on these two helpers. A
//! cancelled token wins over a timer that fires in the same poll, so nothing
//! scheduled before a cancellation can run after it.

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Sleep for `delay` unless `token` is cancelled first.
///
/// Returns `true` if the full delay elapsed, `false` on cancellation.
pub async fn sleep_or_cancel(token: &CancellationToken, delay: Duration) -> bool {
    if token.is_cancelled() {
        return false;
    }
    tokio::select! {
        biased;
        _ = token.cancelled() => false,
        _ = tokio::time::sleep(delay) => !token.is_cancelled(),
    }
}

/// Call `on_tick` every `period` until it breaks or `token` is cancelled.
///
/// The first tick fires one period after the call. Missed ticks are skipped
/// rather than replayed; callers recompute from the clock on each tick.
pub async fn run_periodic<F>(token: &CancellationToken, period: Duration, mut on_tick: F)
where
    F: FnMut() -> ControlFlow<()>,
{
    let start = tokio::time::Instant::now() + period;
    let mut interval = tokio::time::interval_at(start, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = interval.tick() => {
                if token.is_cancelled() || on_tick().is_break() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn sleep_completes_without_cancel() {
        let token = CancellationToken::new();
        assert!(sleep_or_cancel(&token, Duration::from_millis(1_000)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_returns_early_on_cancel() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        let started = tokio::time::Instant::now();

        let (slept, _) = tokio::join!(
            sleep_or_cancel(&token, Duration::from_millis(1_000)),
            async move {
                tokio::time::sleep(Duration::from_millis(200)).await;
                canceller.cancel();
            }
        );

        assert!(!slept);
        assert!(started.elapsed() < Duration::from_millis(1_000));
    }

    #[tokio::test(start_paused = true)]
    async fn already_cancelled_token_never_sleeps() {
        let token = CancellationToken::new();
        token.cancel();
        assert!(!sleep_or_cancel(&token, Duration::from_secs(60)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_stops_on_break() {
        let token = CancellationToken::new();
        let mut ticks = 0;
        run_periodic(&token, Duration::from_millis(16), || {
            ticks += 1;
            if ticks == 5 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .await;
        assert_eq!(ticks, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_stops_on_cancel() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        let mut ticks = 0u32;

        tokio::join!(
            run_periodic(&token, Duration::from_millis(100), || {
                ticks += 1;
                ControlFlow::Continue(())
            }),
            async move {
                tokio::time::sleep(Duration::from_millis(350)).await;
                canceller.cancel();
            }
        );

        assert_eq!(ticks, 3);
    }
}
