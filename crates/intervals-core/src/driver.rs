//! Render/notification driver.
//!
//! Sits between the host and the timer: forwards user commands, runs the
//! per-frame procedure, sequences the countdown, and talks to the display,
//! audio and haptic adapters. Sound and vibration are skipped entirely while
//! the timer is muted.
//!
//! Each frame runs in a fixed order:
//!
//! ```text
//! detect completion -> switch phase -> notify (tone, vibration) -> render
//! ```
//!
//! so the displayed phase never lags the audible cue.

use std::ops::ControlFlow;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::adapters::{Audio, Display, Frame, Haptics};
use crate::clock::{Clock, MonotonicClock};
use crate::config::{ToneConfig, WidgetConfig};
use crate::error::{AdapterError, InputError};
use crate::events::Event;
use crate::input::DurationField;
use crate::timer::{
    run_countdown, run_periodic, CountdownHandle, CountdownOutcome, IntervalTimer, Phase,
    TimerStatus,
};

/// What a single frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameReport {
    /// The timer was not running; nothing happened.
    Stale,
    /// The display was refreshed. `switched` names the phase entered during
    /// this frame, if any.
    Rendered { switched: Option<Phase> },
}

type Observer = Box<dyn FnMut(&Event)>;

pub struct WidgetDriver<C: Clock = MonotonicClock> {
    timer: IntervalTimer<C>,
    display: Box<dyn Display>,
    audio: Box<dyn Audio>,
    haptics: Box<dyn Haptics>,
    tones: ToneConfig,
    frame_interval: Duration,
    countdown_cadence: Duration,
    countdown_before_start: bool,
    work_field: DurationField,
    rest_field: DurationField,
    observer: Option<Observer>,
}

impl<C: Clock> WidgetDriver<C> {
    pub fn new(
        clock: C,
        config: &WidgetConfig,
        display: Box<dyn Display>,
        audio: Box<dyn Audio>,
        haptics: Box<dyn Haptics>,
    ) -> Self {
        let mut timer = IntervalTimer::new(clock, config.work_ms(), config.rest_ms());
        if config.muted {
            timer.toggle_mute();
        }
        Self {
            timer,
            display,
            audio,
            haptics,
            tones: config.tones.clone(),
            frame_interval: config.frame_interval(),
            countdown_cadence: config.countdown_cadence(),
            countdown_before_start: config.countdown_before_start,
            work_field: DurationField::new(config.work_secs),
            rest_field: DurationField::new(config.rest_secs),
            observer: None,
        }
    }

    /// Receive every event produced through this driver.
    pub fn set_observer<F>(&mut self, observer: F)
    where
        F: FnMut(&Event) + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    pub fn timer(&self) -> &IntervalTimer<C> {
        &self.timer
    }

    pub fn status(&self) -> TimerStatus {
        self.timer.status()
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn countdown_cadence(&self) -> Duration {
        self.countdown_cadence
    }

    pub fn countdown_before_start(&self) -> bool {
        self.countdown_before_start
    }

    pub fn work_field(&self) -> &DurationField {
        &self.work_field
    }

    pub fn rest_field(&self) -> &DurationField {
        &self.rest_field
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume immediately, without a countdown.
    pub fn start(&mut self) -> Option<Event> {
        let event = self.timer.start();
        if event.is_some() {
            self.render();
        }
        self.emit(event)
    }

    pub fn pause(&mut self) -> Option<Event> {
        let event = self.timer.pause();
        self.emit(event)
    }

    pub fn reset(&mut self) -> Option<Event> {
        let event = self.timer.reset();
        self.render();
        self.emit(event)
    }

    pub fn toggle_mute(&mut self) -> Option<Event> {
        let event = self.timer.toggle_mute();
        self.emit(event)
    }

    pub fn cancel_countdown(&mut self) -> Option<Event> {
        let event = self.timer.cancel_countdown();
        self.emit(event)
    }

    /// Apply a typed work duration in whole seconds.
    ///
    /// # Errors
    ///
    /// Rejected input leaves the timer untouched and the field showing its
    /// previous value.
    pub fn submit_work(&mut self, raw: &str) -> Result<(), InputError> {
        self.submit_duration(Phase::Work, raw)
    }

    /// Apply a typed rest duration in whole seconds.
    ///
    /// # Errors
    ///
    /// Same as [`WidgetDriver::submit_work`].
    pub fn submit_rest(&mut self, raw: &str) -> Result<(), InputError> {
        self.submit_duration(Phase::Rest, raw)
    }

    // ── Countdown ────────────────────────────────────────────────────

    /// Arm a countdown from `Idle`.
    pub fn begin_countdown(&mut self) -> Option<CountdownHandle> {
        let handle = self.timer.begin_countdown()?;
        tracing::debug!(countdown_id = handle.id(), "countdown armed");
        self.emit(Some(Event::CountdownStarted {
            countdown_id: handle.id(),
            at: chrono::Utc::now(),
        }));
        Some(handle)
    }

    /// Deliver one countdown tick to the display, audio and haptics.
    ///
    /// Returns `false` and does nothing if `handle` is no longer the live
    /// countdown.
    pub fn countdown_tick(&mut self, handle: &CountdownHandle, value: u8) -> bool {
        if !self.timer.is_current_countdown(handle) {
            tracing::debug!(countdown_id = handle.id(), value, "dropping stale countdown tick");
            return false;
        }
        report("display", self.display.show_countdown(value));
        if !self.timer.is_muted() {
            report("audio", self.audio.play_countdown_tone(value));
            report("vibration", self.haptics.vibrate_countdown(value));
        }
        self.emit(Some(Event::CountdownTick {
            countdown_id: handle.id(),
            value,
            at: chrono::Utc::now(),
        }));
        true
    }

    pub fn finish_countdown(
        &mut self,
        handle: &CountdownHandle,
        outcome: CountdownOutcome,
    ) -> Option<Event> {
        let event = self.timer.finish_countdown(handle, outcome);
        self.emit(event)
    }

    /// Run the sequence for an armed countdown and record its outcome.
    ///
    /// Cancel it from elsewhere through a clone of `handle`. Dropping the
    /// future before it resolves (a `select!` branch losing, a timeout)
    /// counts as a cancellation and returns the timer to `Idle`.
    pub async fn run_countdown(&mut self, handle: &CountdownHandle) -> CountdownOutcome {
        let cadence = self.countdown_cadence;
        let mut guard = CountdownGuard {
            driver: self,
            handle,
            finished: false,
        };
        let driver = &mut *guard.driver;
        let outcome = run_countdown(handle, cadence, |value| {
            driver.countdown_tick(handle, value);
        })
        .await;
        guard.finished = true;
        guard.driver.finish_countdown(handle, outcome);
        outcome
    }

    /// Arm and run a countdown. `None` if the timer was not idle.
    ///
    /// Dropping the future cancels the countdown, as with
    /// [`WidgetDriver::run_countdown`].
    pub async fn countdown(&mut self) -> Option<CountdownOutcome> {
        let handle = self.begin_countdown()?;
        Some(self.run_countdown(&handle).await)
    }

    /// The start button: a fresh start goes through the countdown when
    /// configured to; a resume never does.
    pub async fn start_run(&mut self) -> Option<Event> {
        if self.countdown_before_start && self.timer.status() == TimerStatus::Idle {
            match self.countdown().await? {
                CountdownOutcome::Completed => self.start(),
                CountdownOutcome::Cancelled => None,
            }
        } else {
            self.start()
        }
    }

    // ── Frames ───────────────────────────────────────────────────────

    /// Run one redraw tick.
    ///
    /// Re-checks the status first, so a tick scheduled before a pause or
    /// reset changes nothing.
    pub fn frame(&mut self) -> FrameReport {
        if self.timer.status() != TimerStatus::Running {
            return FrameReport::Stale;
        }

        let elapsed = self.timer.elapsed_ms();
        let mut switched = None;
        if self.timer.is_phase_complete(elapsed) {
            let event = self.timer.switch_phase();
            let phase = self.timer.phase();
            tracing::info!(
                phase = phase.label(),
                phase_count = self.timer.phase_count(),
                "phase switched"
            );
            self.notify_phase_switch(phase);
            self.emit(event);
            switched = Some(phase);
        }

        self.render();
        FrameReport::Rendered { switched }
    }

    /// Token for a redraw loop bound to the current run.
    pub fn arm_redraw(&mut self) -> Option<CancellationToken> {
        self.timer.arm_redraw()
    }

    /// Drive frames at the configured interval until the timer leaves
    /// `Running`.
    pub async fn run_frames(&mut self) {
        let Some(token) = self.timer.arm_redraw() else {
            return;
        };
        let period = self.frame_interval;
        run_periodic(&token, period, || match self.frame() {
            FrameReport::Rendered { .. } => ControlFlow::Continue(()),
            FrameReport::Stale => ControlFlow::Break(()),
        })
        .await;
    }

    /// Current state as an event, also sent to the observer.
    pub fn snapshot(&mut self) -> Event {
        let event = self.timer.snapshot();
        self.emit(Some(event.clone()));
        event
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn submit_duration(&mut self, phase: Phase, raw: &str) -> Result<(), InputError> {
        let field = match phase {
            Phase::Work => &mut self.work_field,
            Phase::Rest => &mut self.rest_field,
        };
        let previous = field.clone();
        if let Err(e) = field.submit(raw) {
            tracing::info!(phase = phase.label(), input = raw, error = %e, "duration rejected");
            return Err(e);
        }

        let (work_ms, rest_ms) = (self.work_field.millis(), self.rest_field.millis());
        match self.timer.set_durations(work_ms, rest_ms) {
            Ok(event) => {
                self.render();
                self.emit(Some(event));
                Ok(())
            }
            Err(e) => {
                match phase {
                    Phase::Work => self.work_field = previous,
                    Phase::Rest => self.rest_field = previous,
                }
                tracing::info!(phase = phase.label(), input = raw, error = %e, "duration rejected");
                Err(e)
            }
        }
    }

    fn notify_phase_switch(&mut self, phase: Phase) {
        if self.timer.is_muted() {
            return;
        }
        report("audio", self.audio.play_tone(self.tones.hz_for(phase)));
        report("vibration", self.haptics.vibrate_phase_change());
    }

    fn render(&mut self) {
        let display = self.timer.display_time();
        let frame = Frame {
            remaining_text: display.text(),
            progress: display.progress,
            phase: self.timer.phase(),
            phase_count: self.timer.phase_count(),
        };
        report("display", self.display.render(&frame));
    }

    fn emit(&mut self, event: Option<Event>) -> Option<Event> {
        let event = event?;
        tracing::debug!(kind = event.kind(), status = ?self.timer.status(), "timer event");
        if let Some(observer) = self.observer.as_mut() {
            observer(&event);
        }
        Some(event)
    }
}

/// Cancels a countdown whose sequencer was dropped before it resolved.
struct CountdownGuard<'a, C: Clock> {
    driver: &'a mut WidgetDriver<C>,
    handle: &'a CountdownHandle,
    finished: bool,
}

impl<C: Clock> Drop for CountdownGuard<'_, C> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        tracing::debug!(countdown_id = self.handle.id(), "countdown abandoned");
        self.driver
            .finish_countdown(self.handle, CountdownOutcome::Cancelled);
    }
}

/// Log and drop an adapter failure.
fn report(capability: &str, result: Result<(), AdapterError>) {
    match result {
        Ok(()) => {}
        Err(e @ AdapterError::Unsupported { .. }) => {
            tracing::debug!(capability, error = %e, "capability unavailable");
        }
        Err(e) => {
            tracing::warn!(capability, error = %e, "adapter request failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ManualClock, TokioClock};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Render(Frame),
        Countdown(u8),
        Tone(u32),
        CountdownTone(u8),
        Vibrate,
        VibratePhase,
        VibrateCountdown(u8),
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Call>>>);

    impl Recorder {
        fn calls(&self) -> Vec<Call> {
            self.0.borrow().clone()
        }

        fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.0.borrow().iter().filter(|c| pred(*c)).count()
        }

        fn sound_or_vibration(&self) -> usize {
            self.count(|c| !matches!(c, Call::Render(_) | Call::Countdown(_)))
        }

        fn clear(&self) {
            self.0.borrow_mut().clear();
        }
    }

    impl Display for Recorder {
        fn render(&mut self, frame: &Frame) -> Result<(), AdapterError> {
            self.0.borrow_mut().push(Call::Render(frame.clone()));
            Ok(())
        }
        fn show_countdown(&mut self, value: u8) -> Result<(), AdapterError> {
            self.0.borrow_mut().push(Call::Countdown(value));
            Ok(())
        }
    }

    impl Audio for Recorder {
        fn play_tone(&mut self, frequency_hz: u32) -> Result<(), AdapterError> {
            self.0.borrow_mut().push(Call::Tone(frequency_hz));
            Ok(())
        }
        fn play_countdown_tone(&mut self, value: u8) -> Result<(), AdapterError> {
            self.0.borrow_mut().push(Call::CountdownTone(value));
            Ok(())
        }
    }

    impl Haptics for Recorder {
        fn vibrate(&mut self, _pattern: &[u64]) -> Result<(), AdapterError> {
            self.0.borrow_mut().push(Call::Vibrate);
            Ok(())
        }
        fn vibrate_phase_change(&mut self) -> Result<(), AdapterError> {
            self.0.borrow_mut().push(Call::VibratePhase);
            Ok(())
        }
        fn vibrate_countdown(&mut self, value: u8) -> Result<(), AdapterError> {
            self.0.borrow_mut().push(Call::VibrateCountdown(value));
            Ok(())
        }
    }

    /// Audio that always refuses.
    struct DeniedAudio;

    impl Audio for DeniedAudio {
        fn play_tone(&mut self, _frequency_hz: u32) -> Result<(), AdapterError> {
            Err(AdapterError::Denied {
                capability: "audio",
                reason: "autoplay blocked".into(),
            })
        }
        fn play_countdown_tone(&mut self, _value: u8) -> Result<(), AdapterError> {
            Err(AdapterError::Device("no output".into()))
        }
    }

    /// Haptics on a host without a vibration motor.
    struct MissingMotor;

    impl Haptics for MissingMotor {
        fn vibrate(&mut self, _pattern: &[u64]) -> Result<(), AdapterError> {
            Err(AdapterError::Unsupported {
                capability: "vibration",
            })
        }
        fn vibrate_phase_change(&mut self) -> Result<(), AdapterError> {
            self.vibrate(&[400])
        }
        fn vibrate_countdown(&mut self, _value: u8) -> Result<(), AdapterError> {
            self.vibrate(&[100])
        }
    }

    fn config(work_secs: u64, rest_secs: u64) -> WidgetConfig {
        WidgetConfig {
            work_secs,
            rest_secs,
            ..WidgetConfig::default()
        }
    }

    fn driver<C: Clock>(clock: C, cfg: &WidgetConfig) -> (WidgetDriver<C>, Recorder) {
        let rec = Recorder::default();
        let driver = WidgetDriver::new(
            clock,
            cfg,
            Box::new(rec.clone()),
            Box::new(rec.clone()),
            Box::new(rec.clone()),
        );
        (driver, rec)
    }

    #[test]
    fn frame_switches_exactly_once_at_phase_end() {
        let clock = ManualClock::new();
        let (mut d, rec) = driver(clock.clone(), &config(5, 3));
        d.start();

        clock.advance(4_999);
        assert_eq!(d.frame(), FrameReport::Rendered { switched: None });

        clock.advance(1);
        assert_eq!(
            d.frame(),
            FrameReport::Rendered {
                switched: Some(Phase::Rest)
            }
        );
        assert_eq!(d.frame(), FrameReport::Rendered { switched: None });

        assert!(!d.timer().is_work_phase());
        assert_eq!(d.timer().total_time_ms(), 3_000);
        assert_eq!(d.timer().phase_count(), 1);
        assert_eq!(rec.count(|c| matches!(c, Call::Tone(_))), 1);
        assert_eq!(rec.count(|c| *c == Call::VibratePhase), 1);
    }

    #[test]
    fn frame_notifies_before_rendering_the_new_phase() {
        let clock = ManualClock::new();
        let (mut d, rec) = driver(clock.clone(), &config(5, 3));
        d.start();
        rec.clear();

        clock.advance(5_000);
        d.frame();

        let calls = rec.calls();
        assert_eq!(calls[0], Call::Tone(440));
        assert_eq!(calls[1], Call::VibratePhase);
        match &calls[2] {
            Call::Render(frame) => {
                assert_eq!(frame.phase, Phase::Rest);
                assert_eq!(frame.remaining_text, "00:03");
                assert_eq!(frame.progress, 0.0);
            }
            other => panic!("expected render, got {other:?}"),
        }
    }

    #[test]
    fn entering_work_plays_the_work_tone() {
        let clock = ManualClock::new();
        let (mut d, rec) = driver(clock.clone(), &config(5, 3));
        d.start();
        clock.advance(5_000);
        d.frame();
        clock.advance(3_000);
        d.frame();
        assert_eq!(rec.count(|c| *c == Call::Tone(880)), 1);
        assert_eq!(d.timer().phase_count(), 1);
    }

    #[test]
    fn stale_frame_after_pause_does_nothing() {
        let clock = ManualClock::new();
        let (mut d, rec) = driver(clock.clone(), &config(5, 3));
        d.start();
        clock.advance(2_000);
        d.pause();
        rec.clear();

        clock.advance(10_000);
        assert_eq!(d.frame(), FrameReport::Stale);
        assert!(rec.calls().is_empty());
        assert!(d.timer().is_work_phase());
        assert_eq!(d.timer().paused_elapsed_ms(), 2_000);
    }

    #[test]
    fn muted_phase_switch_is_silent() {
        let clock = ManualClock::new();
        let (mut d, rec) = driver(clock.clone(), &config(5, 3));
        d.toggle_mute();
        d.start();
        clock.advance(5_000);
        d.frame();

        assert_eq!(d.timer().phase(), Phase::Rest);
        assert_eq!(rec.sound_or_vibration(), 0);
        assert!(rec.count(|c| matches!(c, Call::Render(_))) >= 1);
    }

    #[test]
    fn muted_config_starts_muted() {
        let cfg = WidgetConfig {
            muted: true,
            ..config(5, 3)
        };
        let (d, _rec) = driver(ManualClock::new(), &cfg);
        assert!(d.timer().is_muted());
    }

    #[test]
    fn adapter_failures_do_not_reach_the_timer() {
        let clock = ManualClock::new();
        let rec = Recorder::default();
        let mut d = WidgetDriver::new(
            clock.clone(),
            &config(5, 3),
            Box::new(rec.clone()),
            Box::new(DeniedAudio),
            Box::new(MissingMotor),
        );
        d.start();
        clock.advance(5_000);
        assert_eq!(
            d.frame(),
            FrameReport::Rendered {
                switched: Some(Phase::Rest)
            }
        );
        assert_eq!(d.status(), TimerStatus::Running);
    }

    #[test]
    fn observer_sees_transitions() {
        let clock = ManualClock::new();
        let (mut d, _rec) = driver(clock.clone(), &config(5, 3));
        let seen: Rc<RefCell<Vec<&'static str>>> = Rc::default();
        let sink = seen.clone();
        d.set_observer(move |e| sink.borrow_mut().push(e.kind()));

        d.start();
        clock.advance(5_000);
        d.frame();
        d.pause();
        d.reset();
        assert!(d.pause().is_none());

        assert_eq!(
            *seen.borrow(),
            vec!["timer_started", "phase_switched", "timer_paused", "timer_reset"]
        );
    }

    #[test]
    fn duration_input_applies_only_when_idle() {
        let clock = ManualClock::new();
        let (mut d, _rec) = driver(clock.clone(), &config(5, 3));

        assert!(d.submit_work("20").is_ok());
        assert_eq!(d.timer().total_time_ms(), 20_000);

        assert_eq!(d.submit_rest("0"), Err(InputError::NonPositive));
        assert_eq!(d.rest_field().text(), "3");
        assert_eq!(d.timer().state().rest_duration_ms(), 3_000);

        d.start();
        assert_eq!(d.submit_work("40"), Err(InputError::TimerActive));
        assert_eq!(d.work_field().secs(), 20);
        assert_eq!(d.timer().total_time_ms(), 20_000);
    }

    #[test]
    fn reset_renders_the_full_work_phase() {
        let clock = ManualClock::new();
        let (mut d, rec) = driver(clock.clone(), &config(90, 3));
        d.start();
        clock.advance(30_000);
        d.frame();
        rec.clear();

        d.reset();
        match rec.calls().last() {
            Some(Call::Render(frame)) => {
                assert_eq!(frame.remaining_text, "01:30");
                assert_eq!(frame.phase, Phase::Work);
            }
            other => panic!("expected render, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_completes_and_waits_for_start() {
        let (mut d, rec) = driver(TokioClock::new(), &config(5, 3));

        let outcome = d.countdown().await;
        assert_eq!(outcome, Some(CountdownOutcome::Completed));
        assert_eq!(d.status(), TimerStatus::Countdown);
        assert!(!d.timer().countdown_in_flight());

        let shown: Vec<Call> = rec
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Countdown(_)))
            .collect();
        assert_eq!(
            shown,
            vec![Call::Countdown(3), Call::Countdown(2), Call::Countdown(1)]
        );
        assert_eq!(rec.count(|c| matches!(c, Call::CountdownTone(_))), 3);
        assert_eq!(rec.count(|c| matches!(c, Call::VibrateCountdown(_))), 3);

        assert!(d.start().is_some());
        assert_eq!(d.status(), TimerStatus::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_cancelled_after_first_tick() {
        let (mut d, rec) = driver(TokioClock::new(), &config(5, 3));
        let handle = d.begin_countdown().unwrap();
        let canceller = handle.clone();

        let (outcome, _) = tokio::join!(d.run_countdown(&handle), async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            canceller.cancel();
        });

        assert_eq!(outcome, CountdownOutcome::Cancelled);
        assert_eq!(d.status(), TimerStatus::Idle);
        assert_eq!(rec.count(|c| matches!(c, Call::Countdown(_))), 1);

        // A tick that was already queued for the old countdown is dropped.
        assert!(!d.countdown_tick(&handle, 2));
        assert_eq!(rec.count(|c| matches!(c, Call::Countdown(_))), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_start_run_mid_countdown_returns_to_idle() {
        let (mut d, rec) = driver(TokioClock::new(), &config(5, 3));
        let seen: Rc<RefCell<Vec<&'static str>>> = Rc::default();
        let sink = seen.clone();
        d.set_observer(move |e| sink.borrow_mut().push(e.kind()));

        let timed_out = tokio::time::timeout(Duration::from_millis(1_500), d.start_run()).await;
        assert!(timed_out.is_err());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(d.status(), TimerStatus::Idle);
        assert!(!d.timer().countdown_in_flight());
        assert_eq!(rec.count(|c| matches!(c, Call::Countdown(_))), 2);
        assert_eq!(seen.borrow().last(), Some(&"countdown_finished"));

        // Nothing is left behind: a fresh start goes straight through.
        assert!(d.start_run().await.is_some());
        assert_eq!(d.status(), TimerStatus::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_countdown_in_select_cancels_it() {
        let (mut d, _rec) = driver(TokioClock::new(), &config(5, 3));
        tokio::select! {
            _ = d.countdown() => panic!("countdown should lose the race"),
            _ = tokio::time::sleep(Duration::from_millis(500)) => {}
        }
        assert_eq!(d.status(), TimerStatus::Idle);
        assert!(d.start().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn muted_countdown_only_displays() {
        let (mut d, rec) = driver(TokioClock::new(), &config(5, 3));
        d.toggle_mute();
        d.countdown().await;
        assert_eq!(rec.count(|c| matches!(c, Call::Countdown(_))), 3);
        assert_eq!(rec.sound_or_vibration(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn start_run_goes_through_countdown() {
        let (mut d, _rec) = driver(TokioClock::new(), &config(5, 3));
        let started = tokio::time::Instant::now();
        let event = d.start_run().await;
        assert!(matches!(event, Some(Event::TimerStarted { .. })));
        assert_eq!(d.status(), TimerStatus::Running);
        assert!(started.elapsed() >= Duration::from_millis(3_000));
    }

    #[tokio::test(start_paused = true)]
    async fn start_run_without_countdown_starts_immediately() {
        let cfg = WidgetConfig {
            countdown_before_start: false,
            ..config(5, 3)
        };
        let (mut d, rec) = driver(TokioClock::new(), &cfg);
        d.start_run().await;
        assert_eq!(d.status(), TimerStatus::Running);
        assert_eq!(rec.count(|c| matches!(c, Call::Countdown(_))), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn redraw_loop_switches_phase_once() {
        let (mut d, rec) = driver(TokioClock::new(), &config(5, 3));
        d.start();

        let _ = tokio::time::timeout(Duration::from_millis(5_500), d.run_frames()).await;

        assert_eq!(d.status(), TimerStatus::Running);
        assert_eq!(d.timer().phase(), Phase::Rest);
        assert_eq!(d.timer().phase_count(), 1);
        assert_eq!(rec.count(|c| matches!(c, Call::Tone(_))), 1);
        assert!(rec.count(|c| matches!(c, Call::Render(_))) > 100);
    }

    #[tokio::test(start_paused = true)]
    async fn redraw_loop_ends_when_not_running() {
        let (mut d, _rec) = driver(TokioClock::new(), &config(5, 3));
        // Idle: nothing to arm.
        d.run_frames().await;

        d.start();
        d.pause();
        d.run_frames().await;
        assert_eq!(d.status(), TimerStatus::Paused);
    }
}
