//! Interactive run loop.
//!
//! Everything happens on one thread. Keyboard lines, redraw ticks and
//! countdown ticks all arrive as messages on a single channel, and only the
//! loop below touches the driver. Background tasks never mutate state; the
//! driver re-checks the timer status for every message, so a tick that was
//! already queued when the user paused or reset is dropped.

use std::ops::ControlFlow;
use std::path::Path;
use std::time::Duration;

use clap::Args;
use intervals_core::timer::{run_countdown, run_periodic};
use intervals_core::error::Result;
use intervals_core::{
    CountdownHandle, CountdownOutcome, Event, MonotonicClock, TimerStatus,
    WidgetConfig, WidgetDriver,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_util::sync::CancellationToken;

use crate::terminal::{TerminalBell, TerminalDisplay, TerminalHaptics};

#[derive(Args)]
pub struct RunArgs {
    /// Work phase length in seconds
    #[arg(long)]
    pub work: Option<u64>,
    /// Rest phase length in seconds
    #[arg(long)]
    pub rest: Option<u64>,
    /// Start muted
    #[arg(long)]
    pub muted: bool,
    /// Skip the 3-2-1 countdown before a fresh start
    #[arg(long)]
    pub no_countdown: bool,
    /// Start immediately instead of waiting for `s`
    #[arg(long)]
    pub autostart: bool,
}

enum Message {
    Input(String),
    InputClosed,
    Frame,
    CountdownTick(CountdownHandle, u8),
    CountdownDone(CountdownHandle, CountdownOutcome),
}

const HELP: &str = "\
commands: s start/resume  p pause/resume  r reset  m mute  c cancel countdown
          w <secs> work length  b <secs> rest length  ? help  q quit";

pub fn run(args: RunArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = WidgetConfig::load(config_path)?;
    if let Some(work) = args.work {
        config.work_secs = work;
    }
    if let Some(rest) = args.rest {
        config.rest_secs = rest;
    }
    config.muted |= args.muted;
    if args.no_countdown {
        config.countdown_before_start = false;
    }
    config.validate()?;

    tracing::info!(
        work_secs = config.work_secs,
        rest_secs = config.rest_secs,
        countdown = config.countdown_before_start,
        "starting interval timer"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(event_loop(config, args.autostart));
    // The stdin reader sits in a blocking read; don't wait for it.
    runtime.shutdown_background();
    result
}

async fn event_loop(config: WidgetConfig, autostart: bool) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut driver = WidgetDriver::new(
        MonotonicClock::new(),
        &config,
        Box::new(TerminalDisplay::new()),
        Box::new(TerminalBell::new(&config)),
        Box::new(TerminalHaptics::new(&config.haptics, &config.countdown_cues)),
    );

    spawn_input(tx.clone());
    eprintln!("{HELP}");
    if autostart {
        start(&mut driver, &tx);
    }

    while let Some(message) = rx.recv().await {
        match message {
            Message::Input(line) => {
                if handle_line(&mut driver, &line, &tx).is_break() {
                    break;
                }
            }
            Message::InputClosed => break,
            Message::Frame => {
                driver.frame();
            }
            Message::CountdownTick(handle, value) => {
                driver.countdown_tick(&handle, value);
            }
            Message::CountdownDone(handle, outcome) => {
                let finished = driver.finish_countdown(&handle, outcome);
                if matches!(
                    finished,
                    Some(Event::CountdownFinished {
                        outcome: CountdownOutcome::Completed,
                        ..
                    })
                ) {
                    start_now(&mut driver, &tx);
                }
            }
        }
    }

    driver.reset();
    println!();
    Ok(())
}

fn handle_line(
    driver: &mut WidgetDriver,
    line: &str,
    tx: &UnboundedSender<Message>,
) -> ControlFlow<()> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return ControlFlow::Continue(());
    };
    let arg = parts.next().unwrap_or("");

    match command {
        "s" => start(driver, tx),
        "p" => match driver.status() {
            TimerStatus::Running => {
                driver.pause();
            }
            TimerStatus::Paused => start_now(driver, tx),
            _ => {}
        },
        "r" => {
            driver.reset();
        }
        "m" => {
            driver.toggle_mute();
            let state = if driver.timer().is_muted() { "muted" } else { "sound on" };
            eprintln!("\n{state}");
        }
        "c" => {
            driver.cancel_countdown();
        }
        "w" => report_input(driver.submit_work(arg), driver.work_field().text(), "work"),
        "b" => report_input(driver.submit_rest(arg), driver.rest_field().text(), "rest"),
        "?" | "h" => eprintln!("{HELP}"),
        "q" => return ControlFlow::Break(()),
        other => eprintln!("\nunknown command '{other}', type ? for help"),
    }
    ControlFlow::Continue(())
}

fn report_input(
    result: std::result::Result<(), intervals_core::InputError>,
    shown: &str,
    which: &str,
) {
    match result {
        Ok(()) => eprintln!("\n{which} set to {shown}s"),
        Err(e) => eprintln!("\n{which} rejected: {e} (still {shown}s)"),
    }
}

/// The start key: fresh starts go through the countdown when configured.
fn start(driver: &mut WidgetDriver, tx: &UnboundedSender<Message>) {
    match driver.status() {
        TimerStatus::Idle if driver.countdown_before_start() => {
            if let Some(handle) = driver.begin_countdown() {
                spawn_countdown(handle, driver.countdown_cadence(), tx.clone());
            }
        }
        _ => start_now(driver, tx),
    }
}

fn start_now(driver: &mut WidgetDriver, tx: &UnboundedSender<Message>) {
    if driver.start().is_none() {
        return;
    }
    if let Some(token) = driver.arm_redraw() {
        spawn_redraw(token, driver.frame_interval(), tx.clone());
    }
}

fn spawn_redraw(token: CancellationToken, period: Duration, tx: UnboundedSender<Message>) {
    tokio::spawn(async move {
        run_periodic(&token, period, || match tx.send(Message::Frame) {
            Ok(()) => ControlFlow::Continue(()),
            Err(_) => ControlFlow::Break(()),
        })
        .await;
    });
}

fn spawn_countdown(handle: CountdownHandle, cadence: Duration, tx: UnboundedSender<Message>) {
    tokio::spawn(async move {
        let outcome = run_countdown(&handle, cadence, |value| {
            let _ = tx.send(Message::CountdownTick(handle.clone(), value));
        })
        .await;
        let _ = tx.send(Message::CountdownDone(handle, outcome));
    });
}

fn spawn_input(tx: UnboundedSender<Message>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(Message::Input(line)).is_err() {
                        break;
                    }
                }
                Ok(None) | Err(_) => {
                    let _ = tx.send(Message::InputClosed);
                    break;
                }
            }
        }
    });
}
