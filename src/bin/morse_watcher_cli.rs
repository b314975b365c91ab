use std::env;
use std::thread;

use anyhow::{anyhow, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use morse_watcher::clock::utc_now_label;
use morse_watcher::morse::is_mapped;
use morse_watcher::playback::{DisplaySnapshot, Phase, PlaybackDriver};
use morse_watcher::sequence::{build_full_display, build_sequence, sequence_duration, Event};
use morse_watcher::timing::TimingInputs;
use morse_watcher::DEFAULT_MESSAGE;

const STREAM_WIDTH: usize = 48;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "morse_watcher=info,morse_watcher_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return Ok(());
    }

    let mut message = DEFAULT_MESSAGE.to_string();
    let mut inputs = TimingInputs::default();
    let mut loops = 1usize;
    let mut dump = false;
    let mut full = false;
    let mut print_timing = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--message" => {
                i += 1;
                message = args.get(i).cloned().ok_or_else(|| anyhow!("missing message"))?;
            }
            "--on-short" => {
                i += 1;
                inputs.on_short = args.get(i).cloned().ok_or_else(|| anyhow!("missing on-short"))?;
            }
            "--on-long" => {
                i += 1;
                inputs.on_long = args.get(i).cloned().ok_or_else(|| anyhow!("missing on-long"))?;
            }
            "--off-short" => {
                i += 1;
                inputs.off_short = args.get(i).cloned().ok_or_else(|| anyhow!("missing off-short"))?;
            }
            "--off-medium" => {
                i += 1;
                inputs.off_medium = args.get(i).cloned().ok_or_else(|| anyhow!("missing off-medium"))?;
            }
            "--off-long" => {
                i += 1;
                inputs.off_long = args.get(i).cloned().ok_or_else(|| anyhow!("missing off-long"))?;
            }
            "--loops" => {
                i += 1;
                loops = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing loop count"))?
                    .parse::<usize>()?;
            }
            "--dump" => {
                dump = true;
            }
            "--full" => {
                full = true;
            }
            "--print-timing" => {
                print_timing = true;
            }
            other => {
                return Err(anyhow!("unknown arg: {}", other));
            }
        }
        i += 1;
    }

    let message = message.trim().to_uppercase();
    let timing = inputs.resolve();

    let skipped: Vec<char> = message.chars().filter(|c| *c != ' ' && !is_mapped(*c)).collect();
    if !skipped.is_empty() {
        warn!(?skipped, "characters without a Morse code will not be sent");
    }

    if print_timing {
        println!("{}", serde_json::to_string_pretty(&timing)?);
        return Ok(());
    }
    if full {
        println!("{}", build_full_display(&message));
        return Ok(());
    }
    if dump {
        let sequence = build_sequence(&message, &timing);
        for event in &sequence {
            println!("{}", describe(event));
        }
        println!(
            "{} events, {:.1} s per pass",
            sequence.len(),
            sequence_duration(&sequence).as_secs_f32()
        );
        return Ok(());
    }

    info!(loops, ?timing, "starting playback");

    let mut driver = PlaybackDriver::new(message, timing);
    let mut wakeup = driver.restart(timing);
    let mut last = driver.display().clone();
    print_snapshot(&last);

    let mut completed = 0usize;
    loop {
        thread::sleep(wakeup.delay);
        wakeup = driver
            .fire(wakeup.ticket)
            .ok_or_else(|| anyhow!("playback lost its pending step"))?;

        if driver.display() != &last {
            last = driver.display().clone();
            print_snapshot(&last);
        }

        if driver.phase() == Phase::Complete {
            completed += 1;
            if loops != 0 && completed >= loops {
                break;
            }
        }
    }

    info!(completed, "playback finished");
    Ok(())
}

fn describe(event: &Event) -> String {
    match event {
        Event::Pulse {
            duration,
            symbol,
            code,
            letter,
        } => format!("pulse {:>5} ms  {}  ({} {})", duration, symbol, letter, code),
        Event::Gap { duration } => format!("gap   {:>5} ms", duration),
        Event::LetterComplete { letter } => format!("letter {}", letter),
        Event::WordBreak => "word break".to_string(),
    }
}

fn print_snapshot(view: &DisplaySnapshot) {
    if let Some(banner) = &view.banner {
        println!("[{}] {}", utc_now_label(), banner);
        return;
    }
    let light = if view.light_active { '●' } else { '○' };
    println!(
        "[{}] {} {:<11} {:>13} | {:<width$} | {}",
        utc_now_label(),
        light,
        view.calibration,
        view.pulse_width,
        view.symbol_tail(STREAM_WIDTH),
        view.decoded,
        width = STREAM_WIDTH,
    );
}

fn print_usage() {
    eprintln!("Usage: morse-watcher-cli [--message text] [--on-short ms] [--on-long ms] [--off-short ms] [--off-medium ms] [--off-long ms] [--loops N (0 = forever)] [--dump] [--full] [--print-timing]");
}
