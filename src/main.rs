//! Neon Runner entry point
//!
//! Sets up the terminal, builds the session and runs the 60 Hz frame loop.

use std::io::{BufWriter, Write, stdout};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crossterm::{
    ExecutableCommand, cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal,
};

use neon_runner::audio;
use neon_runner::consts::FPS;
use neon_runner::leaderboard::HttpLeaderboard;
use neon_runner::platform::{FrameClock, InputPump};
use neon_runner::renderer::RenderContext;
use neon_runner::{Flow, Session, Settings};

const LOG_FILE: &str = "neon_runner.log";

/// Log to a file; the terminal belongs to the game
fn init_logger() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match std::fs::File::create(LOG_FILE) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            // No writable log file: stay quiet rather than scribble on the screen
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> neon_runner::Result<()> {
    init_logger();
    log::info!("Neon Runner starting...");

    let settings = Settings::load(Path::new(Settings::FILE_NAME));
    let seed = seed_from_clock();
    log::info!("Session seed: {}", seed);

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Key-release reporting where the terminal supports it
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    let result = run(&mut out, &settings, seed);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("Exiting on error: {}", e);
    } else {
        log::info!("Neon Runner exited");
    }
    result
}

fn run<W: Write>(out: &mut W, settings: &Settings, seed: u64) -> neon_runner::Result<()> {
    let sink = HttpLeaderboard::new(settings.leaderboard_endpoint.clone());
    log::info!("Submitting scores to {}", sink.endpoint());
    let audio = audio::open(settings);
    let mut session = Session::new(seed, sink, audio, settings.leaderboard_page.clone());

    let (cols, rows) = terminal::size()?;
    let mut render = RenderContext::new(out, cols, rows, settings.quality, seed ^ 0x5eed);
    let mut input = InputPump::spawn();
    let mut clock = FrameClock::new(FPS);

    loop {
        let frame_input = input.poll();
        if session.frame(&frame_input) == Flow::Quit {
            break;
        }

        let (cols, rows) = terminal::size()?;
        if render.size() != (cols, rows) {
            render.resize(cols, rows);
        }
        render.draw(&session)?;

        clock.wait();
    }
    Ok(())
}
