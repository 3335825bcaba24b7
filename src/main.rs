use std::fs::File;
use std::io::{self, Stdout, stdout};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, terminal,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use runner_tui::config::Cli;
use runner_tui::input::{DuckLatch, InputEvent, Intent, map_key, map_mouse};
use runner_tui::render::{self, PixelBuf};
use runner_tui::session::Session;
use runner_tui::sound::Sounds;

/// Without release events a held key only repeats; outlast the usual
/// auto-repeat delay before letting go of duck.
const DUCK_HOLD: Duration = Duration::from_millis(600);

fn init_logging(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

struct Terminal {
    out: Stdout,
    enhanced: bool,
}

impl Terminal {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            EnableMouseCapture,
        )?;
        let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        Ok(Self { out, enhanced })
    }

    fn leave(&mut self) -> io::Result<()> {
        if self.enhanced {
            execute!(self.out, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.out,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let sounds = if cli.mute {
        Sounds::muted()
    } else {
        Sounds::open_or_muted()
    };

    let mut term = Terminal::enter().context("setting up terminal")?;
    let result = run(&cli, &mut term, &sounds);

    // Always try to restore the terminal.
    let restored = term.leave();
    result?;
    restored.context("restoring terminal")
}

fn run(cli: &Cli, term: &mut Terminal, sounds: &Sounds) -> Result<()> {
    let cfg = cli.game_config();
    let spawn_every = cfg.spawn_interval;
    let frame_dur = cli.frame_duration();

    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::for_terminal(cols, rows);
    let mut term_rows = rows;
    let mut session = Session::new(cfg);
    let mut intent = Intent::new();
    let mut latch = (!term.enhanced).then(|| DuckLatch::new(DUCK_HOLD));
    let mut next_spawn = Instant::now() + spawn_every;

    info!(cols, rows, enhanced = term.enhanced, "terminal ready");

    loop {
        let frame_start = Instant::now();

        // Input
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => {
                    let Some(ev) = map_key(key) else { continue };
                    match ev {
                        InputEvent::Quit => return Ok(()),
                        InputEvent::Restart => {
                            if session.restart() {
                                intent.clear();
                                next_spawn = Instant::now() + spawn_every;
                            }
                        }
                        InputEvent::DuckPressed => {
                            if let Some(latch) = &mut latch {
                                latch.pressed(frame_start);
                            }
                            intent.apply(ev);
                        }
                        InputEvent::JumpPressed if key.kind == KeyEventKind::Repeat => {}
                        _ => intent.apply(ev),
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(ev) = map_mouse(mouse, term_rows) {
                        intent.apply(ev);
                    }
                }
                Event::Resize(c, r) => {
                    buf.resize(c as usize, r as usize * 2);
                    term_rows = r;
                }
                _ => {}
            }
        }
        if let Some(ev) = latch.as_mut().and_then(|l| l.poll(frame_start)) {
            intent.apply(ev);
        }

        // Spawn timer
        if frame_start >= next_spawn {
            session.spawn_tick();
            next_spawn += spawn_every;
            if next_spawn < frame_start {
                warn!("spawn timer fell behind, resyncing");
                next_spawn = frame_start + spawn_every;
            }
        }

        // Update
        let outcome = session.step(&intent.take_snapshot());
        for cue in outcome.cues {
            sounds.play(cue);
        }

        // Render
        render::draw(&session, &mut buf);
        buf.render(&mut term.out)?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}
