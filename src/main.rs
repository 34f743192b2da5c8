mod cli;
mod stopwatch;
mod ui;

use std::fs::File;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, terminal};
use stopwatch_core::{Pump, Schedule, TICK_PERIOD_MS};

use crate::cli::Arguments;
use crate::stopwatch::StopwatchState;
use crate::ui::Chrome;

const APP_NAME: &str = "ChronoSync";

// Input wait while nothing is ticking
const IDLE_POLL_MS: u64 = 500;

const HELP_TEXT: &str = "STOPWATCH HELP\n\n\
                         Space  Start/Pause\n\
                         Enter  Start/Pause\n\
                         l      Record lap\n\
                         r      Reset\n\
                         Up/Dn  Scroll laps\n\
                         ?      Help\n\
                         q      Quit";

struct ChronoApp<W: Write> {
    out: W,
    screensize: (u16, u16),
    chrome: Chrome,
    epoch: Instant,
    frame_ms: u64,

    stopwatch: StopwatchState,
    pump: Pump,
    last_draw_ms: u64,

    help_visible: bool,
    confirm_exit: bool,
    quit: bool,
}

impl<W: Write> ChronoApp<W> {
    fn new(out: W, screensize: (u16, u16), chrome: Chrome, frame_ms: u64) -> Self {
        Self {
            out,
            screensize,
            chrome,
            epoch: Instant::now(),
            frame_ms,
            stopwatch: StopwatchState::new(),
            pump: Pump::new(),
            last_draw_ms: 0,
            help_visible: false,
            confirm_exit: false,
            quit: false,
        }
    }

    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn redraw(&mut self) -> io::Result<()> {
        self.last_draw_ms = self.now_ms();

        if self.help_visible {
            return ui::draw_help(&mut self.out, self.screensize, &self.chrome, HELP_TEXT);
        }
        if self.confirm_exit {
            return ui::draw_confirm_exit(&mut self.out, self.screensize, &self.chrome);
        }
        ui::draw_stopwatch(&mut self.out, self.screensize, &self.stopwatch, &self.chrome)
    }

    fn start_pump(&mut self, interval_ms: u64) {
        if !self.pump.is_running() {
            let now = self.now_ms();
            self.pump.start(now, interval_ms);
            log::debug!("pump started, {} ms interval", interval_ms);
        }
    }

    fn stop_pump(&mut self) {
        if self.pump.is_running() {
            self.pump.stop();
            log::debug!("pump stopped");
        }
    }

    fn apply(&mut self, schedule: Schedule) {
        match schedule {
            Schedule::Start => self.start_pump(TICK_PERIOD_MS),
            Schedule::Cancel => self.stop_pump(),
        }
    }

    /// One tick per due period; redraws are throttled to `frame_ms`.
    fn handle_pump(&mut self, now_ms: u64) -> io::Result<()> {
        if !self.pump.fire(now_ms) {
            return Ok(());
        }
        self.stopwatch.tick();
        if now_ms.saturating_sub(self.last_draw_ms) >= self.frame_ms {
            self.redraw()?;
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> io::Result<()> {
        // Bindings ignore case so Caps Lock doesn't swallow them
        let code = match key.code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };

        if key.modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
            self.stop_pump();
            self.quit = true;
            return Ok(());
        }

        // Any key dismisses help
        if self.help_visible {
            self.help_visible = false;
            return self.redraw();
        }

        if self.confirm_exit {
            match code {
                KeyCode::Char('y') => {
                    self.stop_pump();
                    self.quit = true;
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    self.confirm_exit = false;
                    self.redraw()?;
                }
                _ => {}
            }
            return Ok(());
        }

        match code {
            KeyCode::Char(' ') | KeyCode::Enter => {
                let schedule = self.stopwatch.toggle_running();
                self.apply(schedule);
            }
            KeyCode::Char('l') => self.stopwatch.record_lap(),
            KeyCode::Char('r') => {
                let schedule = self.stopwatch.reset();
                self.apply(schedule);
            }
            KeyCode::Up => self.stopwatch.scroll_up(),
            KeyCode::Down => self.stopwatch.scroll_down(),
            KeyCode::Char('?') => self.help_visible = true,
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.stopwatch.timer.is_running() {
                    self.confirm_exit = true;
                } else {
                    self.quit = true;
                    return Ok(());
                }
            }
            _ => return Ok(()),
        }
        self.redraw()
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Resize(cols, rows) => {
                self.screensize = (cols, rows);
                self.redraw()
            }
            _ => Ok(()),
        }
    }
}

/// Puts the terminal back however `run` exits.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("can't enable raw mode")?;
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)
            .context("can't enter alternate screen")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen) {
            log::error!("couldn't leave alternate screen: {}", e);
        }
        if let Err(e) = terminal::disable_raw_mode() {
            log::error!("couldn't disable raw mode: {}", e);
        }
    }
}

fn set_log_level(arguments: &Arguments) -> anyhow::Result<()> {
    let level = match arguments.verbosity {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::new();
    match &arguments.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("can't open log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            builder.filter_level(level);
            if let Ok(filter) = std::env::var("RUST_LOG") {
                builder.parse_filters(&filter);
            }
        }
        // Stderr belongs to the terminal UI
        None => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.write_style(env_logger::WriteStyle::Never);
    builder.try_init()?;

    Ok(())
}

fn run(arguments: Arguments) -> anyhow::Result<()> {
    let chrome = Chrome {
        clock: arguments.clock,
        title: arguments.title,
    };
    let screensize = terminal::size().context("can't read terminal size")?;

    let _guard = TerminalGuard::enter()?;
    let mut app = ChronoApp::new(io::stdout(), screensize, chrome, arguments.frame_ms);
    app.redraw()?;

    while !app.quit {
        let now = app.now_ms();
        let wait_ms = app.pump.timeout_ms(now).unwrap_or(IDLE_POLL_MS);
        if event::poll(Duration::from_millis(wait_ms))? {
            app.handle_event(event::read()?)?;
        }
        let now = app.now_ms();
        app.handle_pump(now)?;
    }

    log::info!(
        "final time {} with {} laps",
        stopwatch_core::format_display(app.stopwatch.timer.elapsed_ms()),
        app.stopwatch.timer.laps().len()
    );
    Ok(())
}

fn main() {
    let arguments = cli::Arguments::parse();
    if let Err(e) = set_log_level(&arguments) {
        eprintln!("{}: failed to configure logging: {:#}", APP_NAME, e);
        std::process::exit(1);
    }

    log::info!("{} starting", APP_NAME);
    log::debug!("{:?}", arguments);

    if let Err(e) = run(arguments) {
        log::error!("unable to run: {:#}", e);
        eprintln!("{}: {:#}", APP_NAME, e);
        std::process::exit(1);
    }
}
