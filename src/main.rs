// esostep: step-through interpreter for esoteric tape and grid languages

use std::error::Error;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn, Level};

use esostep::config::{EngineConfig, DEFAULT_RNG_SEED};
use esostep::engine::{run_until_end, EngineError, StaticHost};
use esostep::grid::{parse_dims, Grid, GridDims};
use esostep::lang::{LanguageKind, Program, SessionOptions};
use esostep::snapshot::Snapshot;
use esostep::ui::App;

/// Step through Stun Step, Suffolk, WII2D and Back programs
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Language to start in (stun-step, suffolk, wii2d, back)
    language: LanguageKind,

    /// Program file to load
    file: Option<PathBuf>,

    /// Input characters for Suffolk's `,`
    #[arg(long, default_value = "")]
    input: String,

    /// Grid size for WII2D and Back, as ROWSxCOLS
    #[arg(long, value_parser = parse_dims)]
    grid: Option<GridDims>,

    /// Seed for WII2D's `?`
    #[arg(long, default_value_t = DEFAULT_RNG_SEED)]
    seed: u64,

    /// Milliseconds between steps while running
    #[arg(long, value_name = "MS")]
    interval: Option<u64>,

    /// Lower bound in milliseconds for any step interval
    #[arg(long, value_name = "MS")]
    min_interval: Option<u64>,

    /// Run without the TUI and print the result
    #[arg(long)]
    headless: bool,

    /// Step limit for headless runs
    #[arg(long, default_value_t = 10_000)]
    max_steps: usize,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// More log detail (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::default();
        if let Some(ms) = self.min_interval {
            config.min_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = self.interval {
            config.interval = config.clamp(Duration::from_millis(ms));
        }
        config
    }

    fn session_options(&self) -> SessionOptions {
        SessionOptions {
            config: self.engine_config(),
            input: self.input.clone(),
            rng_seed: self.seed,
        }
    }
}

/// Install a plain-text file subscriber; the TUI owns the terminal
fn init_logging(path: &Path, verbose: u8) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .try_init()
        .map_err(|e| -> Box<dyn Error> { e })?;
    Ok(())
}

/// Read the program file and shape it for the language
fn load_program(cli: &Cli) -> Result<Option<Program>, EngineError> {
    let text = match &cli.file {
        Some(path) => Some(fs::read_to_string(path).map_err(|source| EngineError::ReadProgram {
            path: path.clone(),
            source,
        })?),
        None => None,
    };

    if !cli.language.is_grid() {
        if cli.grid.is_some() {
            warn!(language = %cli.language, "--grid ignored for a text language");
        }
        return Ok(text.map(Program::Text));
    }

    let grid = match (text, cli.grid) {
        (Some(text), Some(dims)) => Some(Grid::from_text(&text, dims.rows, dims.cols)),
        (Some(text), None) => Some(Grid::fit_text(&text)),
        (None, Some(dims)) => Some(Grid::blank(dims.rows, dims.cols)),
        (None, None) => None,
    };
    Ok(grid.map(Program::Grid))
}

fn print_result(snapshot: &Snapshot) {
    if snapshot.displays.output {
        print!("{}", snapshot.state.output);
        if !snapshot.state.output.ends_with('\n') && !snapshot.state.output.is_empty() {
            println!();
        }
    }
    if snapshot.displays.register {
        println!("register: {}", snapshot.state.register);
    }
    if snapshot.displays.tape {
        println!("tape: {:?}", snapshot.state.tape);
        println!("pointer: {}", snapshot.state.pointer);
    }

    let status = if snapshot.terminated { "ended" } else { "stopped" };
    eprintln!("{} after {} step(s)", status, snapshot.step);
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log {
        init_logging(path, cli.verbose)?;
    }

    let program = match load_program(&cli) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let options = cli.session_options();
    info!(language = %cli.language, headless = cli.headless, "starting");

    if cli.headless {
        let program = program.unwrap_or_else(|| {
            if cli.language.is_grid() {
                Program::Grid(Grid::blank(1, 1))
            } else {
                Program::default()
            }
        });
        let mut session = cli.language.session(program, &options);
        let mut host = StaticHost::new(Instant::now(), true);
        let snapshot = run_until_end(session.as_mut(), &mut host, cli.max_steps);
        print_result(&snapshot);
        return Ok(());
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(cli.language, program, &options);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
