//! Epicycle - Fourier series drawn as rotating circles in the terminal.

use std::f64::consts::{PI, TAU};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use epicycle::animation::FourierAnimation;
use epicycle::app::App;
use epicycle::config::{AnimationConfig, MAX_FREQUENCY_LIMIT, PLOT_RANGE, SPEED_LIMIT};
use epicycle::fourier::{SamplingGrid, SpectrumMode};
use epicycle::report::{coefficient_report, save_report};
use epicycle::ui::{self, LayoutConfig};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "epicycle")]
#[command(about = "Fourier series of a periodic function drawn as rotating circles", long_about = None)]
struct Args {
    /// Waveform expression in t, e.g. "a*sin(k*t)"; overrides --preset
    expression: Option<String>,

    /// Preset waveform to start with
    #[arg(long, default_value = epicycle::presets::DEFAULT_PRESET)]
    preset: String,

    /// Samples per period
    #[arg(long, default_value_t = 256)]
    points: usize,

    /// Length of one period
    #[arg(long, default_value_t = TAU, allow_negative_numbers = true)]
    period: f64,

    /// Position of the first sample
    #[arg(long, default_value_t = -PI, allow_negative_numbers = true)]
    start: f64,

    /// Maximum frequency (number of circles minus one)
    #[arg(long, default_value_t = MAX_FREQUENCY_LIMIT)]
    circles: usize,

    /// Frames advanced per tick
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    speed: i64,

    /// Initial parameter value, as name=value (repeatable)
    #[arg(long = "param", value_name = "NAME=VALUE")]
    params: Vec<String>,

    /// Milliseconds between frames
    #[arg(long, default_value_t = 15)]
    interval: u64,

    /// Vertical range the waveform is squeezed into when it does not fit
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true)]
    plot_range: Option<Vec<f64>>,

    /// Spectrum used for the phasors: real or complex
    #[arg(long, default_value = "real")]
    spectrum: String,

    /// Enable logging to specified file
    #[arg(long)]
    log: Option<PathBuf>,

    /// Print the coefficient table and exit
    #[arg(long)]
    dump: bool,

    /// Write the --dump table to a file instead of stdout
    #[arg(long, requires = "dump")]
    output: Option<PathBuf>,
}

fn parse_param(text: &str) -> Result<(String, f64)> {
    let (name, value) = text
        .split_once('=')
        .ok_or_else(|| anyhow!("invalid --param '{}': expected NAME=VALUE", text))?;
    let value: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("invalid value in --param '{}'", text))?;
    Ok((name.trim().to_string(), value))
}

fn build_config(args: &Args) -> Result<AnimationConfig> {
    if !(1..=MAX_FREQUENCY_LIMIT).contains(&args.circles) {
        bail!("--circles must be between 1 and {}", MAX_FREQUENCY_LIMIT);
    }
    if !(-SPEED_LIMIT..=SPEED_LIMIT).contains(&args.speed) {
        bail!("--speed must be between {} and {}", -SPEED_LIMIT, SPEED_LIMIT);
    }
    if args.interval == 0 {
        bail!("--interval must be at least 1 ms");
    }
    let plot_range = match args.plot_range.as_deref() {
        Some(&[min, max]) => (min, max),
        Some(_) => bail!("--plot-range takes MIN and MAX"),
        None => PLOT_RANGE,
    };

    Ok(AnimationConfig {
        expression: args.expression.clone(),
        preset: args.preset.clone(),
        grid: SamplingGrid::new(args.start, args.period, args.points)?,
        mode: args.spectrum.parse::<SpectrumMode>()?,
        max_frequency: args.circles,
        speed: args.speed,
        params: args
            .params
            .iter()
            .map(|p| parse_param(p.as_str()))
            .collect::<Result<_>>()?,
        interval: Duration::from_millis(args.interval),
        plot_range,
        ..AnimationConfig::default()
    })
}

fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow!(e))?;
    tracing::info!("Starting Epicycle");
    Ok(())
}

fn dump(config: &AnimationConfig, output: Option<&Path>) -> Result<()> {
    let animation = FourierAnimation::new(config)?;
    match output {
        Some(path) => {
            let rows = save_report(&animation, path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("{} coefficients written to {}", rows, path.display());
        },
        None => print!("{}", coefficient_report(&animation)),
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    // Set up logging if --log option is provided
    if let Some(log_path) = &args.log {
        init_logging(log_path)?;
    }

    let config = build_config(&args)?;
    if args.dump {
        return dump(&config, args.output.as_deref());
    }

    // Build the app before touching the terminal so bad input fails cleanly
    let app = App::new(&config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    tracing::info!("Epicycle exited");
    Ok(())
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        },
        Err(e) => e.exit(),
    };

    if let Err(err) = run(args) {
        tracing::error!("{:#}", err);
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    let layout = LayoutConfig::default();
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui::draw(f, &app, &layout))?;

        let timeout = app.interval.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        if last_tick.elapsed() >= app.interval {
            app.tick();
            last_tick = Instant::now();
        }
    }
}
