use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, KeyEventKind};
use crossterm::execute;
use serde::Serialize;

use radialtop::app::App;
use radialtop::config::{self, load_config, load_config_from_path};
use radialtop::event::{Event, EventHandler};
use radialtop::radial::build_scene;
use radialtop::radial::geometry::Scene;
use radialtop::system::collector::Collector;
use radialtop::system::source::{DataSource, JsonFileSource};
use radialtop::system::summary::SystemSummary;
use radialtop::{logging, ui};

#[derive(Parser)]
#[command(
    name = "radialtop",
    about = "TUI process monitor drawing the process tree as a radial graph"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Poll interval in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Color support: auto, 256, truecolor, mono
    #[arg(long)]
    color: Option<String>,

    /// Distance between a parent's label anchor and its children
    #[arg(long)]
    edge_radius: Option<f64>,

    /// Read samples from a JSON metrics document instead of this host
    #[arg(long)]
    input: Option<PathBuf>,

    /// Poll once, print the scene as JSON and exit
    #[arg(long, default_value_t = false)]
    dump_scene: bool,

    /// Write logs to this file (the terminal belongs to the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log JSON lines instead of plain text
    #[arg(long, default_value_t = false)]
    log_json: bool,

    /// Log level or filter directive, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        logging::init(path, cli.log_json, &cli.log_level)?;
    }
    let config = load_config_for_cli(&cli);
    let source = data_source_for_cli(&cli)?;

    if cli.dump_scene {
        return dump_scene(config, source);
    }

    let mut terminal = ratatui::init();
    execute!(stdout(), EnableMouseCapture)?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = execute!(std::io::stdout(), DisableMouseCapture);
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, config, source).await;

    execute!(stdout(), DisableMouseCapture)?;
    ratatui::restore();

    result
}

async fn run(
    terminal: &mut ratatui::DefaultTerminal,
    config: config::Config,
    source: Box<dyn DataSource>,
) -> Result<()> {
    let poll_interval = Duration::from_millis(config.general.refresh_rate_ms.max(1));
    let mut app = App::new(config, source);
    let mut events = EventHandler::new(poll_interval);
    tracing::info!(interval_ms = poll_interval.as_millis() as u64, "radialtop started");

    terminal.draw(|frame| ui::draw(frame, &mut app))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        let should_draw = match event {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Press {
                    let action = app.map_key(key);
                    app.dispatch(action);
                    true
                } else {
                    false
                }
            }
            Event::Mouse(mouse) => {
                let action = app.map_mouse(mouse);
                app.dispatch(action);
                true
            }
            // Handled inline, so a slow poll delays the next one instead of overlapping it.
            Event::Tick => {
                app.refresh_data();
                true
            }
            Event::Resize => true,
        };
        if should_draw {
            terminal.draw(|frame| ui::draw(frame, &mut app))?;
        }
    }

    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(ref support) = cli.color {
        config.general.color_support = support.clone();
    }
    if let Some(radius) = cli.edge_radius {
        config.radial.edge_radius = radius;
    }

    config
}

fn data_source_for_cli(cli: &Cli) -> Result<Box<dyn DataSource>> {
    match &cli.input {
        Some(path) => {
            if !path.is_file() {
                return Err(eyre!("input file {} does not exist", path.display()));
            }
            Ok(Box::new(JsonFileSource::new(path)))
        }
        None => Ok(Box::new(Collector::new())),
    }
}

#[derive(Serialize)]
struct SceneDump {
    scene: Scene,
    summary: SystemSummary,
}

fn dump_scene(config: config::Config, mut source: Box<dyn DataSource>) -> Result<()> {
    let options = config.scene_options();
    let data = source
        .poll()
        .wrap_err("polling for --dump-scene")?
        .visible(&options);
    let scene = build_scene(&data.processes, &options, &config.radial.measure());
    let dump = SceneDump {
        scene,
        summary: data.summary,
    };
    println!("{}", serde_json::to_string_pretty(&dump)?);
    Ok(())
}
