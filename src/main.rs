use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gridsnake::surface::{CanvasSurface, RetainedSurface};
use gridsnake::term::TermManager;
use gridsnake::{GameConfig, GameLoop};

#[derive(Parser)]
#[command(name = "gridsnake")]
#[command(version, about = "Snake on a 30x30 grid, arrow keys to steer, Ctrl+C to quit")]
struct Cli {
    /// How frames reach the terminal
    #[arg(long, value_enum, default_value_t = SurfaceKind::Canvas)]
    surface: SurfaceKind,

    /// Where log lines go; the terminal itself is busy drawing
    #[arg(long, default_value = "gridsnake.log")]
    log_file: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum SurfaceKind {
    /// Repaint every cell each frame
    Canvas,
    /// Keep one node per rectangle and write only what changed
    Retained,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let config = GameConfig::default();
    config.validate().context("invalid game configuration")?;
    let mut game = GameLoop::standard(&config);

    let mut term = TermManager::new().context("reading terminal size")?;
    term.setup().context("preparing terminal")?;

    let (cols, rows) = term.get_terminal_size();
    let (need_cols, need_rows) = (config.grid_width() * 2, config.grid_height());
    if i32::from(cols) < need_cols || i32::from(rows) < need_rows {
        warn!(cols, rows, need_cols, need_rows, "terminal smaller than the field, clipping");
    } else {
        info!(cols, rows, "terminal ready");
    }

    // The terminal is restored before any game error is reported
    let (outcome, restored) = match cli.surface {
        SurfaceKind::Canvas => {
            let mut surface = CanvasSurface::new(term, config.cell_size);
            let outcome = game.initialize(&mut surface);
            (outcome, surface.console_mut().restore())
        }
        SurfaceKind::Retained => {
            let mut surface = RetainedSurface::new(term, config.cell_size);
            let outcome = game.initialize(&mut surface);
            (outcome, surface.console_mut().restore())
        }
    };

    outcome.context("game loop failed")?;
    restored.context("restoring terminal")?;
    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gridsnake=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}
