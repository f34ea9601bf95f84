// Block planner CLI entry point.
//
// Stands in for the editor front end. Each invocation loads the saved block
// record (seeding it from the manifest when there is none, or when it is
// unreadable), runs one command against a `PlannerSession`, and writes the
// record back if anything changed. Mutating commands print the resulting
// events as JSON lines; `scene` prints the reconstructed 3D boxes.
//
// Usage:
//   cargo run -p block_planner_cli -- [--state blocks.json] [--foundation 2130x660]
//     [--layer N] [--seed N] [--config planner.json] [--manifest stock.json] <command>
//
// Logs go to stderr. `RUST_LOG=debug` shows every command and drop decision.
//
// The PRNG state is not saved between runs, so the seed defaults to the
// clock. A fixed `--seed` is only safe for a single `add` against a given
// record, since a rerun would mint the same ids again.

use anyhow::{Context, Result};
use block_planner_sim::command::PlannerCommand;
use block_planner_sim::config::PlannerConfig;
use block_planner_sim::manifest::Manifest;
use block_planner_sim::persist::{self, Bootstrap, SaveFile};
use block_planner_sim::session::PlannerSession;
use block_planner_sim::types::BlockId;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "planner")]
#[command(about = "Arrange blocks on a foundation across stacked layers")]
#[command(version)]
struct Cli {
    /// Saved block record
    #[arg(long, default_value = "blocks.json")]
    state: PathBuf,

    /// Foundation as LENGTHxWIDTH; defaults to the config's preset
    #[arg(long, value_parser = parse_foundation)]
    foundation: Option<FoundationArg>,

    /// Layer the cursor starts on
    #[arg(long, default_value_t = 0)]
    layer: u32,

    /// Seed for new ids and placement jitter
    #[arg(long)]
    seed: Option<u64>,

    /// Planner config (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed manifest (JSON list of {length, width, height, quantity})
    #[arg(long)]
    manifest: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List blocks with their state
    List {
        /// Only blocks in stock
        #[arg(long)]
        stock: bool,

        /// Only blocks placed on this layer
        #[arg(long, conflicts_with = "stock")]
        on_layer: Option<u32>,
    },

    /// List the layers that hold placed blocks
    Layers,

    /// Add stock blocks of one type
    Add {
        length: f64,
        width: f64,
        height: f64,
        #[arg(default_value_t = 1)]
        quantity: u32,
    },

    /// Move a stock block onto the foundation at the current layer
    Place { id: String },

    /// Return a placed block to stock
    Stock { id: String },

    /// End a drag: snap, commit as dropped, or return to stock
    #[command(allow_negative_numbers = true)]
    Drop {
        id: String,
        x: f64,
        y: f64,

        /// Stage height in pixels, stock strip included
        #[arg(long, default_value_t = 900.0)]
        stage_height: f64,
    },

    /// Rotate a block a quarter turn
    Rotate { id: String },

    /// Delete a block
    Remove { id: String },

    /// Print the 3D scene as JSON
    Scene,

    /// Write the raw block record to a file
    Export {
        #[arg(default_value = "blocks.txt")]
        out: PathBuf,
    },

    /// Delete the saved record so the next run reseeds
    Clear,
}

#[derive(Clone, Copy, Debug)]
struct FoundationArg {
    length: f64,
    width: f64,
}

fn parse_foundation(s: &str) -> Result<FoundationArg, String> {
    let (length, width) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected LENGTHxWIDTH, got {s:?}"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("bad foundation extent {v:?}: {e}"))
    };
    Ok(FoundationArg {
        length: parse(length)?,
        width: parse(width)?,
    })
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => PlannerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PlannerConfig::default(),
    };
    let manifest = match &cli.manifest {
        Some(path) => Manifest::load(path)
            .with_context(|| format!("loading manifest {}", path.display()))?,
        None => Manifest::default(),
    };
    let file = SaveFile::new(&cli.state);

    let mut session = PlannerSession::with_config(cli.seed.unwrap_or_else(clock_seed), config)
        .with_layer(cli.layer);
    let foundation = cli
        .foundation
        .map(|f| (f.length, f.width))
        .or(session.config().default_foundation);
    if let Some((length, width)) = foundation {
        session.set_foundation(length, width)?;
    }

    let saved = file
        .read()
        .with_context(|| format!("reading {}", file.path().display()))?;
    let outcome = session.bootstrap(saved.as_deref(), &manifest)?;
    let seeded = !matches!(outcome, Bootstrap::Restored { .. });

    let command = match cli.command {
        Command::List { stock, on_layer } => {
            list(&session, stock, on_layer);
            None
        }
        Command::Layers => {
            for layer in session.store().occupied_layers() {
                let count = session.store().on_layer(layer).count();
                println!("layer {layer}: {count} blocks");
            }
            None
        }
        Command::Scene => {
            let boxes = session.scene()?;
            let scene = serde_json::json!({
                "foundation": session.foundation(),
                "framing": session.framing()?,
                "boxes": boxes,
            });
            println!("{}", serde_json::to_string_pretty(&scene)?);
            None
        }
        Command::Export { out } => {
            std::fs::write(&out, persist::export(session.store())?)
                .with_context(|| format!("writing {}", out.display()))?;
            tracing::info!(path = %out.display(), count = session.store().len(), "exported blocks");
            None
        }
        Command::Clear => {
            file.clear()?;
            tracing::info!(path = %file.path().display(), "cleared saved blocks");
            return Ok(());
        }
        Command::Add {
            length,
            width,
            height,
            quantity,
        } => Some(PlannerCommand::AddBlocks {
            length,
            width,
            height,
            quantity,
        }),
        Command::Place { id } => Some(PlannerCommand::MoveFromStock { id: BlockId::from(id) }),
        Command::Stock { id } => Some(PlannerCommand::MoveToStock { id: BlockId::from(id) }),
        Command::Drop {
            id,
            x,
            y,
            stage_height,
        } => Some(PlannerCommand::DropBlock {
            id: BlockId::from(id),
            x,
            y,
            stage_height,
        }),
        Command::Rotate { id } => Some(PlannerCommand::Rotate { id: BlockId::from(id) }),
        Command::Remove { id } => Some(PlannerCommand::RemoveBlock { id: BlockId::from(id) }),
    };

    let mut changed = seeded;
    if let Some(command) = command {
        let events = session.apply(command)?;
        for event in &events {
            println!("{}", serde_json::to_string(event)?);
        }
        changed |= !events.is_empty();
    }

    if changed {
        file.save(session.store())
            .with_context(|| format!("saving {}", file.path().display()))?;
    }
    Ok(())
}

fn list(session: &PlannerSession, stock_only: bool, on_layer: Option<u32>) {
    let store = session.store();
    let blocks: Vec<_> = match (stock_only, on_layer) {
        (true, _) => store.stock().collect(),
        (false, Some(layer)) => store.on_layer(layer).collect(),
        (false, None) => store.iter().collect(),
    };
    for block in blocks {
        if block.in_stock {
            println!("{}  {}", block.id, block.listing_label());
        } else {
            println!(
                "{}  {}  at {} {}",
                block.id,
                block.listing_label(),
                block.corner(),
                block.rotation
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foundation_argument_forms() {
        let f = parse_foundation("2130x660").unwrap();
        assert_eq!((f.length, f.width), (2130.0, 660.0));
        let f = parse_foundation("12.5X40").unwrap();
        assert_eq!((f.length, f.width), (12.5, 40.0));
        assert!(parse_foundation("2130").is_err());
        assert!(parse_foundation("axb").is_err());
    }

    #[test]
    fn cli_parses_drop_with_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "planner",
            "--foundation",
            "100x50",
            "drop",
            "abc",
            "-12",
            "4.5",
        ])
        .unwrap();
        match cli.command {
            Command::Drop { id, x, y, stage_height } => {
                assert_eq!(id, "abc");
                assert_eq!((x, y), (-12.0, 4.5));
                assert_eq!(stage_height, 900.0);
            }
            _ => panic!("expected drop"),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
