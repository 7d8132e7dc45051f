//! inkmap
//!
//! Generates a level and prints its debug map, or the room descriptors of
//! the carved route as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ink_cli::{CliError, generate_with_retries, load_shape_dir, load_template};
use ink_core::{GameRng, LevelTemplate, RoomDescriptor, ShapeLibrary};

/// Procedural level generator
#[derive(Parser, Debug)]
#[command(name = "inkmap")]
#[command(author, version, about = "Generate ink-blocked room levels", long_about = None)]
struct Args {
    /// Random seed; a random one is used when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Level template (JSON)
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Shape directory laid out as <dir>/<Side>/*.json
    #[arg(long)]
    shapes: Option<PathBuf>,

    /// Grid width override
    #[arg(long)]
    width: Option<usize>,

    /// Grid height override
    #[arg(long)]
    height: Option<usize>,

    /// Graphite budget override
    #[arg(short, long)]
    graphite: Option<usize>,

    /// Key count override
    #[arg(short, long)]
    keys: Option<usize>,

    /// Seeds to try before giving up
    #[arg(short, long, default_value_t = 8)]
    attempts: u32,

    /// Print room descriptors as JSON instead of the map
    #[arg(long)]
    json: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "inkmap failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let mut template = match &args.template {
        Some(path) => load_template(path)?,
        None => LevelTemplate::default(),
    };
    if let Some(width) = args.width {
        template.width = width;
    }
    if let Some(height) = args.height {
        template.height = height;
    }
    if let Some(graphite) = args.graphite {
        template.graphite = graphite;
    }
    if let Some(keys) = args.keys {
        template.key_count = keys;
    }
    template.validate()?;

    let mut shapes = match &args.shapes {
        Some(dir) => load_shape_dir(dir)?,
        None => ShapeLibrary::builtin()?,
    };

    let seed = args.seed.unwrap_or_else(|| GameRng::from_entropy().seed());
    let (mut level, used_seed) = generate_with_retries(&template, &mut shapes, seed, args.attempts)?;

    if args.json {
        level.follow_route()?;
        let mut rooms: Vec<RoomDescriptor> = Vec::new();
        level.hand_off(&mut rooms);
        println!("{}", serde_json::to_string_pretty(&rooms)?);
    } else {
        println!(
            "seed {}  axis {}  start {}  exit {}  route {}  cleared {}{}",
            used_seed,
            level.axis(),
            level.start(),
            level.exit(),
            level.route().len(),
            level.cleared().len(),
            if level.was_truncated() { "  (exit moved)" } else { "" }
        );
        print!("{}", level.render_ascii());
    }
    Ok(())
}
