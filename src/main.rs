use clap::Parser;
use tracing::info;

use hamlet::config::LayoutConfig;
use hamlet::engine::Engine;
use hamlet::observation::Chronicle;

#[derive(Parser, Debug)]
#[command(name = "hamlet")]
#[command(about = "Lays out a settlement: non-overlapping structures joined by a road network")]
struct Args {
    /// Build area size along x
    #[arg(short = 'x', long, default_value = "64")]
    width: i32,

    /// Build area size along z
    #[arg(short = 'z', long, default_value = "64")]
    depth: i32,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Output directory for the chronicle and layout snapshot
    #[arg(short, long, default_value = "output")]
    output: String,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = match args.verbose {
        0 => "hamlet=info",
        1 => "hamlet=debug",
        _ => "hamlet=trace",
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Hamlet v{}", env!("CARGO_PKG_VERSION"));

    // Load or create configuration
    let mut config = match args.config {
        Some(path) => LayoutConfig::from_file(&path)?,
        None => LayoutConfig::default_with(args.width, args.depth, args.seed),
    };
    if args.seed.is_some() {
        config.meta.seed = args.seed;
    }

    let name = config.meta.name.clone();
    let mut engine = Engine::new(config)?;
    let layout = engine.run()?;

    let mut chronicle = Chronicle::new(&args.output)?;
    chronicle.write_header(&name, &layout)?;
    for event in engine.events() {
        chronicle.log_event(event)?;
    }
    chronicle.write_footer(&layout)?;
    chronicle.save_snapshot(&layout)?;

    info!(
        "Layout complete: {} structures, {} road blocks. Chronicle written to {}/layout.md",
        layout.placement.placed.len(),
        layout.materialized.roads,
        args.output
    );
    Ok(())
}
