use std::error::Error;
use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use strata_nav::{OrderedShape, Solver, SolverConfig};
use strata_terrain::{NoiseTerrain, ZoneInfo};

#[derive(Parser, Debug)]
#[command(author, version, about = "Walkable-terrain boundary shapes from a height grid", long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["zone", "noise"])))]
struct Args {
    /// Zone descriptor (TOML) naming the terrain file
    #[arg(long)]
    zone: Option<PathBuf>,

    /// Generate a square noise terrain of this many samples per side
    #[arg(long)]
    noise: Option<usize>,

    /// Noise seed
    #[arg(long, default_value_t = 1337)]
    seed: i32,

    /// Noise sample spacing in world units
    #[arg(long, default_value_t = 2.0)]
    cell_size: f32,

    /// Noise peak height
    #[arg(long, default_value_t = 40.0)]
    amplitude: f32,

    /// Solver config (TOML); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run on a dedicated pool with this many threads
    #[arg(long)]
    threads: Option<usize>,

    /// Print every polygon's vertices
    #[arg(long)]
    dump: bool,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level)
        .parse_default_env()
        .init();

    let mut config = match &args.config {
        Some(path) => SolverConfig::from_path(path)?,
        None => SolverConfig::default(),
    };
    if args.threads.is_some() {
        config.threads = args.threads;
    }

    let mut solver = Solver::new(config)?;
    match (&args.zone, args.noise) {
        (Some(path), _) => {
            let zone = ZoneInfo::from_path(path)?;
            log::info!("zone {} -> {}", zone.name, zone.terrain.display());
            solver.initialize(&zone)?;
        }
        (None, Some(size)) => {
            let terrain = NoiseTerrain {
                cell_size: args.cell_size,
                amplitude: args.amplitude,
                ..NoiseTerrain::new(size, size, args.seed)
            };
            log::info!("noise terrain {}x{} seed={}", size, size, args.seed);
            solver.initialize(&terrain)?;
        }
        (None, None) => return Err("one of --zone or --noise is required".into()),
    }

    print_summary(&solver);
    if args.dump {
        for (i, shape) in solver.bounding_shapes().iter().enumerate() {
            dump_shape(i, shape);
        }
    }
    Ok(())
}

fn print_summary(solver: &Solver) {
    let shapes = solver.bounding_shapes();
    let holes = shapes.iter().filter(|s| s.is_hole()).count();
    let walkable: f32 = shapes.iter().map(OrderedShape::signed_area).sum();
    if let Some(hm) = solver.height_map() {
        println!("grid      {}x{}", hm.size_x(), hm.size_y());
    }
    println!("polygons  {} ({} holes)", shapes.len(), holes);
    println!("area      {:.3}", walkable);
    if let Some(stats) = solver.stats() {
        println!(
            "graph     nodes={} excluded={} edges={}",
            stats.nodes, stats.excluded, stats.edges
        );
        println!(
            "regions   columns={} column_shapes={} merged={}",
            stats.columns, stats.column_shapes, stats.regions
        );
        println!(
            "vertices  {} -> {}",
            stats.vertices_before, stats.vertices_after
        );
        println!("time      {} ms", stats.total_ms);
    }
}

fn dump_shape(index: usize, shape: &OrderedShape) {
    let kind = if shape.is_hole() { "hole" } else { "outer" };
    println!(
        "polygon {} {} vertices={} area={:.3}",
        index,
        kind,
        shape.len(),
        shape.area()
    );
    for v in shape.vertices() {
        println!("  {:.3} {:.3}", v.x, v.y);
    }
}
