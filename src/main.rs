use std::path::PathBuf;

use clap::Parser;
use log::{error, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use terrain_tiles::ascii::{self, AsciiMode};
use terrain_tiles::config::MapConfig;
use terrain_tiles::export;
use terrain_tiles::logging;
use terrain_tiles::params::ParameterUpdate;
use terrain_tiles::render::{resource_fill_commands, tile_fill_commands};
use terrain_tiles::session::MapSession;
use terrain_tiles::Result;

#[derive(Parser, Debug)]
#[command(name = "terrain_tiles")]
#[command(about = "Generate seeded tile terrain maps and spread resource sites over them")]
struct Args {
    /// JSON config file (defaults are used for missing fields)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed (overrides config)
    #[arg(short, long)]
    seed: Option<u32>,

    /// Noise scale in tiles
    #[arg(long)]
    scale: Option<f64>,

    /// Number of noise octaves
    #[arg(long)]
    octaves: Option<u32>,

    /// Amplitude decay per octave
    #[arg(long)]
    persistence: Option<f64>,

    /// Frequency growth per octave
    #[arg(long)]
    lacunarity: Option<f64>,

    /// Horizontal sampling offset, in map widths
    #[arg(long)]
    offset_x: Option<f64>,

    /// Vertical sampling offset, in map heights
    #[arg(long)]
    offset_y: Option<f64>,

    /// Slider-style update, e.g. --set Octaves=0.5 (repeatable)
    #[arg(long = "set", value_name = "NAME=PROGRESS")]
    updates: Vec<String>,

    /// Print only every Nth tile in the terminal preview
    #[arg(long, default_value = "4")]
    preview_step: usize,

    /// Preview heights instead of terrain
    #[arg(long)]
    height_view: bool,

    /// Colorize the preview with ANSI true color
    #[arg(long)]
    color: bool,

    /// Skip the terminal preview
    #[arg(long)]
    no_preview: bool,

    /// Place resource sites with the best-candidate sampler
    #[arg(long)]
    resources: bool,

    /// Number of resource sites (overrides config)
    #[arg(long)]
    resource_count: Option<usize>,

    /// Seed for resource placement (random if not specified)
    #[arg(long)]
    resource_seed: Option<u64>,

    /// Export the rendered tile map (and resource markers) to PNG
    #[arg(long)]
    export_png: Option<PathBuf>,

    /// Export the heightfield as a grayscale PNG
    #[arg(long)]
    export_heightmap: Option<PathBuf>,

    /// Export the flat JSON snapshot
    #[arg(long)]
    export_json: Option<PathBuf>,

    /// Export an annotated text dump of the map
    #[arg(long)]
    export_text: Option<PathBuf>,

    /// Write the effective configuration as JSON
    #[arg(long)]
    save_config: Option<PathBuf>,
}

fn main() {
    logging::init();
    let args = Args::parse();

    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = build_config(&args)?;
    let updates = args
        .updates
        .iter()
        .map(|s| s.parse::<ParameterUpdate>())
        .collect::<Result<Vec<_>>>()?;

    if let Some(path) = &args.save_config {
        config.save(path)?;
        info!("Saved config to {}", path.display());
    }

    info!(
        "Generating {}x{} tiles with seed {}",
        config.layout.columns(),
        config.layout.rows(),
        config.seed
    );

    let mut session = MapSession::new(config)?;
    if updates.is_empty() {
        session.regenerate()?;
    } else {
        session.apply_updates(&updates)?;
    }

    let sites = if args.resources {
        let seed = args.resource_seed.unwrap_or_else(rand::random);
        info!("Placing {} resource sites (seed {})", session.config().resources.count, seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        session.place_resources(&mut rng)?
    } else {
        Vec::new()
    };

    let config = session.config();
    let Some(map) = session.current() else {
        return Ok(());
    };

    if map.heightfield.is_degenerate() {
        info!("Heightfield is flat; every tile uses the fallback height");
    }

    if !args.no_preview {
        let mode = if args.height_view { AsciiMode::Height } else { AsciiMode::Terrain };
        let preview = if args.color {
            ascii::render_colored_ascii_map(&map.heightfield, &map.tiles, mode, args.preview_step)
        } else {
            ascii::render_ascii_map(&map.heightfield, &map.tiles, mode, args.preview_step)
        };
        print!("{}", preview);
        println!();
        print!("{}", ascii::terrain_legend(&config.thresholds));
        print!("{}", ascii::terrain_stats(&map.tiles));
    }

    for site in &sites {
        match site.terrain {
            Some(terrain) => println!(
                "resource ({:8.1}, {:8.1}) on {}",
                site.position.x,
                site.position.y,
                terrain.display_name()
            ),
            None => println!("resource ({:8.1}, {:8.1})", site.position.x, site.position.y),
        }
    }

    if let Some(path) = &args.export_png {
        let mut commands = tile_fill_commands(&map.tiles, &config.layout);
        commands.extend(resource_fill_commands(&sites, &config.layout, &config.resources));
        export::export_commands_png(&commands, &config.layout, path)?;
    }

    if let Some(path) = &args.export_heightmap {
        export::export_heightfield_png(&map.heightfield, path)?;
    }

    if let Some(path) = &args.export_json {
        if let Some(snapshot) = session.snapshot() {
            snapshot.write_to(path)?;
            info!("Wrote snapshot to {}", path.display());
        }
    }

    if let Some(path) = &args.export_text {
        ascii::export_map_file(map, &config.thresholds, path)?;
        info!("Wrote map file to {}", path.display());
    }

    Ok(())
}

/// Config file (or defaults) with command-line overrides applied.
fn build_config(args: &Args) -> Result<MapConfig> {
    let mut config = match &args.config {
        Some(path) => MapConfig::load(path)?,
        None => MapConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(scale) = args.scale {
        config.noise.scale = scale;
    }
    if let Some(octaves) = args.octaves {
        config.noise.octaves = octaves;
    }
    if let Some(persistence) = args.persistence {
        config.noise.persistence = persistence;
    }
    if let Some(lacunarity) = args.lacunarity {
        config.noise.lacunarity = lacunarity;
    }
    if let Some(x) = args.offset_x {
        config.noise.offset.x = x;
    }
    if let Some(y) = args.offset_y {
        config.noise.offset.y = y;
    }
    if let Some(count) = args.resource_count {
        config.resources.count = count;
    }

    config.validate()?;
    Ok(config)
}
