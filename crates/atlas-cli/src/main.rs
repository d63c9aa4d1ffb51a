use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use atlas_core::{
    MapConfig, Quadtree, build_grid_artifact, build_records, select_topic_levels, world_domain,
};
use atlas_store::{OutputNames, load_config, read_points, save_outputs, to_toml};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "atlas", about = "Build density grids and topic tiles for 2D point maps")]
struct Cli {
    /// TOML config file; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build data.ndjson and grid.json from an NDJSON point file
    Build {
        /// Input points, one JSON object per line
        #[arg(long)]
        input: PathBuf,

        /// Directory for the output files
        #[arg(long)]
        output_dir: PathBuf,

        /// Names for group indices 0, 1, ..; enables per-group grids
        #[arg(long, value_delimiter = ',')]
        group_names: Option<Vec<String>>,

        #[arg(long)]
        grid_size: Option<usize>,

        #[arg(long)]
        max_zoom_scale: Option<f64>,

        #[arg(long)]
        embedding_name: Option<String>,
    },

    /// Print the topic levels a build would materialize
    Levels {
        #[arg(long)]
        input: PathBuf,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn base_config(cli: &Cli) -> Result<MapConfig> {
    match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(MapConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Build {
            input,
            output_dir,
            group_names,
            grid_size,
            max_zoom_scale,
            embedding_name,
        } => {
            let mut config = base_config(&cli)?;
            if let Some(v) = grid_size {
                config.grid_size = *v;
            }
            if let Some(v) = max_zoom_scale {
                config.max_zoom_scale = *v;
            }
            if let Some(v) = embedding_name {
                config.embedding_name = v.clone();
            }
            cmd_build(&config, input, output_dir, group_names.as_deref())
        }
        Commands::Levels { input } => cmd_levels(&base_config(&cli)?, input),
        Commands::Config => cmd_config(&base_config(&cli)?),
    }
}

fn cmd_build(
    config: &MapConfig,
    input: &Path,
    output_dir: &Path,
    group_names: Option<&[String]>,
) -> Result<()> {
    let table =
        read_points(input).with_context(|| format!("failed to read {}", input.display()))?;

    let artifact =
        build_grid_artifact(&table, group_names, config).context("failed to build grid")?;
    let records = build_records(&table).context("failed to build point records")?;

    let (data, grid) = save_outputs(output_dir, &records, &artifact, &OutputNames::default())
        .with_context(|| format!("failed to write outputs to {}", output_dir.display()))?;

    let levels: Vec<String> = artifact.topic.data.keys().map(u32::to_string).collect();
    println!("points:  {}", table.len());
    println!("levels:  {}", levels.join(","));
    println!("tiles:   {}", artifact.tile_count());
    println!("data:    {}", data.display());
    println!("grid:    {}", grid.display());
    Ok(())
}

fn cmd_levels(config: &MapConfig, input: &Path) -> Result<()> {
    config.validate().context("invalid config")?;
    let table =
        read_points(input).with_context(|| format!("failed to read {}", input.display()))?;

    let tree = Quadtree::from_coords(&table.xs, &table.ys, &config.quadtree())
        .context("failed to build quadtree")?;
    let world = world_domain(&table.xs, &table.ys).context("no points")?;
    let range = select_topic_levels(&config.viewport(), world, tree.extent());

    println!("minLevel: {}", range.min);
    println!("maxLevel: {}", range.max);
    println!("height:   {}", tree.height());
    Ok(())
}

fn cmd_config(config: &MapConfig) -> Result<()> {
    print!("{}", to_toml(config).context("failed to render config")?);
    Ok(())
}
