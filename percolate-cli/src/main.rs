use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;

use percolate::{BondPattern, Clustering, LatticeClusterer, PercolationConfig};

mod render_png;

/// Bond percolation cluster renderer
#[derive(Parser)]
#[command(name = "percolate", version)]
struct Cli {
    /// TOML file providing side, probability and seed defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Suppress progress output on stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one PNG per bond probability, a random color per cluster
    Render {
        /// Lattice side length
        #[arg(long)]
        side: Option<usize>,
        /// Bond probabilities (e.g. "0.5" or "0.3,0.5,0.7")
        #[arg(short, long, value_delimiter = ',')]
        p: Vec<f64>,
        /// Base seed; pass i uses seed + i
        #[arg(long)]
        seed: Option<u64>,
        /// Pixels per site
        #[arg(long, default_value_t = 2)]
        scale: usize,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Cluster once and print a JSON summary
    Summary {
        /// Lattice side length
        #[arg(long)]
        side: Option<usize>,
        /// Bond probability
        #[arg(short, long)]
        p: Option<f64>,
        /// Seed for the bond stream
        #[arg(long)]
        seed: Option<u64>,
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Serialize)]
struct Summary {
    side: usize,
    probability: f64,
    seed: u64,
    sites: usize,
    num_clusters: u32,
    elapsed_us: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let base = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Render {
            side,
            p,
            seed,
            scale,
            output,
        } => {
            let config = PercolationConfig {
                side: side.unwrap_or(base.side),
                seed: seed.or(base.seed),
                ..base
            };
            let probabilities = if p.is_empty() {
                vec![config.probability]
            } else {
                p
            };
            cmd_render(&config, &probabilities, scale, &output, cli.quiet)
        }
        Command::Summary {
            side,
            p,
            seed,
            pretty,
        } => {
            let config = PercolationConfig {
                side: side.unwrap_or(base.side),
                probability: p.unwrap_or(base.probability),
                seed: seed.or(base.seed),
            };
            cmd_summary(&config, pretty, cli.quiet)
        }
    }
}

/// Load the config file if one was given, otherwise use defaults.
fn load_config(path: Option<&Path>) -> Result<PercolationConfig> {
    let Some(path) = path else {
        return Ok(PercolationConfig::default());
    };
    let toml_str =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    PercolationConfig::from_toml(&toml_str)
        .with_context(|| format!("parsing config from {}", path.display()))
}

/// Run one clustering pass, sampling bonds row-parallel ahead of the union pass.
fn run_pass(side: usize, p: f64, seed: u64) -> Result<(Clustering, u64)> {
    let clusterer = LatticeClusterer::new(side)?;
    let start = Instant::now();
    let mut bonds = BondPattern::sample_parallel(clusterer.lattice(), p, seed)?;
    let clustering = clusterer.cluster(&mut bonds)?;
    Ok((clustering, start.elapsed().as_micros() as u64))
}

/// One output path per probability, named with `p` at full precision.
///
/// Fails if two passes would write the same file.
fn output_paths(output: &Path, probabilities: &[f64]) -> Result<Vec<PathBuf>> {
    let paths: Vec<PathBuf> = probabilities
        .iter()
        .map(|p| output.join(format!("percolation_p{p}.png")))
        .collect();
    let mut seen = HashSet::new();
    for path in &paths {
        anyhow::ensure!(
            seen.insert(path),
            "probabilities map to the same output file {}",
            path.display()
        );
    }
    Ok(paths)
}

fn cmd_render(
    config: &PercolationConfig,
    probabilities: &[f64],
    scale: usize,
    output: &Path,
    quiet: bool,
) -> Result<()> {
    anyhow::ensure!(scale > 0, "--scale must be at least 1");
    config.validate()?;
    let paths = output_paths(output, probabilities)?;
    let base_seed = config.seed.unwrap_or_else(rand::random);
    std::fs::create_dir_all(output).with_context(|| format!("creating {}", output.display()))?;

    if !quiet {
        eprintln!(
            "clustering {}x{} at {} probabilities (seed {base_seed})",
            config.side,
            config.side,
            probabilities.len()
        );
    }

    // Passes are independent; each owns its own union-find and bond stream.
    probabilities
        .par_iter()
        .zip(&paths)
        .enumerate()
        .try_for_each(|(i, (&p, path))| -> Result<()> {
            let seed = base_seed.wrapping_add(i as u64);
            let (clustering, elapsed_us) = run_pass(config.side, p, seed)
                .with_context(|| format!("clustering at p={p}"))?;

            render_png::write_clustering_png(&clustering, seed, scale, path)?;

            if !quiet {
                eprintln!(
                    "  p={p}: {} clusters in {} ms -> {}",
                    clustering.num_clusters(),
                    elapsed_us / 1000,
                    path.display()
                );
            }
            Ok(())
        })
}

fn cmd_summary(config: &PercolationConfig, pretty: bool, quiet: bool) -> Result<()> {
    config.validate()?;
    let seed = config.seed.unwrap_or_else(rand::random);

    if !quiet {
        eprintln!(
            "clustering {}x{} at p={:.2} (seed {seed})",
            config.side, config.side, config.probability
        );
    }

    let (clustering, elapsed_us) = run_pass(config.side, config.probability, seed)?;

    let summary = Summary {
        side: config.side,
        probability: config.probability,
        seed,
        sites: clustering.labels().len(),
        num_clusters: clustering.num_clusters(),
        elapsed_us,
    };

    let json = if pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{json}");

    Ok(())
}
