// Slideshow optimizer entry point.
//
// Builds a `RunConfig` in three layers: engine defaults, then an optional
// JSON config file (`--config`), then individual flags. Logging goes to
// stderr through tracing-subscriber (filter from RUST_LOG, default `info`);
// the per-dataset summary and total score go to stdout. Any error, including
// an integrity violation in a single dataset, exits with status 1.
//
// Usage:
//   slideshow --data-dir datasets --out-dir out --seed 7
//   slideshow --config run.json --datasets "a_example.txt c_memorable_moments.txt"

use clap::{Parser, ValueEnum};
use slideshow_cli::FileStore;
use slideshow_engine::{PairingStrategy, RunConfig, RunSummary};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Pairing {
    /// Pair each vertical photo with the best partner in a bounded window
    Windowed,
    /// Pair the fewest-tag photo with the most-tag photo
    FoldExtremes,
    /// Every vertical photo gets a slide of its own
    Singletons,
}

impl From<Pairing> for PairingStrategy {
    fn from(p: Pairing) -> Self {
        match p {
            Pairing::Windowed => PairingStrategy::Windowed,
            Pairing::FoldExtremes => PairingStrategy::FoldExtremes,
            Pairing::Singletons => PairingStrategy::Singletons,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "slideshow")]
#[command(about = "Build high-scoring slideshows from tagged photo datasets")]
#[command(version)]
struct Cli {
    /// JSON run configuration; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the dataset files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Dataset file names inside the data directory, space separated
    #[arg(long, num_args = 1..)]
    datasets: Option<Vec<String>>,

    /// Directory that receives result files
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Run seed; each dataset draws from its own stream of it
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads (0 = one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Candidates scanned when pairing vertical photos
    #[arg(long)]
    pairing_window: Option<usize>,

    /// Vertical pairing strategy
    #[arg(long, value_enum)]
    pairing: Option<Pairing>,

    /// Shuffle the initial slide order before optimizing
    #[arg(long)]
    shuffle: bool,

    /// Slides per re-routing window
    #[arg(long)]
    reroute_window: Option<usize>,

    /// Re-routing attempts per dataset
    #[arg(long)]
    reroute_iterations: Option<usize>,

    /// Relocation attempts per dataset
    #[arg(long)]
    relocate_iterations: Option<usize>,
}

impl Cli {
    fn into_config(self) -> Result<RunConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .map_err(|e| format!("cannot read config {}: {e}", path.display()))?;
                RunConfig::from_json(&json)?
            }
            None => RunConfig::default(),
        };

        if let Some(v) = self.data_dir {
            config.data_dir = v;
        }
        if let Some(v) = self.datasets {
            config.datasets = v
                .iter()
                .flat_map(|list| list.split_whitespace())
                .map(str::to_string)
                .collect();
        }
        if let Some(v) = self.out_dir {
            config.out_dir = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }
        if let Some(v) = self.threads {
            config.threads = v;
        }
        let search = &mut config.search;
        if let Some(v) = self.pairing_window {
            search.pairing_window = v;
        }
        if let Some(v) = self.pairing {
            search.pairing = v.into();
        }
        if self.shuffle {
            search.shuffle_initial = true;
        }
        if let Some(v) = self.reroute_window {
            search.reroute_window = v;
        }
        if let Some(v) = self.reroute_iterations {
            search.reroute_iterations = v;
        }
        if let Some(v) = self.relocate_iterations {
            search.relocate_iterations = v;
        }
        Ok(config)
    }
}

fn print_summary(summary: &RunSummary) {
    for report in &summary.datasets {
        println!(
            "{}: {} photos, {} slides, score {} (initial {}, after re-route {}) -> {}",
            report.dataset,
            report.photos,
            report.slides,
            report.final_score,
            report.initial_score,
            report.rerouted_score,
            report.output.display()
        );
    }
    println!("Total score: {}", summary.total_score);
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    let store = FileStore::new(&config.data_dir, &config.out_dir);
    tracing::info!(
        data_dir = %store.data_dir().display(),
        out_dir = %store.out_dir().display(),
        "dataset store ready"
    );

    match slideshow_engine::run(&config, &store) {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            ExitCode::FAILURE
        }
    }
}
