use clap::Parser;
use rasterfind::io::load_rgb_raster;
use rasterfind::{
    AreaResampler, BicubicResampler, Finder, FinderConfig, LevelReport, Match, Raster,
    RasterFindResult, Resampler, SearchReport,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "RasterFind CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for per-level search statistics.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ResamplerConfig {
    #[default]
    Bicubic,
    Area,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct FinderConfigJson {
    max_source_width: usize,
    max_source_height: usize,
    max_target_width: usize,
    max_target_height: usize,
    parallel: bool,
}

impl Default for FinderConfigJson {
    fn default() -> Self {
        let cfg = FinderConfig::default();
        Self {
            max_source_width: cfg.max_source_width,
            max_source_height: cfg.max_source_height,
            max_target_width: cfg.max_target_width,
            max_target_height: cfg.max_target_height,
            parallel: cfg.parallel,
        }
    }
}

impl From<FinderConfigJson> for FinderConfig {
    fn from(value: FinderConfigJson) -> Self {
        Self {
            max_source_width: value.max_source_width,
            max_source_height: value.max_source_height,
            max_target_width: value.max_target_width,
            max_target_height: value.max_target_height,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    source_path: String,
    target_path: String,
    output_path: Option<String>,
    threshold: f32,
    resampler: ResamplerConfig,
    finder: FinderConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_path: String::new(),
            target_path: String::new(),
            output_path: None,
            threshold: 0.95,
            resampler: ResamplerConfig::default(),
            finder: FinderConfigJson::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    similarity: f32,
}

impl From<&Match> for MatchRecord {
    fn from(value: &Match) -> Self {
        Self {
            x: value.zone.x,
            y: value.zone.y,
            width: value.zone.width,
            height: value.zone.height,
            similarity: value.similarity,
        }
    }
}

#[derive(Debug, Serialize)]
struct LevelRecord {
    scale_divider: usize,
    source_size: [usize; 2],
    window_size: [usize; 2],
    regions: usize,
    raw_hits: usize,
    kept: usize,
}

impl From<&LevelReport> for LevelRecord {
    fn from(value: &LevelReport) -> Self {
        Self {
            scale_divider: value.scale_divider,
            source_size: [value.source_size.0, value.source_size.1],
            window_size: [value.window_size.0, value.window_size.1],
            regions: value.regions,
            raw_hits: value.raw_hits,
            kept: value.kept,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    matches: Vec<MatchRecord>,
    levels: Vec<LevelRecord>,
}

fn run_finder<R: Resampler>(
    resampler: R,
    config: FinderConfig,
    source: Raster,
    target: &Raster,
    threshold: f32,
) -> RasterFindResult<(Vec<Match>, SearchReport)> {
    let mut finder = Finder::with_resampler(resampler).with_config(config);
    finder.set_source(source)?;
    let matches = finder.find(target.view(), threshold)?;
    Ok((matches, finder.last_report().clone()))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("rasterfind=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.source_path.is_empty() || config.target_path.is_empty() {
        return Err("source_path and target_path must be set in the config".into());
    }
    if !(0.0..=1.0).contains(&config.threshold) {
        return Err("threshold must be within [0, 1]".into());
    }

    let source = load_rgb_raster(&config.source_path)?;
    let target = load_rgb_raster(&config.target_path)?;
    let finder_cfg = FinderConfig::from(config.finder);

    let (matches, report) = match config.resampler {
        ResamplerConfig::Bicubic => run_finder(
            BicubicResampler,
            finder_cfg,
            source,
            &target,
            config.threshold,
        )?,
        ResamplerConfig::Area => {
            run_finder(AreaResampler, finder_cfg, source, &target, config.threshold)?
        }
    };
    tracing::info!(
        matches = matches.len(),
        levels = report.levels().len(),
        "search finished"
    );

    let output = Output {
        matches: matches.iter().map(MatchRecord::from).collect(),
        levels: report.levels().iter().map(LevelRecord::from).collect(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
