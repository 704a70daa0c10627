use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use colo_footprints::{tables, BatchConfig, BatchProcessor, Result};

/// Match sites to nearby collocation towers and write KML footprints
#[derive(Parser, Debug)]
#[command(name = "colo-footprints", version)]
struct Args {
    /// Site table (CSV: ID MASTER, Sigla Sugerida, Latitude, Longitude)
    #[arg(long)]
    sites: PathBuf,

    /// Candidate tower table (CSV: Latitude, Longitude, Proprietário, ID Detentora)
    #[arg(long)]
    candidates: PathBuf,

    /// JSON configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum site-to-tower distance in meters
    #[arg(long)]
    max_distance: Option<f64>,

    /// Footprint radius in meters
    #[arg(long)]
    radius: Option<f64>,

    /// Boundary points per footprint
    #[arg(long)]
    points: Option<usize>,

    /// Directory for generated KML files
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Manifest CSV path
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Worker threads (1 = sequential)
    #[arg(long)]
    workers: Option<usize>,

    /// EPSG code of the input coordinates
    #[arg(long)]
    source_epsg: Option<u16>,
}

impl Args {
    fn into_config(self) -> Result<(BatchConfig, PathBuf, PathBuf)> {
        let mut config = match &self.config {
            Some(path) => BatchConfig::from_json_file(path)?,
            None => BatchConfig::default(),
        };

        if let Some(value) = self.max_distance {
            config.max_distance_meters = value;
        }
        if let Some(value) = self.radius {
            config.radius_meters = value;
        }
        if let Some(value) = self.points {
            config.point_count = value;
        }
        if let Some(value) = self.output_dir {
            config.output_dir = value;
        }
        if let Some(value) = self.manifest {
            config.manifest_path = value;
        }
        if self.workers.is_some() {
            config.workers = self.workers;
        }
        if let Some(value) = self.source_epsg {
            config.source_epsg = value;
        }

        config.validate()?;
        Ok((config, self.sites, self.candidates))
    }
}

fn run(args: Args) -> Result<()> {
    let (config, sites_path, candidates_path) = args.into_config()?;

    let mut sites = tables::read_sites_path(&sites_path)?;
    let mut candidates = tables::read_candidates_path(&candidates_path)?;
    tables::normalize_to_wgs84(config.source_epsg, &mut sites, &mut candidates)?;

    let report = BatchProcessor::new(config).run(&sites, &candidates)?;
    println!("{}", report.summary());

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
