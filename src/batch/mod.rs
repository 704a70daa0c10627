//! Batch orchestration: match every site, write footprints, record the manifest
//!
//! Each site ends in exactly one [`ManifestStatus`]. Failures are confined to
//! their own row, so a bad record or setting never stops the batch; only a
//! manifest that cannot be written fails the whole run.

pub mod config;
pub mod manifest;

use std::collections::HashMap;
use std::path::PathBuf;

use log::{info, warn};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::footprint::{build_circle, FootprintSink, KmlWriter, Metadata};
use crate::matcher::find_nearest;
use crate::types::{CandidateTower, MatchResult, Site};

pub use config::BatchConfig;
pub use manifest::{Manifest, ManifestRow, ManifestStatus};

/// Summary of a finished batch
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub manifest: Manifest,
    /// Footprint files written
    pub generated: usize,
    /// Sites processed
    pub total: usize,
    pub output_dir: PathBuf,
    pub manifest_path: PathBuf,
}

impl BatchReport {
    /// One-line human readable summary
    pub fn summary(&self) -> String {
        format!(
            "{}/{} footprints generated ({} without tower, {} errors)",
            self.generated,
            self.total,
            self.manifest.unmatched_count(),
            self.manifest.error_count()
        )
    }
}

/// Runs the match → circle → write pipeline over a batch of sites
pub struct BatchProcessor<S = KmlWriter> {
    config: BatchConfig,
    sink: S,
}

impl BatchProcessor<KmlWriter> {
    /// Creates a processor writing KML files with the default style
    pub fn new(config: BatchConfig) -> Self {
        Self::with_sink(config, KmlWriter::new())
    }
}

impl<S: FootprintSink> BatchProcessor<S> {
    /// Creates a processor writing through a custom sink
    pub fn with_sink(config: BatchConfig, sink: S) -> Self {
        Self { config, sink }
    }

    /// Returns the active configuration
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Returns the footprint sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Processes every site, writes the manifest and reports the outcome
    pub fn run(&self, sites: &[Site], candidates: &[CandidateTower]) -> Result<BatchReport> {
        info!(
            "Processing {} sites against {} candidate towers (max {} m, radius {} m)",
            sites.len(),
            candidates.len(),
            self.config.max_distance_meters,
            self.config.radius_meters
        );

        let manifest = Manifest::new(self.process_all(sites, candidates)?);
        manifest.write(&self.config.manifest_path)?;

        let report = BatchReport {
            generated: manifest.success_count(),
            total: sites.len(),
            manifest,
            output_dir: self.config.output_dir.clone(),
            manifest_path: self.config.manifest_path.clone(),
        };

        info!("Done: {}", report.summary());
        info!("Footprints: {}", report.output_dir.display());
        info!("Manifest: {}", report.manifest_path.display());

        Ok(report)
    }

    /// Processes every site and returns the manifest rows in input order
    ///
    /// Sites are spread over the worker pool. Sites whose labels map to the
    /// same output file are handled afterwards, one by one in input order,
    /// so the last of them deterministically owns the file.
    ///
    /// Settings are not validated here: an unusable radius or point count
    /// turns every matched site into a [`ManifestStatus::GenerationError`].
    pub fn process_all(
        &self,
        sites: &[Site],
        candidates: &[CandidateTower],
    ) -> Result<Vec<ManifestRow>> {
        let labels: Vec<String> = sites
            .iter()
            .map(|site| site.output_label(self.config.label_prefix_len))
            .collect();

        let (shared, exclusive) = self.partition_by_output(&labels);

        for &i in &shared {
            warn!(
                "Site {} shares output file {} with another site",
                sites[i].id,
                self.footprint_path(&labels[i]).display()
            );
        }

        let mut rows: Vec<Option<ManifestRow>> = vec![None; sites.len()];

        let parallel: Vec<(usize, ManifestRow)> = self.in_pool(|| {
            exclusive
                .par_iter()
                .map(|&i| (i, self.process_labeled(&sites[i], labels[i].clone(), candidates)))
                .collect()
        })?;

        for (i, row) in parallel {
            rows[i] = Some(row);
        }

        for i in shared {
            rows[i] = Some(self.process_labeled(&sites[i], labels[i].clone(), candidates));
        }

        let rows: Vec<ManifestRow> = rows.into_iter().flatten().collect();
        debug_assert_eq!(rows.len(), sites.len());
        Ok(rows)
    }

    /// Processes a single site into its manifest row
    pub fn process_site(&self, site: &Site, candidates: &[CandidateTower]) -> ManifestRow {
        let label = site.output_label(self.config.label_prefix_len);
        self.process_labeled(site, label, candidates)
    }

    /// Path of the footprint file for `label`
    pub fn footprint_path(&self, label: &str) -> PathBuf {
        self.config
            .output_dir
            .join(format!("{}.{}", sanitize_file_stem(label), self.sink.extension()))
    }

    /// Splits label indices into those sharing an output file and the rest
    ///
    /// File names are compared case-insensitively, since `SPCAS.kml` and
    /// `spcas.kml` are the same file on Windows and macOS.
    fn partition_by_output(&self, labels: &[String]) -> (Vec<usize>, Vec<usize>) {
        let keys: Vec<String> = labels
            .iter()
            .map(|label| self.footprint_path(label).to_string_lossy().to_lowercase())
            .collect();

        let mut uses: HashMap<&str, usize> = HashMap::new();
        for key in &keys {
            *uses.entry(key.as_str()).or_insert(0) += 1;
        }

        (0..labels.len()).partition(|&i| uses[keys[i].as_str()] > 1)
    }

    fn process_labeled(
        &self,
        site: &Site,
        label: String,
        candidates: &[CandidateTower],
    ) -> ManifestRow {
        let status = match self.generate(site, &label, candidates) {
            Ok(Some(path)) => {
                info!("[{}] footprint written: {}", site.id, path.display());
                ManifestStatus::Success
            }
            Ok(None) => {
                info!(
                    "[{}] no collocation tower within {} m",
                    site.id, self.config.max_distance_meters
                );
                ManifestStatus::NoCandidateFound
            }
            Err(e) => {
                warn!("[{}] failed to generate {}: {}", site.id, label, e);
                ManifestStatus::GenerationError(e.to_string())
            }
        };

        ManifestRow {
            site_id: site.id.clone(),
            label,
            status,
        }
    }

    fn generate(
        &self,
        site: &Site,
        label: &str,
        candidates: &[CandidateTower],
    ) -> Result<Option<PathBuf>> {
        let (tower, distance) =
            match find_nearest(site.coordinate, candidates, self.config.max_distance_meters)? {
                MatchResult::NoMatch => return Ok(None),
                MatchResult::Matched { tower, distance_meters, .. } => (tower, distance_meters),
            };

        // Footprints are centred on the tower, not the site
        let footprint = build_circle(
            tower.coordinate,
            self.config.radius_meters,
            self.config.point_count,
        )?;

        let mut metadata = Metadata::new();
        metadata.insert("Site", label);
        metadata.insert("Proprietário", tower.owner.as_str());
        metadata.insert("ID Detentora", tower.holder_id.as_str());
        metadata.insert("Raio", format!("{}m", self.config.radius_meters));
        metadata.insert(
            "Centro",
            format!("{:.6}, {:.6}", tower.coordinate.latitude, tower.coordinate.longitude),
        );
        metadata.insert("Distância ao site", format!("{:.0}m", distance));

        let path = self.footprint_path(label);
        self.sink.write_footprint(&path, &footprint, label, &metadata)?;

        info!("[{}] matched {} ({}) at {:.0} m", site.id, tower.owner, tower.holder_id, distance);

        Ok(Some(path))
    }

    fn in_pool<T, F>(&self, job: F) -> Result<T>
    where
        T: Send,
        F: FnOnce() -> T + Send,
    {
        match self.config.workers {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| Error::Config(format!("Failed to build worker pool: {}", e)))?;
                Ok(pool.install(job))
            }
            None => Ok(job()),
        }
    }
}

/// Replaces characters that cannot appear in a file name
pub fn sanitize_file_stem(label: &str) -> String {
    let stem: String = label
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        stem
    }
}
