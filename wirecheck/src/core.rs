//! Engine facade shared by the CLI and embedding applications.
//! Holds configured engines; all per-diagram state comes in with each call.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::EngineConfig;
use crate::drc::{DrcEngine, DrcReport, DrcStats};
use crate::geometry::Point;
use crate::matcher::{AutoWireMatcher, WiringSuggestion};
use crate::model::DiagramSnapshot;
use crate::routing::render::build_wire_path;
use crate::routing::{OrthogonalRouter, RoutedWire};

#[derive(Debug, thiserror::Error)]
pub enum WireCheckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// DRC outcome for one snapshot file
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub file: PathBuf,
    pub report: DrcReport,
    pub stats: DrcStats,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.stats.errors > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.stats.warnings > 0
    }

    pub fn total_issues(&self) -> usize {
        self.stats.errors + self.stats.warnings
    }
}

/// A routed wire with its drawable SVG path
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedWire {
    pub connection_id: String,
    pub points: Vec<Point>,
    pub path_data: String,
}

/// Recursively find snapshot (`.json`) files, sorted by path.
pub fn discover_snapshots(dir: &Path) -> Result<Vec<PathBuf>, WireCheckError> {
    let mut files = Vec::new();
    walk_dir(dir, &mut files, 0)?;
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>, depth: usize) -> Result<(), WireCheckError> {
    if depth > 20 {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name.starts_with('.') || name == "node_modules" || name == "target" {
                continue;
            }
            walk_dir(&path, files, depth + 1)?;
        } else if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
            files.push(path);
        }
    }
    Ok(())
}

/// Configured engines behind one API
#[derive(Clone, Default)]
pub struct WireCheckCore {
    config: EngineConfig,
    drc: DrcEngine,
    router: OrthogonalRouter,
    matcher: AutoWireMatcher,
}

impl WireCheckCore {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            drc: DrcEngine::with_config(&config.drc),
            router: OrthogonalRouter::new(config.router.clone()),
            matcher: AutoWireMatcher::new(config.matcher.clone()),
            config,
        }
    }

    pub fn from_config_file(path: &Path) -> Result<Self, WireCheckError> {
        Ok(Self::new(EngineConfig::from_json_file(path)?))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn drc(&self) -> &DrcEngine {
        &self.drc
    }

    pub fn validate(&self, snapshot: &DiagramSnapshot) -> DrcReport {
        let report = self
            .drc
            .run(&snapshot.connections, &snapshot.instance_set(), &snapshot.library());
        tracing::info!(
            "DRC: {} connections checked, {} errors, {} warnings",
            report.connections_checked,
            report.errors.len(),
            report.warnings.len()
        );
        report
    }

    pub fn route(&self, snapshot: &DiagramSnapshot) -> Vec<RoutedWire> {
        self.router
            .route_all(&snapshot.connections, &snapshot.instance_set(), &snapshot.library())
    }

    /// Route every wire, then round its corners and hop it over the others
    pub fn render(&self, snapshot: &DiagramSnapshot) -> Vec<RenderedWire> {
        let routed = self.route(snapshot);
        routed
            .iter()
            .enumerate()
            .map(|(index, wire)| {
                let others: Vec<Vec<Point>> = routed
                    .iter()
                    .enumerate()
                    .filter(|(other, _)| *other != index)
                    .map(|(_, w)| w.points.clone())
                    .collect();
                let path = build_wire_path(&wire.points, &others, &self.config.render);
                RenderedWire {
                    connection_id: wire.connection_id.clone(),
                    points: wire.points.clone(),
                    path_data: path.to_svg_path_data(),
                }
            })
            .collect()
    }

    pub fn suggest(&self, snapshot: &DiagramSnapshot, new_instance_id: &str) -> Vec<WiringSuggestion> {
        self.matcher.suggest(
            new_instance_id,
            &snapshot.instance_set(),
            &snapshot.library(),
            &snapshot.connections,
        )
    }

    /// Load a snapshot file and run DRC over it.
    pub fn check_snapshot(&self, path: &Path) -> Result<ValidationResult, WireCheckError> {
        let snapshot = DiagramSnapshot::from_json_file(path)?;
        let report = self.validate(&snapshot);
        let stats = report.stats();
        Ok(ValidationResult {
            file: path.to_path_buf(),
            report,
            stats,
        })
    }

    /// Check every snapshot under a directory. Stops at the first file that
    /// fails to load.
    pub fn check_project(&self, dir: &Path) -> Result<Vec<ValidationResult>, WireCheckError> {
        let files = discover_snapshots(dir)?;
        tracing::debug!("Found {} snapshot files in {:?}", files.len(), dir);
        files.iter().map(|path| self.check_snapshot(path)).collect()
    }
}
