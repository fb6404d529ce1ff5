//! WireCheck - connectivity engine for device wiring diagrams
//!
//! Given devices placed on a canvas and the wires between their ports, this
//! library answers three questions:
//!
//! - may these two ports be wired together? ([`drc`])
//! - what path should a wire take around other devices? ([`routing`])
//! - which wires should be proposed for a freshly placed device? ([`matcher`])
//!
//! # Quick Start
//!
//! ```no_run
//! use wirecheck::{DiagramSnapshot, WireCheckCore};
//! use std::path::Path;
//!
//! let core = WireCheckCore::default();
//! let result = core.check_snapshot(Path::new("page.json")).unwrap();
//!
//! for issue in result.report.issues() {
//!     println!("{:?}: {}", issue.severity, issue.message);
//! }
//!
//! let snapshot = DiagramSnapshot::from_json_file(Path::new("page.json")).unwrap();
//! for wire in core.route(&snapshot) {
//!     println!("{}: {:?}", wire.connection_id, wire.elbows());
//! }
//! ```
//!
//! All engines are pure functions over borrowed data: nothing is cached
//! between calls and malformed references are skipped, never raised.

pub mod config;
pub mod connector;
pub mod core;
pub mod drc;
pub mod geometry;
pub mod matcher;
pub mod model;
pub mod routing;

// Re-export main types
pub use crate::core::{
    discover_snapshots, RenderedWire, ValidationResult, WireCheckCore, WireCheckError,
};
pub use config::EngineConfig;
pub use connector::ConnectorType;
pub use drc::{
    check_connection_validity, run_drc, validate_port_compatibility, DrcEngine, DrcIssue,
    DrcReport, IssueKind, Severity,
};
pub use geometry::{instance_rect, port_normal, port_position, Point, Rect, Vector};
pub use matcher::{suggest_connections, suggest_power_connections, WiringSuggestion};
pub use model::{
    Connection, DeviceInstance, DeviceTemplate, DiagramSnapshot, FlowType, InstanceSet, Port,
    TemplateLibrary, WireShape,
};
pub use routing::{find_smart_path, OrthogonalRouter, RoutedWire};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        DiagramSnapshot, DrcReport, EngineConfig, IssueKind, Point, Severity, Vector,
        WireCheckCore, WireCheckError, WiringSuggestion,
    };
}
