//! SceneKit Core - Scene/Command Engine for the design surface
//!
//! # The Four Laws
//! 1. Commands Are the Only Writers
//! 2. Batches Are Atomic
//! 3. Failed Dispatch Leaves the Scene Untouched
//! 4. Agents Suggest, Engine Enforces

pub mod model;
pub mod ids;
pub mod tools;
pub mod config;
pub mod validation;
pub mod commands;
pub mod processor;
pub mod history;
pub mod hashing;
pub mod error;

pub use model::{Attributes, CanvasObject, ObjectPatch, ObjectType, Pose, PosePatch, Scene, Zone, ZoneType};
pub use tools::{create_tool_object, ToolKind, ToolPreset};
pub use config::{BoundsPolicy, EngineConfig, HistoryConfig, PlacementConfig};
pub use validation::{PlacementRule, PlacementValidator};
pub use commands::{parse_commands, Command, CommandBatch};
pub use processor::{apply_command, apply_commands, Applied, CommandProcessor};
pub use history::{Actor, HistoryStore, LogEntry, LogStatus, UndoState};
pub use hashing::{canonical_json, scene_fingerprint};
pub use error::{CommandError, EngineError, SchemaError};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install a stderr `tracing` subscriber honoring `RUST_LOG` (default `info`).
///
/// Library code only emits events; binaries call this once at startup.
pub fn init_logging() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
