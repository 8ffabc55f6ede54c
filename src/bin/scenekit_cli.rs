//! SceneKit CLI - JSON bridge for the scene engine
//!
//! Commands: tools, validate, apply
//! Outputs JSON to stdout, logs to stderr
//! Exit code 2 on validation/command failure, 1 on I/O or malformed input

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use scenekit_core::{
    parse_commands, scene_fingerprint, tools, Actor, EngineConfig, EngineError, HistoryStore, Scene,
};

#[derive(Parser)]
#[command(name = "scenekit-cli")]
#[command(about = "SceneKit CLI - Scene/Command Engine bridge")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to an engine config file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tool catalog
    Tools,

    /// Schema-validate a scene document
    Validate {
        /// Scene JSON file
        #[arg(short, long)]
        scene: PathBuf,
    },

    /// Dispatch commands against a scene and print the result
    Apply {
        /// Scene JSON file
        #[arg(short, long)]
        scene: PathBuf,

        /// Command JSON (object or array), or @path to read it from a file
        #[arg(long)]
        commands: String,

        /// Who issued the commands
        #[arg(long, value_enum, default_value_t = ActorArg::Human)]
        actor: ActorArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ActorArg {
    Human,
    Ai,
}

impl From<ActorArg> for Actor {
    fn from(arg: ActorArg) -> Self {
        match arg {
            ActorArg::Human => Actor::Human,
            ActorArg::Ai => Actor::Ai,
        }
    }
}

fn main() -> ExitCode {
    scenekit_core::init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match EngineConfig::load(path) {
            Ok(c) => c,
            Err(e) => return fail(&format!("Failed to load config: {}", e), ExitCode::FAILURE),
        },
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Tools => {
            let catalog: Vec<_> = tools::catalog()
                .into_iter()
                .map(|(kind, preset)| json!({
                    "toolType": kind.as_str(),
                    "asset": preset.asset,
                    "width": preset.width,
                    "height": preset.height,
                }))
                .collect();
            emit(&Value::Array(catalog));
            ExitCode::SUCCESS
        }

        Commands::Validate { scene } => match load_scene(&scene) {
            Ok(scene) => {
                let fingerprint = match scene_fingerprint(&scene) {
                    Ok(f) => f,
                    Err(e) => return fail(&format!("Failed to fingerprint scene: {}", e), ExitCode::FAILURE),
                };
                emit(&json!({
                    "valid": true,
                    "objects": scene.objects.len(),
                    "zones": scene.zones.len(),
                    "fingerprint": fingerprint,
                }));
                ExitCode::SUCCESS
            }
            Err(e) => {
                emit(&json!({"valid": false, "error": e.to_string()}));
                ExitCode::from(2)
            }
        },

        Commands::Apply { scene, commands, actor } => {
            let scene = match load_scene(&scene) {
                Ok(s) => s,
                Err(e) => return fail(&format!("Invalid scene: {}", e), ExitCode::FAILURE),
            };
            let batch = match read_arg(&commands)
                .map_err(EngineError::from)
                .and_then(|raw| parse_commands(&raw).map_err(EngineError::from))
            {
                Ok(b) => b,
                Err(e) => return fail(&format!("Invalid commands: {}", e), ExitCode::FAILURE),
            };

            let mut store = HistoryStore::with_config(scene, &config);
            let outcome = store.dispatch(batch, actor.into());
            let fingerprint = match scene_fingerprint(store.scene()) {
                Ok(f) => f,
                Err(e) => return fail(&format!("Failed to fingerprint scene: {}", e), ExitCode::FAILURE),
            };
            let log: Vec<_> = store.action_log().iter().collect();

            match outcome {
                Ok(summary) => {
                    emit(&json!({
                        "success": true,
                        "summary": summary,
                        "scene": store.scene(),
                        "fingerprint": fingerprint,
                        "log": log,
                    }));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    emit(&json!({
                        "success": false,
                        "error": e.to_string(),
                        "fingerprint": fingerprint,
                        "log": log,
                    }));
                    ExitCode::from(2)
                }
            }
        }
    }
}

fn load_scene(path: &Path) -> Result<Scene, EngineError> {
    let content = fs::read_to_string(path)?;
    Ok(Scene::from_json(&content)?)
}

/// `@path` reads the argument from a file.
fn read_arg(arg: &str) -> Result<String, std::io::Error> {
    match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path),
        None => Ok(arg.to_string()),
    }
}

fn emit(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("failed to serialize output: {}", e),
    }
}

fn fail(message: &str, code: ExitCode) -> ExitCode {
    emit(&json!({"success": false, "error": message}));
    code
}
