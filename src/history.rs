//! History Store - snapshot undo/redo plus the action log
//!
//! A dispatch is atomic: it either becomes exactly one undo step or leaves the
//! document untouched. Only the action log records failures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::commands::CommandBatch;
use crate::config::EngineConfig;
use crate::error::CommandError;
use crate::model::Scene;
use crate::processor::CommandProcessor;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    #[default]
    Human,
    Ai,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub actor: Actor,
    pub summary: String,
    pub status: LogStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogEntry {
    fn new(actor: Actor, summary: String, status: LogStatus, error: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            actor,
            summary,
            status,
            error,
        }
    }
}

/// Undo/redo availability for toolbars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoState {
    pub can_undo: bool,
    pub can_redo: bool,
    pub undo_depth: usize,
    pub redo_depth: usize,
}

/// Owns the authoritative scene. Everything else gets copies.
pub struct HistoryStore {
    scene: Scene,
    /// Oldest first.
    past: Vec<Scene>,
    /// Most recently undone first.
    future: VecDeque<Scene>,
    /// Newest first.
    action_log: VecDeque<LogEntry>,
    processor: CommandProcessor,
    limit: Option<usize>,
}

impl HistoryStore {
    pub fn new(scene: Scene) -> Self {
        Self::with_config(scene, &EngineConfig::default())
    }

    pub fn with_config(scene: Scene, config: &EngineConfig) -> Self {
        Self::with_processor(
            scene,
            CommandProcessor::from_config(&config.placement),
            config.history.limit,
        )
    }

    pub fn with_processor(scene: Scene, processor: CommandProcessor, limit: Option<usize>) -> Self {
        Self {
            scene,
            past: Vec::new(),
            future: VecDeque::new(),
            action_log: VecDeque::new(),
            processor,
            limit,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Owned copy of the current scene.
    pub fn snapshot(&self) -> Scene {
        self.scene.clone()
    }

    pub fn history_past(&self) -> &[Scene] {
        &self.past
    }

    pub fn history_future(&self) -> &VecDeque<Scene> {
        &self.future
    }

    pub fn action_log(&self) -> &VecDeque<LogEntry> {
        &self.action_log
    }

    /// Apply one or more commands atomically. Returns the joined event summary.
    pub fn dispatch(
        &mut self,
        commands: impl Into<CommandBatch>,
        actor: Actor,
    ) -> Result<String, CommandError> {
        let batch = commands.into();

        match self.processor.apply_batch(&self.scene, &batch) {
            Ok(applied) => {
                let previous = std::mem::replace(&mut self.scene, applied.scene);
                self.past.push(previous);
                self.future.clear();
                self.enforce_limit();

                info!(
                    ?actor,
                    commands = batch.len(),
                    summary = %applied.event,
                    undo_depth = self.past.len(),
                    "dispatch committed"
                );
                self.action_log.push_front(LogEntry::new(
                    actor,
                    applied.event.clone(),
                    LogStatus::Success,
                    None,
                ));
                Ok(applied.event)
            }
            Err(err) => {
                warn!(?actor, commands = batch.len(), error = %err, "dispatch rejected");
                let summary = batch
                    .0
                    .iter()
                    .map(|c| c.description())
                    .collect::<Vec<_>>()
                    .join("; ");
                self.action_log.push_front(LogEntry::new(
                    actor,
                    summary,
                    LogStatus::Error,
                    Some(err.to_string()),
                ));
                Err(err)
            }
        }
    }

    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.scene, previous);
        self.future.push_front(current);
        debug!(undo_depth = self.past.len(), redo_depth = self.future.len(), "undo");
        true
    }

    /// Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.scene, next);
        self.past.push(current);
        self.enforce_limit();
        debug!(undo_depth = self.past.len(), redo_depth = self.future.len(), "redo");
        true
    }

    pub fn undo_state(&self) -> UndoState {
        UndoState {
            can_undo: !self.past.is_empty(),
            can_redo: !self.future.is_empty(),
            undo_depth: self.past.len(),
            redo_depth: self.future.len(),
        }
    }

    /// Replace the document (e.g. after loading), dropping undo/redo history.
    /// The action log is kept.
    pub fn reset(&mut self, scene: Scene) {
        self.scene = scene;
        self.past.clear();
        self.future.clear();
        debug!("history reset");
    }

    fn enforce_limit(&mut self) {
        if let Some(limit) = self.limit {
            if self.past.len() > limit {
                let excess = self.past.len() - limit;
                self.past.drain(..excess);
                debug!(dropped = excess, limit, "trimmed undo history");
            }
        }
    }
}
