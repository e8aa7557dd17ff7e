//! Backup records: the serialized form of a scene.
//!
//! The same record is used for autosave, undo snapshots, and file
//! import/export, so the format is the compatibility surface. Import
//! validates into a fresh scene before touching the current one.

use crate::scene::Scene;
use crate::shapes::{AnyLink, DEFAULT_NODE_RADIUS, Node};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("malformed backup: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("link {link} references node {node}, but only {count} nodes exist")]
    NodeIndexOutOfRange { link: usize, node: usize, count: usize },
}

fn default_node_radius() -> f64 {
    DEFAULT_NODE_RADIUS
}

/// The on-disk document record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub links: Vec<AnyLink>,
    #[serde(default = "default_node_radius")]
    pub node_radius: f64,
    /// Canvas size is optional in old records; absent values keep the
    /// importing scene's current size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_height: Option<u32>,
}

impl Backup {
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            nodes: scene.nodes.clone(),
            links: scene.links.clone(),
            node_radius: scene.node_radius,
            canvas_width: Some(scene.canvas_width),
            canvas_height: Some(scene.canvas_height),
        }
    }

    /// Check that every link references an existing node.
    fn validate(&self) -> Result<(), ImportError> {
        let count = self.nodes.len();
        for (index, link) in self.links.iter().enumerate() {
            let node = link.max_node_index();
            if node >= count {
                return Err(ImportError::NodeIndexOutOfRange { link: index, node, count });
            }
        }
        Ok(())
    }
}

impl Scene {
    /// Serialize into the backup record.
    pub fn to_backup_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&Backup::from_scene(self))
    }

    /// Replace this scene with the contents of a backup record. On error
    /// the scene is left untouched.
    pub fn restore_from_json(&mut self, json: &str) -> Result<(), ImportError> {
        let backup: Backup = serde_json::from_str(json)?;
        backup.validate()?;
        let node_radius = if backup.node_radius > 0.0 {
            backup.node_radius
        } else {
            DEFAULT_NODE_RADIUS
        };
        self.nodes = backup.nodes;
        self.links = backup.links;
        self.node_radius = node_radius;
        self.canvas_width = backup.canvas_width.unwrap_or(self.canvas_width);
        self.canvas_height = backup.canvas_height.unwrap_or(self.canvas_height);
        Ok(())
    }
}
