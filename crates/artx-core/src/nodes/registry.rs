//! Static registry of the nodes exposed to the host.
//!
//! Replaces reflection-based discovery with a lookup table built once:
//! node id → constructor, display name and declared inputs.

use std::fmt;

use serde::Serialize;

use crate::context::AppContext;

use super::builtin::{GITHUB_INSTALLER_INPUTS, PATH_LIST_INPUTS};
use super::{
    GitHubInstallerNode, InputSpec, ModelsListNode, NODE_CATEGORY, Node, PathListNode,
};

type NodeConstructor = fn(&AppContext) -> Box<dyn Node>;

/// One registered node.
#[derive(Clone, Copy, Serialize)]
pub struct NodeEntry {
    pub id: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    pub inputs: &'static [InputSpec],
    pub output_name: &'static str,
    #[serde(skip)]
    construct: NodeConstructor,
}

impl fmt::Debug for NodeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeEntry")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

impl NodeEntry {
    pub fn build(&self, ctx: &AppContext) -> Box<dyn Node> {
        (self.construct)(ctx)
    }
}

#[derive(Debug, Clone)]
pub struct NodeRegistry {
    entries: Vec<NodeEntry>,
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl NodeRegistry {
    /// Registry with every node this crate provides.
    pub fn builtin() -> Self {
        let entries = vec![
            NodeEntry {
                id: PathListNode::ID,
                display_name: "Path Contents List",
                category: NODE_CATEGORY,
                inputs: &PATH_LIST_INPUTS,
                output_name: "path_list",
                construct: build_path_list,
            },
            NodeEntry {
                id: ModelsListNode::ID,
                display_name: "Models Directory List",
                category: NODE_CATEGORY,
                inputs: &[],
                output_name: "models_list",
                construct: build_models_list,
            },
            NodeEntry {
                id: GitHubInstallerNode::ID,
                display_name: "GitHub Installer",
                category: NODE_CATEGORY,
                inputs: &GITHUB_INSTALLER_INPUTS,
                output_name: "install_result",
                construct: build_github_installer,
            },
        ];
        Self { entries }
    }

    pub fn all(&self) -> &[NodeEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&NodeEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Construct the node registered under `id`.
    pub fn instantiate(&self, id: &str, ctx: &AppContext) -> Option<Box<dyn Node>> {
        self.get(id).map(|entry| entry.build(ctx))
    }

    /// Discovery document handed to the host.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "nodes": self.entries })
    }
}

fn build_path_list(ctx: &AppContext) -> Box<dyn Node> {
    Box::new(PathListNode::new(ctx.path_lister()))
}

fn build_models_list(ctx: &AppContext) -> Box<dyn Node> {
    Box::new(ModelsListNode::new(ctx.path_lister()))
}

fn build_github_installer(ctx: &AppContext) -> Box<dyn Node> {
    Box::new(GitHubInstallerNode::new(ctx.installer()))
}
