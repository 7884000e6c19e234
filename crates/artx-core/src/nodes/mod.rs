//! Host-facing nodes.
//!
//! Each node takes string-keyed inputs and returns a single text block for
//! display. The host discovers nodes through the static [`NodeRegistry`].

mod builtin;
pub mod registry;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

pub use builtin::{GitHubInstallerNode, ModelsListNode, PathListNode};
pub use registry::{NodeEntry, NodeRegistry};

/// Category under which all nodes are shown in the host.
pub const NODE_CATEGORY: &str = "ArtX Tools";

/// Input values keyed by input name.
pub type NodeInputs = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputKind {
    String { multiline: bool },
    Choice { choices: &'static [&'static str] },
}

/// Declared input of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputSpec {
    pub name: &'static str,
    #[serde(flatten)]
    pub kind: InputKind,
    pub default: &'static str,
}

impl InputSpec {
    /// Value for this input, falling back to the default when absent.
    pub fn value<'a>(&'a self, inputs: &'a NodeInputs) -> Result<&'a str, String> {
        let value = inputs
            .get(self.name)
            .map(String::as_str)
            .unwrap_or(self.default);
        match self.kind {
            InputKind::Choice { choices } if !choices.contains(&value) => Err(format!(
                "Invalid value for {}: '{}'. Expected one of: {}",
                self.name,
                value,
                choices.join(", ")
            )),
            _ => Ok(value),
        }
    }
}

/// Text produced by a node run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeOutput {
    pub text: String,
    pub success: bool,
}

impl NodeOutput {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
        }
    }

    pub fn failed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: false,
        }
    }
}

pub trait Node: fmt::Debug {
    fn id(&self) -> &'static str;

    fn run(&self, inputs: &NodeInputs) -> NodeOutput;
}
