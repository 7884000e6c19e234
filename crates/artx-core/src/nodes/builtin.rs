use crate::install::RepositoryInstaller;
use crate::listing::PathLister;
use crate::types::Category;

use super::{InputKind, InputSpec, Node, NodeInputs, NodeOutput};

pub(super) static PATH_LIST_INPUTS: [InputSpec; 1] = [InputSpec {
    name: "path",
    kind: InputKind::String { multiline: false },
    default: ".",
}];

pub(super) static INSTALL_TYPE_CHOICES: [&str; 2] = ["custom_nodes", "models"];

pub(super) static GITHUB_INSTALLER_INPUTS: [InputSpec; 2] = [
    InputSpec {
        name: "github_url",
        kind: InputKind::String { multiline: false },
        default: "https://github.com/owner/repository-name",
    },
    InputSpec {
        name: "install_type",
        kind: InputKind::Choice {
            choices: &INSTALL_TYPE_CHOICES,
        },
        default: "custom_nodes",
    },
];

/// Lists a directory relative to the host base directory.
#[derive(Debug)]
pub struct PathListNode {
    lister: PathLister,
}

impl PathListNode {
    pub const ID: &'static str = "PathListNode";

    pub fn new(lister: PathLister) -> Self {
        Self { lister }
    }
}

impl Node for PathListNode {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn run(&self, inputs: &NodeInputs) -> NodeOutput {
        let path = match PATH_LIST_INPUTS[0].value(inputs) {
            Ok(path) => path,
            Err(message) => return NodeOutput::failed(message),
        };
        match self.lister.list(path) {
            Ok(listing) => NodeOutput::ok(listing.render()),
            Err(err) => NodeOutput::failed(format!("Error listing directory: {}", err)),
        }
    }
}

/// Lists the subdirectories of the host models directory.
#[derive(Debug)]
pub struct ModelsListNode {
    lister: PathLister,
}

impl ModelsListNode {
    pub const ID: &'static str = "ModelsListNode";

    pub fn new(lister: PathLister) -> Self {
        Self { lister }
    }
}

impl Node for ModelsListNode {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn run(&self, _inputs: &NodeInputs) -> NodeOutput {
        match self.lister.list_models() {
            Ok(listing) => NodeOutput::ok(listing.render()),
            Err(err) => NodeOutput::failed(format!("Error listing models directory: {}", err)),
        }
    }
}

/// Clones a GitHub repository into the node or model directory.
#[derive(Debug)]
pub struct GitHubInstallerNode {
    installer: RepositoryInstaller,
}

impl GitHubInstallerNode {
    pub const ID: &'static str = "GitHubInstallerNode";

    pub fn new(installer: RepositoryInstaller) -> Self {
        Self { installer }
    }
}

impl Node for GitHubInstallerNode {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn run(&self, inputs: &NodeInputs) -> NodeOutput {
        let [url_spec, type_spec] = &GITHUB_INSTALLER_INPUTS;
        let url = match url_spec.value(inputs) {
            Ok(url) => url,
            Err(message) => return NodeOutput::failed(message),
        };
        let category = match type_spec.value(inputs).and_then(|v| v.parse::<Category>()) {
            Ok(category) => category,
            Err(message) => return NodeOutput::failed(message),
        };

        let report = self.installer.install_report(url, category);
        NodeOutput {
            text: report.render(),
            success: report.is_success(),
        }
    }
}
