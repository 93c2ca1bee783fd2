//! Per-program configuration (`mdev.toml`)

use mdev_fs::{ConfigStore, MdevPath, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Repository the framework reference of a new program points at.
pub const DEFAULT_FRAMEWORK_URL: &str = "https://code.aliyun.com/mxos/mxos.git";

/// Revision the framework reference of a new program is pinned to.
pub const DEFAULT_FRAMEWORK_REF: &str = "master";

/// Contents of the optional `mdev.toml` at a program root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramConfig {
    /// Extra directory names the scanner skips.
    pub ignore: Vec<String>,
    pub framework: FrameworkConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkConfig {
    pub url: String,
    #[serde(rename = "ref")]
    pub reference: String,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FRAMEWORK_URL.to_string(),
            reference: DEFAULT_FRAMEWORK_REF.to_string(),
        }
    }
}

impl ProgramConfig {
    /// Load `mdev.toml` from `program_root`, or defaults if it is absent.
    pub fn load(program_root: &NormalizedPath) -> Result<Self> {
        let path = program_root.join(MdevPath::ConfigFile.as_str());
        Ok(ConfigStore::new().load_or_default(&path)?)
    }
}
