//! Source categories

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a host list came from. Each category is an independent
/// enumerate -> collect -> render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// The machine running the tool
    Local,
    /// Computer objects in an on-premises directory
    Directory,
    /// Devices registered in the cloud directory
    CloudDirectory,
}

impl Category {
    /// Stem used for output file names
    pub fn slug(self) -> &'static str {
        match self {
            Category::Local => "local",
            Category::Directory => "directory",
            Category::CloudDirectory => "cloud_directory",
        }
    }

    /// Report title
    pub fn title(self) -> &'static str {
        match self {
            Category::Local => "Local Host Inventory",
            Category::Directory => "Directory Computer Inventory",
            Category::CloudDirectory => "Cloud Directory Device Inventory",
        }
    }

    /// Local hosts are queried without a remote session
    pub fn is_local(self) -> bool {
        matches!(self, Category::Local)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
