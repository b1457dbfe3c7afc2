//! Event log export settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct ExportConfig {
    /// Directory that receives `LOG_<HHMMSS>.<ext>` files.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// File extension, without the dot.
    #[validate(custom(function = validation::validate_extension))]
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_extension() -> String {
    "csv".into()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            extension: default_extension(),
        }
    }
}
