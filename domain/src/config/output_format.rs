//! Output format value object

use serde::{Deserialize, Serialize};

/// Output format for the final run report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable report (default)
    #[default]
    Text,
    /// JSON report
    Json,
}
