//! Output formats shared by the lenses and the command line

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const FORMAT_NAMES: &[&str] = &[
    "table",
    "markdown",
    "json",
    "json-pretty",
    "json-line",
    "psv",
];

/// How lookup results are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Rounded table (default)
    #[default]
    Table,
    /// Markdown table
    Markdown,
    /// Compact JSON array
    Json,
    /// Indented JSON array
    JsonPretty,
    /// One JSON object per line
    JsonLine,
    /// Pipe-separated values with header
    Psv,
}

impl OutputFormat {
    /// Check if this is a JSON variant
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json | Self::JsonPretty | Self::JsonLine)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Table => FORMAT_NAMES[0],
            Self::Markdown => FORMAT_NAMES[1],
            Self::Json => FORMAT_NAMES[2],
            Self::JsonPretty => FORMAT_NAMES[3],
            Self::JsonLine => FORMAT_NAMES[4],
            Self::Psv => FORMAT_NAMES[5],
        };
        write!(f, "{}", name)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "pretty" => Ok(Self::Table),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "json-pretty" | "jsonpretty" => Ok(Self::JsonPretty),
            "json-line" | "jsonl" | "ndjson" => Ok(Self::JsonLine),
            "psv" | "pipe" => Ok(Self::Psv),
            _ => Err(format!(
                "Unknown output format '{}'. Valid formats: {}",
                s,
                FORMAT_NAMES.join(", ")
            )),
        }
    }
}
