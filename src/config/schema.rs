use serde::{Deserialize, Serialize};

/// Main configuration.
///
/// Example YAML:
/// ```yaml
/// output:
///   directory: ~/audit-reports
///   format: text
///   pretty: true
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where and how reports are written.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory saved reports go to (default: current directory)
    #[serde(default)]
    pub directory: Option<String>,

    /// Terminal output format (default: text)
    #[serde(default)]
    pub format: Option<OutputFormat>,

    /// Pretty-print saved JSON (default: true)
    #[serde(default)]
    pub pretty: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Tsv,
}

impl OutputConfig {
    pub fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    pub fn pretty(&self) -> bool {
        self.pretty.unwrap_or(true)
    }
}
