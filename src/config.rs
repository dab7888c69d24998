use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub description: Option<String>,
    pub tasks: Vec<TaskConfig>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct TaskConfig {
    pub description: Option<String>,
    pub input: PathBuf,
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl TaskConfig {
    pub fn new(input: PathBuf, output: Option<PathBuf>) -> Self {
        Self { description: None, input, output }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| default_output_path(&self.input))
    }
}

/// `parsed_<stem>.csv` next to the input. A `.csv.gz` input loses both extensions.
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut stem = input.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
    if input.extension().map_or(false, |e| e.eq_ignore_ascii_case("gz")) {
        if let Some(inner) = Path::new(&stem).file_stem() {
            stem = inner.to_string_lossy().to_string();
        }
    }
    input.with_file_name(format!("parsed_{}.csv", stem))
}

pub fn load_run_config(path: &Path) -> Result<RunConfig> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open run configuration file: {}", path.display()))?;
    let config: RunConfig = serde_yaml::from_reader(file)
        .with_context(|| format!("Failed to parse run configuration YAML from {}", path.display()))?;
    Ok(config)
}
