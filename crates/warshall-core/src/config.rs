use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Relative location of the project config file.
pub const PROJECT_CONFIG_PATH: &str = ".warshall/config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub graphs: GraphsConfig,
    #[serde(default)]
    pub solve: SolveConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphsConfig {
    /// Directory searched by `fw list` and by numeric graph selection.
    #[serde(default = "default_graph_dir")]
    pub dir: PathBuf,
}

impl Default for GraphsConfig {
    fn default() -> Self {
        Self {
            dir: default_graph_dir(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveConfig {
    /// Print every intermediate snapshot of `L` and `P`.
    #[serde(default)]
    pub trace: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// `pretty`, `text` or `json`. Unset means "decide from the terminal".
    #[serde(default)]
    pub format: Option<String>,
}

/// Partial config as it appears on disk; unset keys fall through to the next
/// layer.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigLayer {
    #[serde(default)]
    graphs: GraphsLayer,
    #[serde(default)]
    solve: SolveLayer,
    #[serde(default)]
    output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GraphsLayer {
    dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SolveLayer {
    trace: Option<bool>,
}

/// Load and merge the user config and the project config under
/// `project_root`. Project values win over user values; both win over
/// defaults. Missing files are not an error.
///
/// A relative `graphs.dir` in the project file is resolved against
/// `project_root`.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed.
pub fn load_config(project_root: &Path) -> Result<Config> {
    let user = match user_config_path() {
        Some(path) => load_layer(&path)?,
        None => None,
    };
    let project = load_layer(&project_root.join(PROJECT_CONFIG_PATH))?.map(|mut layer| {
        if let Some(dir) = layer.graphs.dir.take() {
            layer.graphs.dir = Some(project_root.join(dir));
        }
        layer
    });

    Ok(merge(user.unwrap_or_default(), project.unwrap_or_default()))
}

/// `<config_dir>/warshall/config.toml`, if the platform has a config dir.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("warshall/config.toml"))
}

fn load_layer(path: &Path) -> Result<Option<ConfigLayer>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ConfigLayer>(&content)
        .map(Some)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn merge(user: ConfigLayer, project: ConfigLayer) -> Config {
    Config {
        graphs: GraphsConfig {
            dir: project
                .graphs
                .dir
                .or(user.graphs.dir)
                .unwrap_or_else(default_graph_dir),
        },
        solve: SolveConfig {
            trace: project.solve.trace.or(user.solve.trace).unwrap_or(false),
        },
        output: OutputConfig {
            format: project.output.format.or(user.output.format),
        },
    }
}

fn default_graph_dir() -> PathBuf {
    PathBuf::from("tested_graph")
}
