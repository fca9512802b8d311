use color_eyre::eyre::WrapErr;
use log::{debug, info};
use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};
use two_tool_core::{Color, DepthConfig, DisplayFilter, Method};

/// Settings read from the TOML config file. Every field is optional and
/// command line flags take precedence.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub depths: DepthConfig,
    /// Methods to show. The default selection when absent.
    pub methods: Option<Vec<Method>>,
    /// Colors to show. All colors when absent.
    pub colors: Option<Vec<Color>>,
    pub limit: Option<usize>,
    /// A case table replacing the builtin one.
    pub algs: Option<PathBuf>,
    /// How long to wait for the solver, in seconds.
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// A missing file is the default config.
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).wrap_err_with(|| format!("Could not read {}", path.display()));
            }
        };
        let config = toml::from_str(&text)
            .wrap_err_with(|| format!("Invalid config file {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(60))
    }

    pub fn display_filter(&self) -> DisplayFilter {
        let mut filter = DisplayFilter {
            depths: self.depths,
            ..DisplayFilter::default()
        };
        if let Some(methods) = &self.methods {
            filter.methods = methods.iter().copied().collect();
        }
        if let Some(colors) = &self.colors {
            filter.colors = colors.iter().copied().collect();
        }
        if let Some(limit) = self.limit {
            filter.limit = limit;
        }
        filter
    }
}
