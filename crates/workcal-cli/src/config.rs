//! Settings and calendar definition loading.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use figment::providers::{Env, Format, Json, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use workcal::{Calendar, CalendarDefinition};

/// CLI settings, layered: defaults, optional settings file, `WORKCAL_*` env vars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the calendar definition (TOML or JSON).
    pub calendar: PathBuf,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            calendar: PathBuf::from("workcal.toml"),
            pretty: false,
        }
    }
}

impl Config {
    /// An explicitly requested settings file must exist.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = config_path {
            if !path.is_file() {
                bail!("Settings file not found: {}", path.display());
            }
            figment = figment.merge(Toml::file(path));
        }

        let config = figment.merge(Env::prefixed("WORKCAL_")).extract()?;
        Ok(config)
    }
}

/// Read a calendar definition file and register everything it declares.
///
/// Files ending in `.json` are read as JSON, anything else as TOML.
pub fn load_calendar(path: &Path) -> Result<Calendar> {
    if !path.is_file() {
        bail!("Calendar file not found: {}", path.display());
    }

    let figment = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Figment::from(Json::file(path)),
        _ => Figment::from(Toml::file(path)),
    };
    let definition: CalendarDefinition = figment
        .extract()
        .with_context(|| format!("Failed to parse calendar file: {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        time_frames = definition.time_frames.len(),
        date_frames = definition.date_frames.len(),
        "loaded calendar definition"
    );

    Calendar::from_definition(definition)
        .with_context(|| format!("Invalid calendar definition: {}", path.display()))
}
