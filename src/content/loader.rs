//! Loader for RON configuration files at startup.

use bevy::prelude::*;
use ron::Options;
use std::fs;
use std::path::Path;

use super::data::ScriptConfig;
use crate::movement::LocomotionTuning;

pub const LOCOMOTION_FILE: &str = "locomotion.ron";
pub const SCRIPT_FILE: &str = "script.ron";

/// Error type for content loading failures.
#[derive(Debug)]
pub struct ContentLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for ContentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

impl std::error::Error for ContentLoadError {}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

/// Parse a single RON struct from text.
pub fn parse_single<T>(file_name: &str, contents: &str) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    ron_options()
        .from_str(contents)
        .map_err(|e| ContentLoadError {
            file: file_name.to_string(),
            message: format!("Parse error: {}", e),
        })
}

/// Load a single RON struct from disk.
fn load_single_file<T>(path: &Path) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file_name = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|e| ContentLoadError {
        file: file_name.clone(),
        message: format!("IO error: {}", e),
    })?;

    parse_single(&file_name, &contents)
}

/// Load a config file, falling back to defaults (with a warning) when it is
/// missing or malformed.
pub fn load_or_default<T>(base_path: &Path, file: &str) -> T
where
    T: for<'de> serde::Deserialize<'de> + Default,
{
    match load_single_file::<T>(&base_path.join(file)) {
        Ok(value) => {
            info!("Loaded {}", file);
            value
        }
        Err(e) => {
            warn!("{}; using defaults", e);
            T::default()
        }
    }
}

/// Load locomotion tuning and the script config from `base_path`.
pub fn load_all_content(base_path: &Path) -> (LocomotionTuning, ScriptConfig) {
    (
        load_or_default(base_path, LOCOMOTION_FILE),
        load_or_default(base_path, SCRIPT_FILE),
    )
}
