use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::DensegroupConfig;
use super::validation::validate_config;
use crate::errors::ConfigError;

/// File name searched for by [`load_config`].
pub const CONFIG_FILE_NAME: &str = ".densegroup.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse and validate config from a TOML string.
pub fn parse_and_validate_config(
    contents: &str,
    origin: &Path,
) -> Result<DensegroupConfig, ConfigError> {
    let config =
        toml::from_str::<DensegroupConfig>(contents).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source: Box::new(source),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Load an explicitly named config file. Every failure is an error.
pub fn load_config_from(path: &Path) -> Result<DensegroupConfig, ConfigError> {
    let contents = read_config_file(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_and_validate_config(&contents, path)?;
    tracing::debug!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Directory ancestors of `start`, nearest first, up to `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.densegroup.toml`.
///
/// Returns the default config when no file exists. A file that exists but
/// cannot be read, parsed or validated is an error rather than silently
/// replaced by defaults.
pub fn load_config_near(start: PathBuf) -> Result<DensegroupConfig, ConfigError> {
    let found = directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file());

    match found {
        Some(path) => load_config_from(&path),
        None => {
            tracing::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            Ok(DensegroupConfig::default())
        }
    }
}

/// [`load_config_near`] starting from the current directory.
pub fn load_config() -> Result<DensegroupConfig, ConfigError> {
    match std::env::current_dir() {
        Ok(dir) => load_config_near(dir),
        Err(e) => {
            tracing::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            Ok(DensegroupConfig::default())
        }
    }
}
