//! Example host for the HepEVD event display server.
//!
//! Stands in for an analysis program: it builds a detector, synthesises
//! one event, hands everything to [`HepEvdServer`] and blocks until the
//! viewer's Quit button (or `GET /quit`) stops the server.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from the path given as the first argument, or
//!    `hepevd-config.yaml` in the working directory if it exists
//! 2. Initialize structured logging (tracing)
//! 3. Generate the detector and the event
//! 4. Feed the server: 3D hits at construction, 2D hits appended after
//! 5. Serve until stopped

mod error;
mod generator;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use hepevd_server::{ConfigError, HepEvdConfig, HepEvdServer, LogFormat, LoggingConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::DemoError;
use crate::generator::{EventConfig, EventGenerator};

/// Config file looked up when no path is given.
const DEFAULT_CONFIG_PATH: &str = "hepevd-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the server
/// fails to bind or serve.
fn main() -> Result<(), DemoError> {
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let (config, event_config) = load_config(&config_path)?;

    init_tracing(&config.logging);
    info!(
        path = %config_path.display(),
        host = %config.server.host,
        port = config.server.port,
        seed = event_config.seed,
        "hepevd-demo starting"
    );

    let geometry = generator::detector();
    let event = EventGenerator::new(event_config).generate();
    info!(
        volumes = geometry.len(),
        hits_3d = event.hits_3d.len(),
        hits_2d = event.hits_2d.len(),
        truth = %event.truth,
        "Event generated"
    );

    let server = HepEvdServer::with_hits(geometry, event.hits_3d).with_config(config.server);
    server.add_hits(event.hits_2d);
    server.add_markers(event.markers);
    server.add_particles(event.particles);
    server.add_truth(event.mc_hits, event.truth);

    server.start()?;

    info!("hepevd-demo shutdown complete");
    Ok(())
}

/// Load the server and event configuration.
///
/// The file is read once and both sections are parsed from the same
/// contents. A missing file is not an error: defaults are used, with
/// environment overrides still applied to the server section.
fn load_config(path: &Path) -> Result<(HepEvdConfig, EventConfig), DemoError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(ConfigError::from(e).into()),
    };

    let mut config = HepEvdConfig::parse(&contents)?;
    config.server.apply_env_overrides()?;
    let event = EventConfig::parse(&contents)?;
    Ok((config, event))
}

/// Install the global `tracing` subscriber. `RUST_LOG` takes precedence
/// over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match logging.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, event) = load_config(&dir.path().join("hepevd-config.yaml")).unwrap();

        assert_eq!(config.logging, LoggingConfig::default());
        assert_eq!(event, EventConfig::default());
    }

    #[test]
    fn both_sections_come_from_one_file() {
        let file = config_file("logging:\n  format: json\nevent:\n  seed: 9\n  tracks: 1\n");
        let (config, event) = load_config(file.path()).unwrap();

        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(event.seed, 9);
        assert_eq!(event.tracks, 1);
    }

    #[test]
    fn unreadable_path_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, DemoError::Config { source: ConfigError::Io { .. } }));
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        let file = config_file("logging: [unclosed\n");
        let err = load_config(file.path()).unwrap_err();

        assert!(matches!(err, DemoError::Config { source: ConfigError::Yaml { .. } }));
    }
}
