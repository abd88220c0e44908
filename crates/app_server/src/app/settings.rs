//! Resolution of the service configuration from files and the environment.

use anyhow::{Context, Result};
use directories_next::ProjectDirs;
use medimg_core::ServiceConfig;
use std::path::{Path, PathBuf};

const CONFIG_ENV: &str = "MEDIMG_CONFIG";
const PORT_ENV: &str = "PORT";
const CONFIG_FILE: &str = "config.toml";

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    UserDir(PathBuf),
    Defaults,
}

/// Load the configuration: an explicit path wins, then the per-user config
/// file if present, then built-in defaults. `PORT` overrides the port last.
pub fn resolve(explicit: Option<PathBuf>) -> Result<(ServiceConfig, ConfigSource)> {
    let explicit = explicit.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    let user_file = ProjectDirs::from("org", "medimg", "medimg")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE));
    let port = std::env::var(PORT_ENV).ok();
    resolve_from(explicit, user_file.as_deref(), port.as_deref())
}

fn resolve_from(
    explicit: Option<PathBuf>,
    user_file: Option<&Path>,
    port: Option<&str>,
) -> Result<(ServiceConfig, ConfigSource)> {
    let (config, source) = match (explicit, user_file) {
        (Some(path), _) => (ServiceConfig::load(&path)?, ConfigSource::Explicit(path)),
        (None, Some(path)) if path.is_file() => (
            ServiceConfig::load(path)?,
            ConfigSource::UserDir(path.to_path_buf()),
        ),
        _ => (ServiceConfig::default(), ConfigSource::Defaults),
    };

    let config = match port {
        Some(raw) => {
            let port: u16 = raw
                .trim()
                .parse()
                .with_context(|| format!("{PORT_ENV} is not a valid port: {raw}"))?;
            config.with_port(port)
        }
        None => config,
    };
    Ok((config, source))
}
