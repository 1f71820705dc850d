//! Config resolution: explicit path → env → XDG → defaults.

use std::path::{Path, PathBuf};

use crate::connector::ConnectorConfig;
use crate::validate::ValidationError;

/// Env var naming a config file.
pub const ENV_CONFIG_PATH: &str = "TABLESINK_CONFIG";
/// Env var overriding master addresses (comma-separated).
pub const ENV_MASTERS: &str = "TABLESINK_MASTERS";
/// Env var overriding the base log level / filter.
pub const ENV_LOG: &str = "TABLESINK_LOG";

const APP_DIR: &str = "tablesink";
const CONFIG_FILE_NAME: &str = "connector.json";

/// Where the resolved config came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Env(PathBuf),
    Xdg(PathBuf),
    Defaults,
}

/// A resolved config plus its provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: ConnectorConfig,
    pub source: ConfigSource,
}

/// Resolve using the process environment and the platform config dir.
pub fn resolve_config(explicit: Option<&Path>) -> Result<ResolvedConfig, ValidationError> {
    resolve_config_with(
        explicit,
        |key| std::env::var(key).ok(),
        dirs::config_dir(),
    )
}

/// Resolve with an injected environment lookup and config dir.
///
/// An explicit or env-named path that does not exist is an error; a missing
/// XDG file silently falls through to defaults.
pub fn resolve_config_with<F>(
    explicit: Option<&Path>,
    env: F,
    config_dir: Option<PathBuf>,
) -> Result<ResolvedConfig, ValidationError>
where
    F: Fn(&str) -> Option<String>,
{
    let (mut config, source) = if let Some(path) = explicit {
        (
            ConnectorConfig::from_file(path)?,
            ConfigSource::Explicit(path.to_path_buf()),
        )
    } else if let Some(path) = env(ENV_CONFIG_PATH).filter(|p| !p.is_empty()) {
        let path = PathBuf::from(path);
        (ConnectorConfig::from_file(&path)?, ConfigSource::Env(path))
    } else {
        match config_dir
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE_NAME))
            .filter(|p| p.is_file())
        {
            Some(path) => (ConnectorConfig::from_file(&path)?, ConfigSource::Xdg(path)),
            None => (ConnectorConfig::default(), ConfigSource::Defaults),
        }
    };

    apply_env_overrides(&mut config, &env);
    Ok(ResolvedConfig { config, source })
}

fn apply_env_overrides<F>(config: &mut ConnectorConfig, env: &F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(masters) = env(ENV_MASTERS) {
        let addrs: Vec<String> = masters
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        if !addrs.is_empty() {
            config.master_addresses = addrs;
        }
    }
    if let Some(level) = env(ENV_LOG).filter(|l| !l.trim().is_empty()) {
        config.logging.level = level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_config(path: &Path, json: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, json).unwrap();
    }

    #[test]
    fn defaults_when_nothing_configured() {
        let dir = tempdir().unwrap();
        let resolved =
            resolve_config_with(None, env_from(&[]), Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(resolved.source, ConfigSource::Defaults);
        assert_eq!(resolved.config, ConnectorConfig::default());
    }

    #[test]
    fn explicit_path_wins() {
        let dir = tempdir().unwrap();
        let explicit = dir.path().join("explicit.json");
        write_config(&explicit, r#"{"master_addresses": ["a:1"]}"#);
        let env_path = dir.path().join("env.json");
        write_config(&env_path, r#"{"master_addresses": ["b:1"]}"#);

        let env = env_from(&[(ENV_CONFIG_PATH, env_path.to_str().unwrap())]);
        let resolved = resolve_config_with(Some(&explicit), env, None).unwrap();
        assert_eq!(resolved.source, ConfigSource::Explicit(explicit));
        assert_eq!(resolved.config.master_addresses, vec!["a:1"]);
    }

    #[test]
    fn env_path_before_xdg() {
        let dir = tempdir().unwrap();
        let env_path = dir.path().join("env.json");
        write_config(&env_path, r#"{"master_addresses": ["b:1"]}"#);
        let xdg = dir.path().join("xdg");
        write_config(
            &xdg.join(APP_DIR).join(CONFIG_FILE_NAME),
            r#"{"master_addresses": ["c:1"]}"#,
        );

        let env = env_from(&[(ENV_CONFIG_PATH, env_path.to_str().unwrap())]);
        let resolved = resolve_config_with(None, env, Some(xdg)).unwrap();
        assert_eq!(resolved.source, ConfigSource::Env(env_path));
        assert_eq!(resolved.config.master_addresses, vec!["b:1"]);
    }

    #[test]
    fn xdg_file_used_when_present() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(APP_DIR).join(CONFIG_FILE_NAME);
        write_config(&path, r#"{"clear_policy": "abort_on_first_failure"}"#);

        let resolved =
            resolve_config_with(None, env_from(&[]), Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(resolved.source, ConfigSource::Xdg(path));
    }

    #[test]
    fn missing_explicit_path_is_error() {
        let err = resolve_config_with(
            Some(Path::new("/nonexistent/tablesink.json")),
            env_from(&[]),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::IoError(_)));
    }

    #[test]
    fn env_overrides_masters_and_log() {
        let env = env_from(&[(ENV_MASTERS, "m1:7051, m2:7051,,"), (ENV_LOG, "debug")]);
        let resolved = resolve_config_with(None, env, None).unwrap();
        assert_eq!(resolved.config.master_addresses, vec!["m1:7051", "m2:7051"]);
        assert_eq!(resolved.config.logging.level, "debug");
    }

    #[test]
    fn blank_masters_override_ignored() {
        let env = env_from(&[(ENV_MASTERS, " , ")]);
        let resolved = resolve_config_with(None, env, None).unwrap();
        assert_eq!(
            resolved.config.master_addresses,
            ConnectorConfig::default().master_addresses
        );
    }
}
