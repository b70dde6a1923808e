//! Configuration loading and resolution.
//!
//! Each field resolves from the command line first, then the environment,
//! then the TOML config file, then built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::types::{ZabbixError, ZabbixResult};

pub const ENV_URL: &str = "ZABBIX_URL";
pub const ENV_TOKEN: &str = "ZABBIX_API_TOKEN";
pub const ENV_TIMEOUT: &str = "ZABBIX_TIMEOUT";
pub const ENV_INSECURE: &str = "ZABBIX_INSECURE";
pub const ENV_CONFIG: &str = "ZABBIX_DEPS_CONFIG";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const LOCAL_CONFIG: &str = ".zabbix-deps.toml";

/// Settings needed to talk to one Zabbix server.
#[derive(Clone)]
pub struct ZabbixConfig {
    /// Full URL of `api_jsonrpc.php`.
    pub url: String,
    pub token: String,
    pub timeout: Duration,
    pub verify_tls: bool,
}

impl std::fmt::Debug for ZabbixConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZabbixConfig")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub insecure: bool,
}

/// On-disk config file layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub verify_tls: Option<bool>,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> ZabbixResult<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| ZabbixError::Config(format!("{}: {e}", path.display())))
    }
}

/// Resolve the config file path, if any applies.
///
/// An explicit path (flag or environment) must exist; the fallbacks are only
/// used when present.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    env: &dyn Fn(&str) -> Option<String>,
) -> ZabbixResult<Option<PathBuf>> {
    if let Some(path) = explicit {
        return existing(path.to_path_buf(), "--config");
    }

    if let Some(env_path) = env(ENV_CONFIG) {
        return existing(PathBuf::from(env_path), ENV_CONFIG);
    }

    let cwd_config = PathBuf::from(LOCAL_CONFIG);
    if cwd_config.exists() {
        return Ok(Some(cwd_config));
    }

    Ok(default_config_path().filter(|p| p.exists()))
}

fn existing(path: PathBuf, source: &str) -> ZabbixResult<Option<PathBuf>> {
    if !path.exists() {
        return Err(ZabbixError::Config(format!(
            "config file {} (from {source}) does not exist",
            path.display()
        )));
    }
    Ok(Some(path))
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("zabbix-deps").join("config.toml"))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

impl ZabbixConfig {
    /// Resolve against the process environment.
    pub fn load(overrides: ConfigOverrides) -> ZabbixResult<Self> {
        Self::resolve(overrides, &|key: &str| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup.
    pub fn resolve(
        overrides: ConfigOverrides,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> ZabbixResult<Self> {
        let file = match resolve_config_path(overrides.config_path.as_deref(), env)? {
            Some(path) => {
                tracing::debug!("Loading config file: {}", path.display());
                FileConfig::from_path(&path)?
            }
            None => FileConfig::default(),
        };

        let url = overrides
            .url
            .or_else(|| env(ENV_URL))
            .or(file.url)
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                ZabbixError::Config(format!("no API URL given (use --url or {ENV_URL})"))
            })?;

        let token = overrides
            .token
            .or_else(|| env(ENV_TOKEN))
            .or(file.token)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                ZabbixError::Config(format!("no API token given (use --token or {ENV_TOKEN})"))
            })?;

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => secs,
            None => match env(ENV_TIMEOUT) {
                Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                    ZabbixError::Config(format!("{ENV_TIMEOUT} must be whole seconds, got {raw:?}"))
                })?,
                None => file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            },
        };
        if timeout_secs == 0 {
            return Err(ZabbixError::Config("timeout must be at least 1 second".to_string()));
        }

        let insecure = if overrides.insecure {
            true
        } else if let Some(raw) = env(ENV_INSECURE) {
            parse_bool(&raw).ok_or_else(|| {
                ZabbixError::Config(format!("{ENV_INSECURE} must be a boolean, got {raw:?}"))
            })?
        } else {
            !file.verify_tls.unwrap_or(true)
        };

        Ok(Self {
            url: url.trim().to_string(),
            token: token.trim().to_string(),
            timeout: Duration::from_secs(timeout_secs),
            verify_tls: !insecure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_flags_win_over_env_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "url = \"https://file/api\"\ntoken = \"file-token\"\n");
        let env = env_from(&[(ENV_URL, "https://env/api"), (ENV_TOKEN, "env-token")]);
        let cfg = ZabbixConfig::resolve(
            ConfigOverrides {
                config_path: Some(path),
                url: Some("https://flag/api".into()),
                ..Default::default()
            },
            &env,
        )
        .unwrap();
        assert_eq!(cfg.url, "https://flag/api");
        assert_eq!(cfg.token, "env-token");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert!(cfg.verify_tls);
    }

    #[test]
    fn test_file_values_used_last() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "url = \"https://file/api\"\ntoken = \"t\"\ntimeout_secs = 5\nverify_tls = false\n",
        );
        let cfg = ZabbixConfig::resolve(
            ConfigOverrides {
                config_path: Some(path),
                ..Default::default()
            },
            &env_from(&[]),
        )
        .unwrap();
        assert_eq!(cfg.url, "https://file/api");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert!(!cfg.verify_tls);
    }

    #[test]
    fn test_env_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "url = \"https://file/api\"\ntoken = \"t\"\n");
        let path_str = path.display().to_string();
        let env = env_from(&[(ENV_CONFIG, path_str.as_str()), (ENV_TIMEOUT, "12")]);
        let cfg = ZabbixConfig::resolve(ConfigOverrides::default(), &env).unwrap();
        assert_eq!(cfg.url, "https://file/api");
        assert_eq!(cfg.timeout, Duration::from_secs(12));
    }

    #[test]
    fn test_missing_env_config_file_names_path() {
        let env = env_from(&[(ENV_URL, "https://env/api"), (ENV_TOKEN, "t"), (ENV_CONFIG, "/nonexistent/zbx.toml")]);
        let err = ZabbixConfig::resolve(ConfigOverrides::default(), &env).unwrap_err();
        assert!(matches!(err, ZabbixError::Config(_)));
        let msg = err.to_string();
        assert!(msg.contains("/nonexistent/zbx.toml"));
        assert!(msg.contains(ENV_CONFIG));
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let env = env_from(&[(ENV_URL, "https://env/api")]);
        let err = ZabbixConfig::resolve(ConfigOverrides::default(), &env).unwrap_err();
        assert!(matches!(err, ZabbixError::Config(_)));
        assert!(err.to_string().contains("no API token"));

        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "url = \"https://file/api\"\n");
        let err = ZabbixConfig::resolve(
            ConfigOverrides {
                config_path: Some(path),
                ..Default::default()
            },
            &env_from(&[]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("no API token"));
    }

    #[test]
    fn test_explicit_missing_file() {
        let err = ZabbixConfig::resolve(
            ConfigOverrides {
                config_path: Some(PathBuf::from("/definitely/not/here.toml")),
                ..Default::default()
            },
            &env_from(&[]),
        )
        .unwrap_err();
        assert!(matches!(err, ZabbixError::Config(_)));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "url = \"u\"\ntoken = \"t\"\napi_key = \"x\"\n");
        let err = FileConfig::from_path(&path).unwrap_err();
        assert!(matches!(err, ZabbixError::Config(_)));
    }

    #[test]
    fn test_file_disables_tls_with_verify_tls_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "url = \"u\"\ntoken = \"t\"\ninsecure = true\n");
        let err = FileConfig::from_path(&path).unwrap_err();
        assert!(err.to_string().contains("insecure"));

        let path = write_config(&dir, "url = \"u\"\ntoken = \"t\"\nverify_tls = false\n");
        assert_eq!(FileConfig::from_path(&path).unwrap().verify_tls, Some(false));
    }

    #[test]
    fn test_insecure_sources() {
        let env = env_from(&[(ENV_URL, "u"), (ENV_TOKEN, "t"), (ENV_INSECURE, "yes")]);
        let cfg = ZabbixConfig::resolve(ConfigOverrides::default(), &env).unwrap();
        assert!(!cfg.verify_tls);

        let env = env_from(&[(ENV_URL, "u"), (ENV_TOKEN, "t"), (ENV_INSECURE, "maybe")]);
        assert!(ZabbixConfig::resolve(ConfigOverrides::default(), &env).is_err());

        let env = env_from(&[(ENV_URL, "u"), (ENV_TOKEN, "t"), (ENV_TIMEOUT, "0")]);
        assert!(ZabbixConfig::resolve(ConfigOverrides::default(), &env).is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let env = env_from(&[(ENV_URL, "u"), (ENV_TOKEN, "s3cret")]);
        let cfg = ZabbixConfig::resolve(ConfigOverrides::default(), &env).unwrap();
        assert!(!format!("{cfg:?}").contains("s3cret"));
    }
}
