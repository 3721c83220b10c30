//! Configuration layering
//!
//! Settings come from three layers, each a [`PartialConfig`]: the
//! `prism_central.ini` file, `PC_*` environment variables and command-line
//! flags. Later layers win; empty strings never override. The merged layers
//! are validated once into an immutable [`Config`].

use std::fmt;
use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::CoreError;
use crate::literal::parse_literal;
use crate::runner::Mode;

/// INI section holding every setting
pub const INI_SECTION: &str = "prism_central";

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "prism_central.ini";

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV: &str = "PCINV_CONFIG";

pub const ENV_IP_ADDR: &str = "PC_IP_ADDR";
pub const ENV_USERNAME: &str = "PC_USERNAME";
pub const ENV_PASSWORD: &str = "PC_PASSWORD";

/// One configuration layer; unset fields defer to lower layers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialConfig {
    pub ip_addr: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub cache_path: Option<PathBuf>,
    pub cache_max_age: Option<u64>,
    pub group_variables: Option<Map<String, Value>>,
}

impl PartialConfig {
    /// Parse the `[prism_central]` section of an INI document
    ///
    /// # Errors
    /// Returns an error if the document does not parse, `cache_max_age` is
    /// not an integer or `group_variables` is not a mapping.
    pub fn from_ini_str(content: &str) -> Result<Self, CoreError> {
        // values are taken verbatim, quotes and backslashes included
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(content, options).map_err(|e| CoreError::ConfigFile {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })?;
        let Some(section) = ini.section(Some(INI_SECTION)) else {
            return Ok(Self::default());
        };

        let text = |key: &str| section.get(key).map(str::to_string);

        // negative ages mean always stale
        let cache_max_age = section
            .get("cache_max_age")
            .map(|v| {
                v.trim()
                    .parse::<i64>()
                    .map(|age| u64::try_from(age).unwrap_or(0))
                    .map_err(|e| CoreError::InvalidConfig {
                        key: "cache_max_age".to_string(),
                        reason: e.to_string(),
                    })
            })
            .transpose()?;

        let group_variables = section
            .get("group_variables")
            .map(parse_group_variables)
            .transpose()?;

        Ok(Self {
            ip_addr: text("ip_addr"),
            username: text("username"),
            password: text("password"),
            cache_path: text("cache_path").map(PathBuf::from),
            cache_max_age,
            group_variables,
        })
    }

    /// Read and parse an INI file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or does not parse.
    pub fn from_ini_file(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::ConfigFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), "loaded configuration file");
        Self::from_ini_str(&content).map_err(|e| match e {
            CoreError::ConfigFile { reason, .. } => CoreError::ConfigFile {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Layer built from `PC_IP_ADDR`, `PC_USERNAME` and `PC_PASSWORD`
    pub fn from_env_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut layer = Self::default();
        for (key, value) in vars {
            let slot = match key.as_ref() {
                ENV_IP_ADDR => &mut layer.ip_addr,
                ENV_USERNAME => &mut layer.username,
                ENV_PASSWORD => &mut layer.password,
                _ => continue,
            };
            *slot = Some(value.into());
        }
        layer
    }

    /// Layer built from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_vars(std::env::vars())
    }

    /// Overlay `other` on `self`; set, non-empty fields of `other` win
    #[must_use]
    pub fn merge(self, other: PartialConfig) -> PartialConfig {
        PartialConfig {
            ip_addr: pick(self.ip_addr, other.ip_addr),
            username: pick(self.username, other.username),
            password: pick(self.password, other.password),
            cache_path: other
                .cache_path
                .filter(|p| !p.as_os_str().is_empty())
                .or(self.cache_path),
            cache_max_age: other.cache_max_age.or(self.cache_max_age),
            group_variables: other.group_variables.or(self.group_variables),
        }
    }
}

fn pick(lower: Option<String>, higher: Option<String>) -> Option<String> {
    higher.filter(|v| !v.is_empty()).or(lower.filter(|v| !v.is_empty()))
}

fn parse_group_variables(raw: &str) -> Result<Map<String, Value>, CoreError> {
    let invalid = |reason: String| CoreError::InvalidConfig {
        key: "group_variables".to_string(),
        reason,
    };
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(_) => parse_literal(raw).map_err(|e| invalid(e.to_string()))?,
    };
    match value {
        Value::Object(map) => Ok(map),
        other => Err(invalid(format!("expected a mapping, got {other}"))),
    }
}

/// Locate the INI file
///
/// An explicit path (flag, then `PCINV_CONFIG`) is returned as is, so that a
/// missing file is reported. Otherwise the first existing default location
/// is used: beside the executable, the working directory, then the user
/// configuration directory.
#[must_use]
pub fn find_config_file(explicit: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path);
    }
    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        return Some(PathBuf::from(path));
    }

    let candidates = [
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME))),
        Some(PathBuf::from(CONFIG_FILE_NAME)),
        dirs::config_dir().map(|dir| dir.join("pcinv").join(CONFIG_FILE_NAME)),
    ];
    candidates.into_iter().flatten().find(|p| p.is_file())
}

/// Address and credentials of the Prism Central appliance
#[derive(Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub ip_addr: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("ip_addr", &self.ip_addr)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Per-run switches taken from the command line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunOptions {
    pub mode: Mode,
    pub force_cache: bool,
    pub refresh_cache: bool,
    pub pretty: bool,
}

/// Resolved configuration, fixed for the whole run
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub endpoint: Endpoint,
    pub cache_path: PathBuf,
    /// Seconds a cache file stays fresh after its last write
    pub cache_max_age: u64,
    /// Variables attached to the `all` group
    pub group_variables: Map<String, Value>,
    pub options: RunOptions,
}

impl Config {
    /// Validate merged layers into a configuration
    ///
    /// # Errors
    /// Returns `MissingConfig` naming the first absent of address, username
    /// and password.
    pub fn resolve(merged: PartialConfig, options: RunOptions) -> Result<Self, CoreError> {
        let ip_addr = merged.ip_addr.ok_or(CoreError::MissingConfig {
            key: "ip_addr",
            flag: "--ip-addr (-i)",
            env: ENV_IP_ADDR,
        })?;
        let username = merged.username.ok_or(CoreError::MissingConfig {
            key: "username",
            flag: "--username (-u)",
            env: ENV_USERNAME,
        })?;
        let password = merged.password.ok_or(CoreError::MissingConfig {
            key: "password",
            flag: "--password (-p)",
            env: ENV_PASSWORD,
        })?;

        Ok(Self {
            endpoint: Endpoint {
                ip_addr,
                username,
                password,
            },
            cache_path: merged.cache_path.unwrap_or_else(|| PathBuf::from(".")),
            cache_max_age: merged.cache_max_age.unwrap_or(0),
            group_variables: merged.group_variables.unwrap_or_default(),
            options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    const INI: &str = r#"
[prism_central]
ip_addr = 10.0.0.10
username = ini-user
password = ini-pass
cache_path = /var/cache/pcinv
cache_max_age = 300
group_variables = {"ansible_user": "centos", "ansible_port": 22}
"#;

    fn cli(ip: Option<&str>) -> PartialConfig {
        PartialConfig {
            ip_addr: ip.map(str::to_string),
            ..PartialConfig::default()
        }
    }

    #[test]
    fn test_ini_layer() {
        let layer = PartialConfig::from_ini_str(INI).unwrap();
        assert_eq!(layer.ip_addr.as_deref(), Some("10.0.0.10"));
        assert_eq!(layer.username.as_deref(), Some("ini-user"));
        assert_eq!(layer.cache_path, Some(PathBuf::from("/var/cache/pcinv")));
        assert_eq!(layer.cache_max_age, Some(300));
        let vars = layer.group_variables.unwrap();
        assert_eq!(vars["ansible_user"], json!("centos"));
        assert_eq!(vars["ansible_port"], json!(22));
    }

    #[test]
    fn test_ini_without_section() {
        let layer = PartialConfig::from_ini_str("[other]\nip_addr = 1.2.3.4\n").unwrap();
        assert_eq!(layer, PartialConfig::default());
    }

    #[rstest]
    #[case("[prism_central]\ncache_max_age = soon\n", "cache_max_age")]
    #[case("[prism_central]\ngroup_variables = [1, 2]\n", "group_variables")]
    #[case("[prism_central]\ngroup_variables = {'a': open('x')}\n", "group_variables")]
    #[case("[prism_central]\ngroup_variables = ansible_user=root\n", "group_variables")]
    fn test_ini_invalid_values(#[case] content: &str, #[case] expected_key: &str) {
        match PartialConfig::from_ini_str(content) {
            Err(CoreError::InvalidConfig { key, .. }) => assert_eq!(key, expected_key),
            other => panic!("expected invalid {expected_key}, got {other:?}"),
        }
    }

    #[test]
    fn test_python_group_variables() {
        let layer = PartialConfig::from_ini_str(
            "[prism_central]\nip_addr = 10.0.0.10\n\
             group_variables = {'ansible_user': 'root', 'ansible_become': True}\n",
        )
        .unwrap();
        assert_eq!(layer.ip_addr.as_deref(), Some("10.0.0.10"));
        assert_eq!(
            Value::Object(layer.group_variables.unwrap()),
            json!({"ansible_user": "root", "ansible_become": true})
        );
    }

    #[rstest]
    #[case("300", 300)]
    #[case(" 0 ", 0)]
    #[case("-1", 0)]
    #[case("-3600", 0)]
    fn test_cache_max_age_values(#[case] raw: &str, #[case] expected: u64) {
        let layer =
            PartialConfig::from_ini_str(&format!("[prism_central]\ncache_max_age = {raw}\n"))
                .unwrap();
        assert_eq!(layer.cache_max_age, Some(expected));
    }

    #[test]
    fn test_env_layer_ignores_other_vars() {
        let layer = PartialConfig::from_env_vars([
            ("PC_IP_ADDR", "10.0.0.20"),
            ("PC_USERNAME", "env-user"),
            ("HOME", "/root"),
        ]);
        assert_eq!(layer.ip_addr.as_deref(), Some("10.0.0.20"));
        assert_eq!(layer.username.as_deref(), Some("env-user"));
        assert_eq!(layer.password, None);
    }

    #[rstest]
    #[case(None, None, Some("1.1.1.1"), "1.1.1.1")]
    #[case(Some("2.2.2.2"), None, Some("1.1.1.1"), "2.2.2.2")]
    #[case(Some("2.2.2.2"), Some("3.3.3.3"), Some("1.1.1.1"), "3.3.3.3")]
    #[case(Some(""), Some(""), Some("1.1.1.1"), "1.1.1.1")]
    #[case(None, Some("3.3.3.3"), None, "3.3.3.3")]
    fn test_precedence(
        #[case] env_ip: Option<&str>,
        #[case] cli_ip: Option<&str>,
        #[case] ini_ip: Option<&str>,
        #[case] expected: &str,
    ) {
        let ini = cli(ini_ip);
        let env = PartialConfig::from_env_vars(env_ip.map(|ip| ("PC_IP_ADDR", ip)));
        let merged = ini.merge(env).merge(cli(cli_ip));
        assert_eq!(merged.ip_addr.as_deref(), Some(expected));
    }

    #[test]
    fn test_cli_cache_settings_win() {
        let ini = PartialConfig::from_ini_str(INI).unwrap();
        let flags = PartialConfig {
            cache_path: Some(PathBuf::from("/tmp")),
            cache_max_age: Some(5),
            ..PartialConfig::default()
        };
        let merged = ini.merge(flags);
        assert_eq!(merged.cache_path, Some(PathBuf::from("/tmp")));
        assert_eq!(merged.cache_max_age, Some(5));
        assert_eq!(merged.username.as_deref(), Some("ini-user"));
    }

    #[test]
    fn test_resolve_defaults() {
        let merged = PartialConfig::from_env_vars([
            ("PC_IP_ADDR", "10.0.0.10"),
            ("PC_USERNAME", "admin"),
            ("PC_PASSWORD", "secret"),
        ]);
        let config = Config::resolve(merged, RunOptions::default()).unwrap();
        assert_eq!(config.cache_path, PathBuf::from("."));
        assert_eq!(config.cache_max_age, 0);
        assert!(config.group_variables.is_empty());
        assert_eq!(config.options.mode, Mode::List);
    }

    #[rstest]
    #[case(&[("PC_USERNAME", "u"), ("PC_PASSWORD", "p")], "ip_addr")]
    #[case(&[("PC_IP_ADDR", "i"), ("PC_PASSWORD", "p")], "username")]
    #[case(&[("PC_IP_ADDR", "i"), ("PC_USERNAME", "u")], "password")]
    fn test_resolve_missing(#[case] vars: &[(&str, &str)], #[case] missing: &str) {
        let merged = PartialConfig::from_env_vars(vars.iter().copied());
        match Config::resolve(merged, RunOptions::default()) {
            Err(CoreError::MissingConfig { key, .. }) => assert_eq!(key, missing),
            other => panic!("expected missing {missing}, got {other:?}"),
        }
    }

    #[test]
    fn test_endpoint_debug_hides_password() {
        let endpoint = Endpoint {
            ip_addr: "10.0.0.10".to_string(),
            username: "admin".to_string(),
            password: "secret".to_string(),
        };
        assert!(!format!("{endpoint:?}").contains("secret"));
    }

    #[test]
    fn test_explicit_config_path_is_kept() {
        let path = PathBuf::from("/nonexistent/prism_central.ini");
        assert_eq!(find_config_file(Some(path.clone())), Some(path));
    }
}
