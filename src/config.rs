use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::gateway::DEFAULT_API_URL;

/// Environment variable consulted when no flag sets the content API URL.
pub const API_URL_ENV: &str = "FOLIO_API_URL";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub debug: bool,
}

impl ConfigFlags {
    /// Merge two flag sets; values in `other` win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            api_url: other.api_url.clone().or_else(|| self.api_url.clone()),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
            debug: self.debug || other.debug,
        }
    }
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub timeout: Duration,
    pub log_file: PathBuf,
    pub debug: bool,
}

impl Settings {
    /// Fill in defaults for everything `flags` leaves unset.
    ///
    /// `env_api_url` is the value of [`API_URL_ENV`], used only when no flag
    /// names a URL.
    pub fn resolve(flags: &ConfigFlags, env_api_url: Option<String>) -> Self {
        let api_url = flags
            .api_url
            .clone()
            .or_else(|| env_api_url.filter(|url| !url.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self {
            api_url,
            timeout: flags
                .timeout_secs
                .map_or(DEFAULT_TIMEOUT, Duration::from_secs),
            log_file: flags.log_file.clone().unwrap_or_else(default_log_file),
            debug: flags.debug,
        }
    }
}

pub fn default_log_file() -> PathBuf {
    std::env::temp_dir().join("folio.log")
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("folio").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("folio")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("folio").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("folio")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".foliorc")
}

/// Read flags from a config file. A missing file yields no flags.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Write `flags` to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# folio defaults (saved with --save)".to_string());
    if let Some(url) = &flags.api_url {
        lines.push(format!("--api-url {url}"));
    }
    if let Some(secs) = flags.timeout_secs {
        lines.push(format!("--timeout {secs}"));
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file {}", path.display()));
    }
    if flags.debug {
        lines.push("--debug".to_string());
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove a saved config file if present.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the known flags out of CLI-style tokens, ignoring everything else.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--debug" {
            flags.debug = true;
        } else if token == "--api-url" {
            if let Some(next) = tokens.get(i + 1) {
                flags.api_url = Some(next.clone());
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--api-url=") {
            flags.api_url = Some(value.to_string());
        } else if token == "--timeout" {
            if let Some(next) = tokens.get(i + 1) {
                flags.timeout_secs = parse_timeout(next);
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--timeout=") {
            flags.timeout_secs = parse_timeout(value);
        } else if token == "--log-file" {
            if let Some(next) = tokens.get(i + 1) {
                flags.log_file = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--log-file=") {
            flags.log_file = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}

fn parse_timeout(s: &str) -> Option<u64> {
    s.parse().ok().filter(|secs| *secs > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "folio".to_string(),
            "--api-url".to_string(),
            "http://pages.local:8080".to_string(),
            "--timeout=5".to_string(),
            "--log-file".to_string(),
            "folio.log".to_string(),
            "--debug".to_string(),
            "--save".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert_eq!(flags.api_url.as_deref(), Some("http://pages.local:8080"));
        assert_eq!(flags.timeout_secs, Some(5));
        assert_eq!(flags.log_file, Some(PathBuf::from("folio.log")));
        assert!(flags.debug);
    }

    #[test]
    fn test_invalid_timeout_is_ignored() {
        let args = vec!["--timeout".to_string(), "soon".to_string()];
        assert_eq!(parse_flag_tokens(&args).timeout_secs, None);
        let args = vec!["--timeout=0".to_string()];
        assert_eq!(parse_flag_tokens(&args).timeout_secs, None);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            api_url: Some("http://file".to_string()),
            timeout_secs: Some(30),
            debug: true,
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            api_url: Some("http://cli".to_string()),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert_eq!(merged.api_url.as_deref(), Some("http://cli"));
        assert_eq!(merged.timeout_secs, Some(30));
        assert!(merged.debug);
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::resolve(&ConfigFlags::default(), None);
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.timeout, DEFAULT_TIMEOUT);
        assert_eq!(settings.log_file, default_log_file());
        assert!(!settings.debug);
    }

    #[test]
    fn test_settings_env_url_only_when_no_flag() {
        let from_env = Settings::resolve(
            &ConfigFlags::default(),
            Some("http://env.local".to_string()),
        );
        assert_eq!(from_env.api_url, "http://env.local");

        let flags = ConfigFlags {
            api_url: Some("http://flag.local".to_string()),
            timeout_secs: Some(3),
            ..ConfigFlags::default()
        };
        let from_flag = Settings::resolve(&flags, Some("http://env.local".to_string()));
        assert_eq!(from_flag.api_url, "http://flag.local");
        assert_eq!(from_flag.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_blank_env_url_falls_back_to_default() {
        let settings = Settings::resolve(&ConfigFlags::default(), Some("  ".to_string()));
        assert_eq!(settings.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config");
        let flags = ConfigFlags {
            api_url: Some("http://pages.local".to_string()),
            timeout_secs: Some(20),
            log_file: Some(PathBuf::from("/tmp/folio-test.log")),
            debug: true,
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }
}
