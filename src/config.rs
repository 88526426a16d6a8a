use std::path::{Path, PathBuf};
use std::{fs, io};

use chrono::Duration;
use serde::Deserialize;
use serde_with::{DurationSeconds, serde_as};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ConfigError {
    #[error("Failed to load {0}. error: {1}")]
    LoadFileError(PathBuf, io::ErrorKind),
    #[error(transparent)]
    TomlParseError(#[from] toml::de::Error),
    #[error("timeout must be greater than 0 seconds, but got {0} seconds")]
    InvalidTimeout(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ColorsConfig {
    /// プロキシ名の色
    #[serde(default = "ColorsConfig::default_title")]
    pub(crate) title: String,

    /// UP/OPENの色
    #[serde(default = "ColorsConfig::default_on")]
    pub(crate) on: String,

    /// DOWNの色
    #[serde(default = "ColorsConfig::default_off")]
    pub(crate) off: String,

    /// 文字属性 (bold, underline など)
    #[serde(default = "ColorsConfig::default_attr")]
    pub(crate) attr: String,
}

impl ColorsConfig {
    fn default_title() -> String {
        "blue".to_string()
    }

    fn default_on() -> String {
        "green".to_string()
    }

    fn default_off() -> String {
        "red".to_string()
    }

    fn default_attr() -> String {
        "normal".to_string()
    }
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            title: Self::default_title(),
            on: Self::default_on(),
            off: Self::default_off(),
            attr: Self::default_attr(),
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    /// URL/ソケットからの取得のタイムアウト(秒)
    /// デフォルトは5秒
    #[serde_as(as = "DurationSeconds<i64>")]
    #[serde(default = "Config::default_timeout")]
    pub(crate) timeout: Duration,

    /// 取得元の指定がない場合に使うstatsソケット
    #[serde(default)]
    pub(crate) socket: Option<PathBuf>,

    /// 色付けするかどうか
    /// デフォルトは有効
    #[serde(default = "Config::default_color")]
    pub(crate) color: bool,

    /// 配色
    #[serde(default)]
    pub(crate) colors: ColorsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: Self::default_timeout(),
            socket: None,
            color: Self::default_color(),
            colors: ColorsConfig::default(),
        }
    }
}
impl Config {
    pub(crate) fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFileError(path.to_path_buf(), e.kind()))?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::TomlParseError)?;
        if config.timeout <= Duration::zero() {
            return Err(ConfigError::InvalidTimeout(config.timeout.num_seconds()));
        }
        Ok(config)
    }

    /// 設定ファイルが指定されていればそれを、なければデフォルト値を使う
    pub(crate) fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub(crate) fn timeout(&self) -> std::time::Duration {
        // loadで正の値であることを確認済み
        self.timeout.to_std().unwrap_or_default()
    }

    /// デフォルトのタイムアウト
    const fn default_timeout() -> Duration {
        Duration::seconds(5)
    }

    const fn default_color() -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_load() {
        // [正常系] 有効なTOMLファイルを読み込む
        let temp_file = write_config(
            r#"
timeout = 10
socket = "/var/run/haproxy/admin.sock"
color = false
"#,
        );
        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.timeout, Duration::seconds(10));
        assert_eq!(
            config.socket,
            Some(PathBuf::from("/var/run/haproxy/admin.sock"))
        );
        assert!(!config.color);
        assert_eq!(config.timeout(), std::time::Duration::from_secs(10));
        assert_eq!(config.colors, ColorsConfig::default()); // デフォルト値

        // [正常系] 配色の一部だけ指定する
        let temp_file = write_config(
            r#"
[colors]
title = "cyan"
attr = "bold"
"#,
        );
        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.colors.title, "cyan");
        assert_eq!(config.colors.attr, "bold");
        assert_eq!(config.colors.on, "green"); // デフォルト値
        assert_eq!(config.colors.off, "red"); // デフォルト値

        // [正常系] 空のファイルはデフォルト値になる
        let temp_file = write_config("");
        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.timeout, Duration::seconds(5)); // デフォルト値
        assert!(config.color); // デフォルト値

        // [異常系] 存在しないファイルを読み込む
        let result = Config::load("/path/to/non/existent/file.toml");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::LoadFileError(_, io::ErrorKind::NotFound)
        ));

        // [異常系] 無効なTOMLファイルを読み込む
        let temp_file = write_config(
            r#"
invalid toml content
[unclosed section
"#,
        );
        assert!(matches!(
            Config::load(temp_file.path()).unwrap_err(),
            ConfigError::TomlParseError(_)
        ));

        // [異常系] 未知のキー
        let temp_file = write_config("colour = true\n");
        assert!(matches!(
            Config::load(temp_file.path()).unwrap_err(),
            ConfigError::TomlParseError(_)
        ));

        // [異常系] タイムアウトが0秒
        let temp_file = write_config("timeout = 0\n");
        assert_eq!(
            Config::load(temp_file.path()).unwrap_err(),
            ConfigError::InvalidTimeout(0)
        );
    }

    #[test]
    fn test_load_or_default() {
        // [正常系] 指定なし
        let config = Config::load_or_default(None).unwrap();
        assert_eq!(config, Config::default());

        // [正常系] 指定あり
        let temp_file = write_config("timeout = 2\n");
        let config = Config::load_or_default(Some(temp_file.path())).unwrap();
        assert_eq!(config.timeout, Duration::seconds(2));

        // [異常系] 指定されたファイルがない
        assert!(Config::load_or_default(Some(Path::new("/nonexistent/hastatus.toml"))).is_err());
    }
}
