use std::io;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::time::timeout;

use crate::cli::Cli;
use crate::config::Config;

/// statsソケットに送るコマンド
const SHOW_STAT: &[u8] = b"show stat\n";

#[derive(Debug, Error)]
pub(crate) enum FetchError {
    #[error("Failed to read {0}. error: {1}")]
    ReadFile(PathBuf, io::ErrorKind),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{0} responded with HTTP status {1}")]
    HttpStatus(String, u16),
    #[error("Failed to query stats socket {0}. error: {1}")]
    Socket(PathBuf, io::ErrorKind),
    #[error("Stats source did not respond within {0:?}")]
    Timeout(Duration),
    #[error("No stats source specified. Use --file, --url or --socket")]
    NoSource,
}

/// CSVテキストの取得元
#[async_trait]
pub(crate) trait StatsSource: Send + Sync {
    async fn fetch(&self) -> Result<String, FetchError>;

    /// ログ用の取得元の説明
    fn describe(&self) -> String;
}

pub(crate) struct FileSource {
    path: PathBuf,
}
impl FileSource {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}
#[async_trait]
impl StatsSource for FileSource {
    async fn fetch(&self) -> Result<String, FetchError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| FetchError::ReadFile(self.path.clone(), e.kind()))
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// HTTP(S)の統計ページ (`;csv` 付きのURL)
pub(crate) struct UrlSource {
    url: String,
    timeout: Duration,
}
impl UrlSource {
    pub(crate) fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    fn map_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Http(e)
        }
    }
}
#[async_trait]
impl StatsSource for UrlSource {
    async fn fetch(&self) -> Result<String, FetchError> {
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;
        let response = client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        debug!("{} responded with {status}", self.url);
        if !status.is_success() {
            return Err(FetchError::HttpStatus(self.url.clone(), status.as_u16()));
        }

        response.text().await.map_err(|e| self.map_error(e))
    }

    fn describe(&self) -> String {
        format!("url {}", self.url)
    }
}

/// HAProxyのstatsソケット
///
/// `show stat` を送り、相手が接続を閉じるまで読み込む。
pub(crate) struct SocketSource {
    path: PathBuf,
    timeout: Duration,
}
impl SocketSource {
    pub(crate) fn new(path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            path: path.into(),
            timeout,
        }
    }

    async fn query(&self) -> io::Result<String> {
        let mut stream = UnixStream::connect(&self.path).await?;
        stream.write_all(SHOW_STAT).await?;
        stream.flush().await?;

        let mut csv = String::new();
        stream.read_to_string(&mut csv).await?;
        Ok(csv)
    }
}
#[async_trait]
impl StatsSource for SocketSource {
    async fn fetch(&self) -> Result<String, FetchError> {
        timeout(self.timeout, self.query())
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))?
            .map_err(|e| FetchError::Socket(self.path.clone(), e.kind()))
    }

    fn describe(&self) -> String {
        format!("socket {}", self.path.display())
    }
}

/// 取得元を1つ選ぶ
///
/// 優先順位: `--file` > `--url` > `--socket` > 設定ファイルの `socket`
pub(crate) fn select_source(
    cli: &Cli,
    config: &Config,
) -> Result<Box<dyn StatsSource>, FetchError> {
    let source: Box<dyn StatsSource> = if let Some(path) = &cli.file {
        Box::new(FileSource::new(path))
    } else if let Some(url) = &cli.url {
        Box::new(UrlSource::new(url, config.timeout()))
    } else if let Some(path) = cli.socket.as_ref().or(config.socket.as_ref()) {
        Box::new(SocketSource::new(path, config.timeout()))
    } else {
        return Err(FetchError::NoSource);
    };

    info!("reading stats from {}", source.describe());
    Ok(source)
}
