use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(version, about = "Summarize HAProxy proxy/server status from its CSV stats feed")]
pub(crate) struct Cli {
    /// 診断出力の詳細度 (0-3)
    #[arg(long, short, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=3))]
    pub(crate) debug: u8,

    /// HTTP(S)の統計ページからCSVを取得する
    #[arg(long, short)]
    pub(crate) url: Option<String>,

    /// HAProxyのstatsソケットからCSVを取得する
    #[arg(long, short)]
    pub(crate) socket: Option<PathBuf>,

    /// ファイルからCSVを読み込む
    #[arg(long, short)]
    pub(crate) file: Option<PathBuf>,

    /// YAMLで出力する
    #[arg(long, short, conflicts_with = "csv")]
    pub(crate) yaml: bool,

    /// 取得したCSVをそのまま出力する
    #[arg(long, short)]
    pub(crate) csv: bool,

    /// 色付けしない
    #[arg(long, short)]
    pub(crate) no_color: bool,

    /// カラーチャートを表示して終了する
    #[arg(long)]
    pub(crate) color_chart: bool,

    /// 設定ファイル (TOML)
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
}
impl Cli {
    pub(crate) fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// `--debug` の値をログレベルに変換する
    pub(crate) fn log_level(&self) -> LevelFilter {
        match self.debug {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// 設定ファイルで有効かつ `--no-color` が指定されていなければ色付けする
    pub(crate) fn color_enabled(&self, config: &Config) -> bool {
        config.color && !self.no_color
    }
}
