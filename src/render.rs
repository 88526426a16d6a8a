use std::io::{self, Write};

use hastats::{Proxy, StatusTable};
use thiserror::Error;

use crate::cli::Cli;
use crate::color::StatusPalette;

/// BACKEND行がないときに表示するステータス
const UNKNOWN_STATUS: &str = "?";

#[derive(Debug, Error)]
pub(crate) enum RenderError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// 出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputMode {
    /// プロキシごとにタイトル行とサーバー行
    Lines,
    /// テーブル全体をYAMLで
    Yaml,
    /// 取得したCSVをそのまま
    Csv,
}
impl From<&Cli> for OutputMode {
    fn from(value: &Cli) -> Self {
        if value.yaml {
            OutputMode::Yaml
        } else if value.csv {
            OutputMode::Csv
        } else {
            OutputMode::Lines
        }
    }
}

pub(crate) struct Renderer {
    palette: StatusPalette,
}

impl Renderer {
    pub(crate) fn new(palette: StatusPalette) -> Self {
        Self { palette }
    }

    /// `<プロキシ名> (<BACKENDのstatus>)`
    pub(crate) fn title_line(&self, pxname: &str, proxy: &Proxy) -> String {
        let status = proxy.backend_status().unwrap_or(UNKNOWN_STATUS);
        format!(
            "{} ({})",
            self.palette.title(pxname),
            self.palette.colorize(status)
        )
    }

    /// 集計行を除くサーバーを `<svname> (<status>/<check_status>) ` の形で1行に並べる
    pub(crate) fn servers_line(&self, proxy: &Proxy) -> String {
        proxy
            .real_servers()
            .map(|(name, stats)| {
                format!(
                    "{} ({}/{}) ",
                    stats.svname().unwrap_or(name),
                    self.palette.colorize(stats.status().unwrap_or_default()),
                    self.palette.colorize(stats.check_status().unwrap_or_default()),
                )
            })
            .collect()
    }

    pub(crate) fn write_lines(&self, table: &StatusTable, out: &mut impl Write) -> io::Result<()> {
        for (pxname, proxy) in table.proxies() {
            writeln!(out, "{}", self.title_line(pxname, proxy))?;
            writeln!(out, "{}", self.servers_line(proxy))?;
        }
        Ok(())
    }

    /// 色付けせずにテーブル全体を書き出す
    pub(crate) fn write_yaml(
        &self,
        table: &StatusTable,
        out: &mut impl Write,
    ) -> Result<(), RenderError> {
        let yaml = serde_yaml_ng::to_string(table)?;
        writeln!(out, "{yaml}")?;
        Ok(())
    }

    pub(crate) fn write_raw(&self, csv: &str, out: &mut impl Write) -> io::Result<()> {
        out.write_all(csv.as_bytes())?;
        if !csv.ends_with('\n') {
            out.write_all(b"\n")?;
        }
        Ok(())
    }
}
