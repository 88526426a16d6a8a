use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::Serialize;

use crate::field::{FIELD_COUNT, FIELDS, PROXY_NAME, SERVER_NAME};

/// フロントエンド集計行のサーバー名
pub const FRONTEND: &str = "FRONTEND";

/// バックエンド集計行のサーバー名
pub const BACKEND: &str = "BACKEND";

/// 実サーバーではなくプロキシ単位の集計行かどうか
pub fn is_aggregate(svname: &str) -> bool {
    svname == FRONTEND || svname == BACKEND
}

/// 1サーバー分の統計値 (列名 -> 生の文字列値)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ServerStats(BTreeMap<&'static str, String>);
impl ServerStats {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn svname(&self) -> Option<&str> {
        self.get(SERVER_NAME.name)
    }

    pub fn status(&self) -> Option<&str> {
        self.get("status")
    }

    pub fn check_status(&self) -> Option<&str> {
        self.get("check_status")
    }

    /// 列名順に走査する
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 1プロキシ分のサーバー群 (サーバー名 -> 統計値)
///
/// `FRONTEND`/`BACKEND` の集計行もここに含まれる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Proxy(BTreeMap<String, ServerStats>);
impl Proxy {
    pub fn server(&self, svname: &str) -> Option<&ServerStats> {
        self.0.get(svname)
    }

    /// 集計行を含む全サーバーをサーバー名順に走査する
    pub fn servers(&self) -> btree_map::Iter<'_, String, ServerStats> {
        self.0.iter()
    }

    /// 集計行を除いた実サーバーのみをサーバー名順に走査する
    pub fn real_servers(&self) -> impl Iterator<Item = (&str, &ServerStats)> {
        self.0
            .iter()
            .filter(|(name, _)| !is_aggregate(name))
            .map(|(name, stats)| (name.as_str(), stats))
    }

    pub fn frontend(&self) -> Option<&ServerStats> {
        self.server(FRONTEND)
    }

    pub fn backend(&self) -> Option<&ServerStats> {
        self.server(BACKEND)
    }

    /// `BACKEND` 行のstatus
    pub fn backend_status(&self) -> Option<&str> {
        self.backend().and_then(ServerStats::status)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// パース時に読み捨てた行の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// 取り込んだ行数
    pub rows: usize,

    /// `#` または `pxname` で始まるヘッダー行の数
    pub skipped_headers: usize,

    /// 列数不足で読み捨てた行の数
    pub skipped_short: usize,
}

/// `show stat` のスナップショット (プロキシ名 -> サーバー名 -> 列名 -> 値)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusTable(BTreeMap<String, Proxy>);

impl StatusTable {
    /// CSVテキストをパースする
    ///
    /// ヘッダー行と列数が足りない行は黙って読み捨てる。
    /// 同じプロキシ名/サーバー名の行が複数ある場合は後の行の値で上書きされる。
    pub fn parse(csv: &str) -> Self {
        Self::parse_with_report(csv).0
    }

    pub fn parse_with_report(csv: &str) -> (Self, ParseReport) {
        let mut table = StatusTable::default();
        let mut report = ParseReport::default();

        for line in csv.lines() {
            if line.is_empty() {
                continue;
            }
            if is_comment(line) || is_header(line) {
                report.skipped_headers += 1;
                continue;
            }

            let row: Vec<&str> = line.split(',').collect();
            if row.len() < FIELD_COUNT {
                report.skipped_short += 1;
                continue;
            }

            table.insert_row(&row);
            report.rows += 1;
        }

        (table, report)
    }

    fn insert_row(&mut self, row: &[&str]) {
        let server = self
            .0
            .entry(row[PROXY_NAME.index].to_string())
            .or_default()
            .0
            .entry(row[SERVER_NAME.index].to_string())
            .or_default();

        for field in &FIELDS {
            server.0.insert(field.name, row[field.index].to_string());
        }
    }

    pub fn proxy(&self, pxname: &str) -> Option<&Proxy> {
        self.0.get(pxname)
    }

    pub fn server(&self, pxname: &str, svname: &str) -> Option<&ServerStats> {
        self.proxy(pxname).and_then(|proxy| proxy.server(svname))
    }

    /// プロキシ名順に走査する
    pub fn proxies(&self) -> btree_map::Iter<'_, String, Proxy> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl From<&str> for StatusTable {
    fn from(value: &str) -> Self {
        StatusTable::parse(value)
    }
}

/// `# pxname,svname,...` 形式のヘッダー
fn is_comment(line: &str) -> bool {
    line.starts_with('#')
}

/// `pxname,svname,...` 形式のヘッダー
fn is_header(line: &str) -> bool {
    line.starts_with(PROXY_NAME.name)
}
