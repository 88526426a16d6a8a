use std::io::Write;

use anyhow::Result;
use hastats::StatusTable;
use log::{debug, warn};

use crate::fetch::StatsSource;
use crate::render::{OutputMode, Renderer};

/// 1回分の取得、パース、出力を行う
pub(crate) async fn run_report(
    source: &dyn StatsSource,
    mode: OutputMode,
    renderer: &Renderer,
    out: &mut impl Write,
) -> Result<()> {
    let csv = source.fetch().await?;
    debug!("fetched {} bytes from {}", csv.len(), source.describe());

    if mode == OutputMode::Csv {
        renderer.write_raw(&csv, out)?;
    } else {
        let (table, report) = StatusTable::parse_with_report(&csv);
        debug!(
            "parsed {} rows into {} proxies (headers skipped: {}, short rows skipped: {})",
            report.rows,
            table.len(),
            report.skipped_headers,
            report.skipped_short
        );
        if table.is_empty() {
            warn!("no proxy rows found in {}", source.describe());
        }

        match mode {
            OutputMode::Yaml => renderer.write_yaml(&table, out)?,
            _ => renderer.write_lines(&table, out)?,
        }
    }
    // バッファに残った分の書き込み失敗もここで拾う
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use hastats::FIELD_COUNT;
    use mockall::mock;

    use super::*;
    use crate::color::StatusPalette;
    use crate::fetch::FetchError;

    // テスト用のモック構造体
    mock! {
        Source {}

        #[async_trait]
        impl StatsSource for Source {
            async fn fetch(&self) -> Result<String, FetchError>;
            fn describe(&self) -> String;
        }
    }

    fn server_line(pxname: &str, svname: &str, status: &str, check_status: &str) -> String {
        let mut row = vec![String::new(); FIELD_COUNT];
        row[0] = pxname.to_string();
        row[1] = svname.to_string();
        row[17] = status.to_string();
        row[36] = check_status.to_string();
        row.join(",")
    }

    fn mock_source(csv: String) -> MockSource {
        let mut source = MockSource::new();
        source.expect_fetch().times(1).return_once(move || Ok(csv));
        source
            .expect_describe()
            .returning(|| "mock".to_string());
        source
    }

    fn plain() -> Renderer {
        Renderer::new(StatusPalette::default().with_enabled(false))
    }

    #[tokio::test]
    async fn test_run_report() {
        let csv = format!(
            "# pxname,svname\n{}\n{}\nweb,short\n",
            server_line("web", "srv1", "UP", "L7OK"),
            server_line("web", "srv2", "DOWN", "L4CON"),
        );

        // [正常系] 行形式
        let source = mock_source(csv.clone());
        let mut out = Vec::new();
        run_report(&source, OutputMode::Lines, &plain(), &mut out)
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "web (?)\nsrv1 (UP/L7OK) srv2 (DOWN/L4CON) \n"
        );

        // [正常系] YAML
        let source = mock_source(csv.clone());
        let mut out = Vec::new();
        run_report(&source, OutputMode::Yaml, &plain(), &mut out)
            .await
            .unwrap();
        let yaml = String::from_utf8(out).unwrap();
        assert!(yaml.starts_with("web:\n"));
        assert!(yaml.contains("srv1:"));
        assert!(yaml.contains("srv2:"));

        // [正常系] CSVはパースせずそのまま
        let source = mock_source(csv.clone());
        let mut out = Vec::new();
        run_report(&source, OutputMode::Csv, &plain(), &mut out)
            .await
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), csv);

        // [正常系] データ行がなくてもエラーにしない
        let source = mock_source("# pxname,svname\n".to_string());
        let mut out = Vec::new();
        run_report(&source, OutputMode::Lines, &plain(), &mut out)
            .await
            .unwrap();
        assert!(out.is_empty());
    }

    /// 常に書き込みに失敗する出力先
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    #[tokio::test]
    async fn test_run_report_write_error() {
        // [異常系] バッファ越しの書き込み失敗はどの出力形式でもエラーになる
        for mode in [OutputMode::Csv, OutputMode::Yaml, OutputMode::Lines] {
            let source = mock_source(server_line("web", "srv1", "UP", "L7OK"));
            let mut out = std::io::BufWriter::new(BrokenPipe);
            let result = run_report(&source, mode, &plain(), &mut out).await;
            let err = result.unwrap_err();
            assert!(
                matches!(
                    err.downcast_ref::<std::io::Error>().map(std::io::Error::kind),
                    Some(std::io::ErrorKind::BrokenPipe)
                ),
                "{mode:?}: {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_run_report_fetch_error() {
        // [異常系] 取得に失敗したら何も出力せずエラー
        let mut source = MockSource::new();
        source
            .expect_fetch()
            .times(1)
            .return_once(|| Err(FetchError::NoSource));
        source.expect_describe().returning(|| "mock".to_string());

        let mut out = Vec::new();
        let result = run_report(&source, OutputMode::Lines, &plain(), &mut out).await;
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err().downcast_ref::<FetchError>(),
            Some(FetchError::NoSource)
        ));
        assert!(out.is_empty());
    }
}
