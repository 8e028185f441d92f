//! # JSON Reporting Module / JSON 报告模块
//!
//! Machine-readable dump of a suite run for CI dashboards.
//!
//! 供 CI 仪表板使用的套件运行机器可读输出。

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::core::models::{SuiteReport, TestReport};
use crate::core::summary::Summary;
use crate::infra::t;

/// The document written by `--json`.
/// `--json` 写出的文档。
#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub generated_at: DateTime<Local>,
    pub summary: &'a Summary,
    pub cases: &'a [TestReport],
}

impl<'a> ReportDocument<'a> {
    pub fn new(suite: &'a SuiteReport, summary: &'a Summary, generated_at: DateTime<Local>) -> Self {
        Self {
            generated_at,
            summary,
            cases: suite.reports(),
        }
    }
}

pub fn write_json_report(suite: &SuiteReport, summary: &Summary, path: &Path) -> Result<()> {
    let document = ReportDocument::new(suite, summary, Local::now());
    let content = serde_json::to_string_pretty(&document)?;
    fs::write(path, content)
        .with_context(|| t!("report.write_failed", path = path.display()).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{ProcessOutcome, Verdict};
    use crate::core::summary::summarize;
    use std::time::Duration;

    #[test]
    fn document_carries_summary_and_raw_outcomes() {
        let suite: SuiteReport = [TestReport {
            name: "loop".to_string(),
            category: "loop_safety".to_string(),
            description: String::new(),
            verdict: Verdict::Timeout,
            diagnostic: "execution timed out".to_string(),
            compile: Some(ProcessOutcome {
                exit_code: Some(0),
                wall_clock: Duration::from_millis(250),
                ..Default::default()
            }),
            run: Some(ProcessOutcome {
                timed_out: true,
                wall_clock: Duration::from_secs(5),
                ..Default::default()
            }),
            elapsed: Duration::from_millis(5250),
        }]
        .into_iter()
        .collect();
        let summary = summarize(&suite);

        let value = serde_json::to_value(ReportDocument::new(&suite, &summary, Local::now())).unwrap();
        assert_eq!(value["summary"]["total"], 1);
        assert_eq!(value["summary"]["counts"]["timeout"], 1);
        assert_eq!(value["summary"]["pass_rate"], 0.0);
        assert_eq!(value["summary"]["categories"][0]["status"], "BROKEN");
        assert_eq!(value["cases"][0]["verdict"], "TIMEOUT");
        assert_eq!(value["cases"][0]["run"]["timed_out"], true);
        assert_eq!(value["cases"][0]["run"]["exit_code"], serde_json::Value::Null);
        assert_eq!(value["cases"][0]["elapsed_secs"], 5.25);
    }
}
