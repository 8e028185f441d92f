//! # HTML Reporting Module / HTML 报告模块
//!
//! This module renders a self-contained HTML page with the suite statistics,
//! the category status table and one row per case, with the diagnostic of
//! every non-passing case in a collapsible block.
//!
//! 此模块渲染一个自包含的 HTML 页面，包含套件统计、类别状态表以及每个用例一行，
//! 每个未通过用例的诊断信息放在可折叠的区块中。

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;

use crate::core::models::{SuiteReport, TestReport, Verdict};
use crate::core::summary::{CategoryStatus, Summary, format_rate};
use crate::infra::t;
use crate::reporting::console::excerpt;
use crate::reporting::markdown::COMPILE_EXCERPT_CHARS;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 2em; color: #24292f; }
h1 { border-bottom: 1px solid #d0d7de; padding-bottom: .3em; }
table { border-collapse: collapse; margin: 1em 0; min-width: 60%; }
th, td { border: 1px solid #d0d7de; padding: 6px 12px; text-align: left; vertical-align: top; }
th { background: #f6f8fa; }
.stats span { display: inline-block; margin-right: 1.5em; }
.pass { color: #1a7f37; }
.fail { color: #9a6700; }
.crash, .segfault, .fault, .broken { color: #cf222e; font-weight: bold; }
.timeout { color: #8250df; }
.resolved { color: #1a7f37; }
.partial { color: #9a6700; }
pre { background: #f6f8fa; padding: 8px; white-space: pre-wrap; max-width: 90ch; }
"#;

fn verdict_class(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Pass => "pass",
        Verdict::Fail => "fail",
        Verdict::Crash => "crash",
        Verdict::Segfault => "segfault",
        Verdict::Timeout => "timeout",
    }
}

fn status_class(status: CategoryStatus) -> &'static str {
    match status {
        CategoryStatus::Resolved => "resolved",
        CategoryStatus::Partial => "partial",
        CategoryStatus::Broken => "broken",
        CategoryStatus::Fault => "fault",
    }
}

/// Renders the full report page.
///
/// 渲染完整的报告页面。
pub fn render_html(suite: &SuiteReport, summary: &Summary, generated_at: DateTime<Local>) -> Markup {
    let counts = &summary.counts;
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("report.title")) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("report.title")) }
                p { (t!("report.generated_at", time = generated_at.format("%Y-%m-%d %H:%M:%S %Z"))) }

                h2 { (t!("report.summary_heading")) }
                div.stats {
                    span { strong { (t!("report.label_total")) } ": " (summary.total) }
                    @for verdict in Verdict::ALL {
                        span class=(verdict_class(verdict)) {
                            (verdict.icon()) " " (verdict.as_str()) ": " (counts.get(verdict))
                        }
                    }
                }
                p {
                    strong { (t!("report.label_pass_rate")) } ": " (format_rate(summary.pass_rate))
                    " · "
                    strong { (t!("report.label_stability_rate")) } ": " (format_rate(summary.stability_rate))
                }

                h2 { (t!("report.category_heading")) }
                table {
                    thead {
                        tr {
                            th { (t!("report.column_category")) }
                            th { (t!("report.column_status")) }
                            th { (t!("report.column_passed")) }
                        }
                    }
                    tbody {
                        @for category in &summary.categories {
                            tr {
                                td { (category.title) }
                                td class=(status_class(category.status)) {
                                    (category.status.icon()) " " (category.status.as_str())
                                }
                                td { (category.passed) "/" (category.total) }
                            }
                        }
                    }
                }

                h2 { (t!("report.details_heading")) }
                table {
                    thead {
                        tr {
                            th { (t!("report.column_status")) }
                            th { (t!("report.column_name")) }
                            th { (t!("report.column_category")) }
                            th { (t!("report.column_duration")) }
                            th { (t!("report.label_details")) }
                        }
                    }
                    tbody {
                        @for report in suite.reports() {
                            (case_row(report, summary))
                        }
                    }
                }
            }
        }
    }
}

fn case_row(report: &TestReport, summary: &Summary) -> Markup {
    let title = summary
        .category(&report.category)
        .map_or(report.category.as_str(), |c| c.title.as_str());
    let compile_output = report
        .compile
        .as_ref()
        .map(|c| c.combined_output())
        .unwrap_or_default();

    html! {
        tr {
            td class=(verdict_class(report.verdict)) { (report.verdict.icon()) " " (report.verdict.as_str()) }
            td {
                (report.name)
                @if !report.description.is_empty() {
                    br; small { (report.description) }
                }
            }
            td { (title) }
            td { (format!("{:.2}s", report.elapsed.as_secs_f64())) }
            td {
                @if !report.is_pass() {
                    details {
                        summary { (t!("report.label_error")) }
                        pre { (report.diagnostic) }
                        @if !compile_output.is_empty() {
                            pre { (excerpt(&compile_output, COMPILE_EXCERPT_CHARS)) }
                        }
                    }
                }
            }
        }
    }
}

/// Generates the HTML report at `output_path`.
///
/// 在 `output_path` 生成 HTML 报告。
pub fn generate_html_report(suite: &SuiteReport, summary: &Summary, output_path: &Path) -> Result<()> {
    let page = render_html(suite, summary, Local::now());
    fs::write(output_path, page.into_string())
        .with_context(|| t!("report.write_failed", path = output_path.display()).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::summary::summarize;
    use std::time::Duration;

    #[test]
    fn html_escapes_program_output() {
        let suite: SuiteReport = [TestReport {
            name: "generics".to_string(),
            category: "type_system".to_string(),
            description: String::new(),
            verdict: Verdict::Fail,
            diagnostic: "expected <T> got </pre>".to_string(),
            compile: None,
            run: None,
            elapsed: Duration::from_millis(120),
        }]
        .into_iter()
        .collect();
        let summary = summarize(&suite);

        let page = render_html(&suite, &summary, Local::now()).into_string();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("expected &lt;T&gt; got &lt;/pre&gt;"));
        assert!(page.contains("Type System"));
        assert!(page.contains("BROKEN"));
    }
}
