//! # Markdown Reporting Module / Markdown 报告模块
//!
//! Renders a finished suite as a Markdown document: summary counts and rates,
//! the status of every category, and detailed results grouped by category.
//!
//! 将已完成的套件渲染为 Markdown 文档：汇总计数与比率、每个类别的状态，
//! 以及按类别分组的详细结果。

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;

use crate::core::models::{SuiteReport, TestReport};
use crate::core::summary::{Summary, format_rate};
use crate::infra::t;
use crate::reporting::console::excerpt;

/// Characters of compiler output quoted under a non-passing case.
/// 在未通过用例下引用的编译器输出字符数。
pub const COMPILE_EXCERPT_CHARS: usize = 300;

/// Renders the report. `generated_at` is passed in so output is reproducible.
///
/// 渲染报告。`generated_at` 由调用方传入，以便输出可复现。
pub fn render_markdown(suite: &SuiteReport, summary: &Summary, generated_at: DateTime<Local>) -> String {
    let counts = &summary.counts;
    let mut md = String::new();

    md.push_str(&format!("# {}\n", t!("report.title")));
    md.push_str(&format!(
        "{}\n\n",
        t!("report.generated_at", time = generated_at.format("%Y-%m-%d %H:%M:%S %Z"))
    ));

    md.push_str(&format!("## {}\n", t!("report.summary_heading")));
    md.push_str(&format!("- **{}**: {}\n", t!("report.label_total"), summary.total));
    md.push_str(&format!("- **{}**: {} ✅\n", t!("report.label_passed"), counts.pass));
    md.push_str(&format!("- **{}**: {} ❌\n", t!("report.label_failed"), counts.fail));
    md.push_str(&format!("- **{}**: {} 💥\n", t!("report.label_crashed"), counts.crash));
    md.push_str(&format!("- **{}**: {} 🚨\n", t!("report.label_segfaults"), counts.segfault));
    md.push_str(&format!("- **{}**: {} ⏰\n", t!("report.label_timeouts"), counts.timeout));
    md.push_str(&format!(
        "- **{}**: {}\n",
        t!("report.label_pass_rate"),
        format_rate(summary.pass_rate)
    ));
    md.push_str(&format!(
        "- **{}**: {}\n\n",
        t!("report.label_stability_rate"),
        format_rate(summary.stability_rate)
    ));

    md.push_str(&format!("## {}\n", t!("report.category_heading")));
    for category in &summary.categories {
        md.push_str(&format!(
            "- **{}**: {} {} ({}/{})\n",
            category.title,
            category.status.icon(),
            category.status,
            category.passed,
            category.total
        ));
    }

    md.push_str(&format!("\n## {}\n", t!("report.details_heading")));
    for (name, reports) in suite.by_category() {
        let category = summary.category(name);
        let title = category.map_or(name, |c| c.title.as_str());
        let passed = reports.iter().filter(|r| r.is_pass()).count();

        md.push_str(&format!("\n### {title}\n"));
        md.push_str(&format!(
            "**{}**: {}\n\n",
            t!("report.label_status"),
            t!(
                "report.category_passed",
                passed = passed,
                total = reports.len(),
                rate = format_rate(category.and_then(|c| c.pass_rate()))
            )
        ));

        for report in reports {
            push_case(&mut md, report);
        }
    }

    md
}

fn push_case(md: &mut String, report: &TestReport) {
    md.push_str(&format!(
        "- {} **{}**: {}\n",
        report.verdict.icon(),
        report.name,
        report.verdict
    ));
    if report.is_pass() {
        return;
    }

    md.push_str(&format!(
        "  - {}: {}\n",
        t!("report.label_error"),
        report.diagnostic.replace('\n', "\n    ")
    ));
    let compile_output = report
        .compile
        .as_ref()
        .map(|c| c.combined_output())
        .unwrap_or_default();
    if !compile_output.is_empty() {
        md.push_str(&format!(
            "  - {}: ```{}```\n",
            t!("report.label_details"),
            excerpt(&compile_output, COMPILE_EXCERPT_CHARS)
        ));
    }
}

/// Renders the report with the current local time and writes it to `path`.
///
/// 使用当前本地时间渲染报告并写入 `path`。
pub fn write_markdown_report(suite: &SuiteReport, summary: &Summary, path: &Path) -> Result<()> {
    let content = render_markdown(suite, summary, Local::now());
    fs::write(path, content)
        .with_context(|| t!("report.write_failed", path = path.display()).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{ProcessOutcome, Verdict};
    use crate::core::summary::summarize;
    use chrono::TimeZone;
    use std::time::Duration;

    fn report(name: &str, verdict: Verdict, compile_output: &str) -> TestReport {
        TestReport {
            name: name.to_string(),
            category: "string_handling".to_string(),
            description: String::new(),
            verdict,
            diagnostic: if verdict == Verdict::Pass {
                String::new()
            } else {
                "compilation failed".to_string()
            },
            compile: Some(ProcessOutcome {
                exit_code: Some(1),
                stderr: compile_output.to_string(),
                ..Default::default()
            }),
            run: None,
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn markdown_lists_categories_and_failures() {
        let suite: SuiteReport = [
            report("escapes", Verdict::Pass, ""),
            report("unicode", Verdict::Fail, &"x".repeat(400)),
        ]
        .into_iter()
        .collect();
        let summary = summarize(&suite);
        let at = Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().unwrap();

        let md = render_markdown(&suite, &summary, at);
        assert!(md.contains("2024-05-01 12:00:00"));
        assert!(md.contains("**String Handling**: 🟡 PARTIAL (1/2)"));
        assert!(md.contains("### String Handling"));
        assert!(md.contains("- ❌ **unicode**: FAIL"));
        assert!(md.contains("compilation failed"));
        assert!(md.contains(&format!("```{}…```", "x".repeat(300))));
        assert!(!md.contains(&"x".repeat(301)));
    }
}
