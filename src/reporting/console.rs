//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints per-case progress while the suite runs, and the final
//! colourful summary table, statistics and failure details afterwards.
//! All user-facing text comes from the translation files.
//!
//! 此模块在套件运行时打印每个用例的进度，并在结束后打印彩色的摘要表格、
//! 统计信息和失败详情。所有面向用户的文本都来自翻译文件。

use colored::*;

use crate::core::{
    config::TestCase,
    models::{SuiteReport, TestReport, Verdict},
    summary::{CategoryStatus, Summary, format_rate},
};
use crate::infra::t;

/// Longest diagnostic excerpt printed per case in the details block.
const DETAIL_LIMIT: usize = 2000;

/// Colours a verdict label the way every console view shows it.
/// 以所有控制台视图统一的方式为判定标签着色。
pub fn colored_verdict(verdict: Verdict) -> ColoredString {
    let label = verdict.as_str();
    match verdict {
        Verdict::Pass => label.green(),
        Verdict::Fail => label.yellow(),
        Verdict::Crash => label.red(),
        Verdict::Segfault => label.red().bold(),
        Verdict::Timeout => label.magenta(),
    }
}

fn colored_status(status: CategoryStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        CategoryStatus::Resolved => label.green(),
        CategoryStatus::Partial => label.yellow(),
        CategoryStatus::Broken => label.red(),
        CategoryStatus::Fault => label.red().bold(),
    }
}

pub fn print_case_started(case: &TestCase) {
    println!(
        "{} {}",
        "▶".cyan(),
        t!("run.case_started", name = &case.name, category = &case.category)
    );
}

pub fn print_case_finished(report: &TestReport) {
    println!(
        "{} {:<10} {} ({:.2?})",
        report.verdict.icon(),
        colored_verdict(report.verdict),
        report.name,
        report.elapsed
    );
}

/// Prints the per-case table followed by counts, rates and category status.
///
/// 打印每个用例的表格，随后是计数、比率和类别状态。
///
/// # Output Format / 输出格式
/// ```text
/// --- Conformance Summary ---
///   - Status           | Test Name                                |   Duration
///   - PASS             | array_indexing_basic                     |      0.12s
///   - SEGFAULT         | null_deref                               |      0.03s
/// ```
pub fn print_summary(suite: &SuiteReport, summary: &Summary) {
    println!("\n{}", t!("report.summary_banner").bold());
    println!(
        "  - {:<18} | {:<40} | {:>10}",
        t!("report.column_status"),
        t!("report.column_name"),
        t!("report.column_duration")
    );

    for report in suite.reports() {
        println!(
            "  - {:<18} | {:<40} | {:>10}",
            colored_verdict(report.verdict),
            report.name,
            format!("{:.2}s", report.elapsed.as_secs_f64())
        );
    }

    println!();
    let counts = &summary.counts;
    println!("{}", t!("report.total", count = summary.total).bold());
    for verdict in Verdict::ALL {
        println!(
            "  {} {:<10} {}",
            verdict.icon(),
            colored_verdict(verdict),
            counts.get(verdict)
        );
    }
    println!(
        "{}",
        t!("report.pass_rate", rate = format_rate(summary.pass_rate)).cyan()
    );
    println!(
        "{}",
        t!("report.stability_rate", rate = format_rate(summary.stability_rate)).cyan()
    );

    println!("\n{}", t!("report.category_banner").bold());
    for category in &summary.categories {
        println!(
            "  {} {:<30} {:<10} {}/{}",
            category.status.icon(),
            category.title,
            colored_status(category.status),
            category.passed,
            category.total
        );
    }
}

/// Prints the diagnostic of every case that did not pass. Does nothing when
/// every case passed.
///
/// 打印每个未通过用例的诊断信息。所有用例都通过时不输出任何内容。
pub fn print_failure_details(suite: &SuiteReport) {
    let failures: Vec<&TestReport> = suite.reports().iter().filter(|r| !r.is_pass()).collect();
    if failures.is_empty() {
        return;
    }

    println!("\n{}", t!("report.failure_banner").red().bold());
    println!("{}", "-".repeat(80));

    for (i, report) in failures.iter().enumerate() {
        println!(
            "[{}/{}] {} '{}'",
            i + 1,
            failures.len(),
            colored_verdict(report.verdict),
            report.name.cyan()
        );
        println!("\n{}", excerpt(&report.diagnostic, DETAIL_LIMIT));
        println!("\n{}", "-".repeat(80));
    }
}

/// First `limit` characters of `text`, marked when cut.
/// `text` 的前 `limit` 个字符，被截断时会加标记。
pub fn excerpt(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_cuts_on_char_boundaries() {
        assert_eq!(excerpt("abc", 5), "abc");
        assert_eq!(excerpt("abcdef", 3), "abc…");
        assert_eq!(excerpt("错误信息", 2), "错误…");
    }
}
