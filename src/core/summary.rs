//! # Report Aggregator Module / 报告汇总模块
//!
//! Pure transformation of a finished [`SuiteReport`] into summary statistics:
//! verdict counts, pass and stability rates, and a status per category.
//! The result is renderer-agnostic.
//!
//! 将已完成的 [`SuiteReport`] 纯粹地转换为汇总统计：
//! 判定计数、通过率与稳定率，以及每个类别的状态。结果与渲染方式无关。

use serde::Serialize;
use std::fmt;

use crate::core::config::{SuiteConfig, title_case};
use crate::core::models::{SuiteReport, TestReport, Verdict};

/// Number of cases per verdict.
/// 每种判定的用例数量。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VerdictCounts {
    pub pass: usize,
    pub fail: usize,
    pub crash: usize,
    pub segfault: usize,
    pub timeout: usize,
}

impl VerdictCounts {
    pub fn tally<'a>(reports: impl IntoIterator<Item = &'a TestReport>) -> Self {
        let mut counts = Self::default();
        for report in reports {
            counts.add(report.verdict);
        }
        counts
    }

    pub fn add(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Pass => self.pass += 1,
            Verdict::Fail => self.fail += 1,
            Verdict::Crash => self.crash += 1,
            Verdict::Segfault => self.segfault += 1,
            Verdict::Timeout => self.timeout += 1,
        }
    }

    pub fn get(&self, verdict: Verdict) -> usize {
        match verdict {
            Verdict::Pass => self.pass,
            Verdict::Fail => self.fail,
            Verdict::Crash => self.crash,
            Verdict::Segfault => self.segfault,
            Verdict::Timeout => self.timeout,
        }
    }

    pub fn total(&self) -> usize {
        self.pass + self.fail + self.crash + self.segfault + self.timeout
    }
}

/// Health label of a category. A segfault anywhere in the category dominates.
///
/// 类别的健康状态标签。类别中只要出现段错误即优先显示。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryStatus {
    /// Every case passed.
    /// 所有用例都通过。
    Resolved,
    /// Some, but not all, cases passed.
    /// 部分用例通过。
    Partial,
    /// No case passed.
    /// 没有用例通过。
    Broken,
    /// At least one case ended in a fault.
    /// 至少一个用例以故障结束。
    Fault,
}

impl CategoryStatus {
    pub fn from_counts(counts: &VerdictCounts) -> Self {
        if counts.segfault > 0 {
            CategoryStatus::Fault
        } else if counts.pass == counts.total() {
            CategoryStatus::Resolved
        } else if counts.pass > 0 {
            CategoryStatus::Partial
        } else {
            CategoryStatus::Broken
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryStatus::Resolved => "RESOLVED",
            CategoryStatus::Partial => "PARTIAL",
            CategoryStatus::Broken => "BROKEN",
            CategoryStatus::Fault => "FAULT",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            CategoryStatus::Resolved => "🟢",
            CategoryStatus::Partial => "🟡",
            CategoryStatus::Broken => "🔴",
            CategoryStatus::Fault => "🚨",
        }
    }
}

impl fmt::Display for CategoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    /// Category tag as written on the cases.
    /// 用例上书写的类别标签。
    pub name: String,
    /// Display title.
    /// 显示标题。
    pub title: String,
    pub passed: usize,
    pub segfaults: usize,
    pub total: usize,
    pub status: CategoryStatus,
    pub counts: VerdictCounts,
}

impl CategorySummary {
    fn from_reports(name: &str, title: String, members: &[&TestReport]) -> Self {
        let counts = VerdictCounts::tally(members.iter().copied());
        Self {
            name: name.to_string(),
            title,
            passed: counts.pass,
            segfaults: counts.segfault,
            total: counts.total(),
            status: CategoryStatus::from_counts(&counts),
            counts,
        }
    }

    pub fn pass_rate(&self) -> Option<f64> {
        ratio(self.passed, self.total)
    }
}

/// Aggregate view of a whole suite run.
/// 整个套件运行的汇总视图。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub counts: VerdictCounts,
    pub pass_rate: Option<f64>,
    pub stability_rate: Option<f64>,
    pub categories: Vec<CategorySummary>,
}

impl Summary {
    /// Crash + Segfault; used as the harness exit code.
    /// Crash + Segfault 的数量；用作工具的退出码。
    pub fn high_severity(&self) -> usize {
        Verdict::ALL
            .into_iter()
            .filter(|v| v.is_high_severity())
            .map(|v| self.counts.get(v))
            .sum()
    }

    pub fn category(&self, name: &str) -> Option<&CategorySummary> {
        self.categories.iter().find(|c| c.name == name)
    }
}

/// Summarizes a suite report. Categories appear in the order of their first
/// report; titles are derived from the tags.
///
/// Rates are `None` for an empty report rather than a division by zero.
///
/// 汇总套件报告。类别按其第一个报告出现的顺序排列；标题由标签派生。
///
/// 对于空报告，比率为 `None`，而不是除以零。
pub fn summarize(report: &SuiteReport) -> Summary {
    summarize_titled(report, title_case)
}

/// Like [`summarize`], with category titles taken from the suite's
/// `[categories]` table.
///
/// 与 [`summarize`] 相同，但类别标题取自套件的 `[categories]` 表。
pub fn summarize_with(report: &SuiteReport, config: &SuiteConfig) -> Summary {
    summarize_titled(report, |name| config.category_title(name))
}

fn summarize_titled(report: &SuiteReport, title: impl Fn(&str) -> String) -> Summary {
    let counts = VerdictCounts::tally(report.reports());
    let total = counts.total();

    let categories = report
        .by_category()
        .into_iter()
        .map(|(name, members)| CategorySummary::from_reports(name, title(name), &members))
        .collect();

    Summary {
        total,
        counts,
        pass_rate: ratio(counts.pass, total),
        stability_rate: ratio(counts.pass + counts.fail, total),
        categories,
    }
}

fn ratio(part: usize, whole: usize) -> Option<f64> {
    (whole > 0).then(|| part as f64 / whole as f64)
}

/// Formats an optional rate as a percentage with one decimal, or "n/a".
pub fn format_rate(rate: Option<f64>) -> String {
    rate.map(|r| format!("{:.1}%", r * 100.0))
        .unwrap_or_else(|| "n/a".to_string())
}
