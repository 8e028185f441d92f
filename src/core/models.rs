//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures used throughout the harness:
//! the verdict taxonomy, the raw outcome of a subprocess, the per-case report,
//! and the ordered suite report that the suite runner builds incrementally.
//!
//! 此模块定义了整个测试工具中使用的核心数据结构：
//! 判定分类、子进程的原始结果、单个用例的报告，
//! 以及由套件运行器增量构建的有序套件报告。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::core::config::TestCase;

/// The single classification assigned to a completed case.
/// The variants are mutually exclusive and exhaustive.
///
/// 分配给已完成用例的唯一分类。
/// 各变体互斥且穷尽。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    /// Behaviour matched every declared expectation.
    /// 行为符合所有声明的预期。
    Pass,
    /// The case ran but diverged from its expectation, or an expected failure did not occur.
    /// 用例已运行但与预期不符，或预期的失败没有发生。
    Fail,
    /// The program under test exited non-zero (without a fault) during the run phase.
    /// 被测程序在运行阶段以非零状态退出（非故障）。
    Crash,
    /// A fault-indicating termination in either phase.
    /// 任一阶段出现指示故障的终止。
    Segfault,
    /// A phase exceeded its deadline.
    /// 某个阶段超过了截止时间。
    Timeout,
}

impl Verdict {
    /// All verdicts in reporting order.
    pub const ALL: [Verdict; 5] = [
        Verdict::Pass,
        Verdict::Fail,
        Verdict::Crash,
        Verdict::Segfault,
        Verdict::Timeout,
    ];

    /// `Crash` and `Segfault` gate CI: their count becomes the process exit code.
    /// `Crash` 和 `Segfault` 作为 CI 门禁：它们的数量即为进程退出码。
    pub fn is_high_severity(self) -> bool {
        matches!(self, Verdict::Crash | Verdict::Segfault)
    }

    /// A case is stable when it completed without an infrastructure-level fault.
    /// 当用例在没有基础设施级故障的情况下完成时，即视为稳定。
    pub fn is_stable(self) -> bool {
        matches!(self, Verdict::Pass | Verdict::Fail)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
            Verdict::Crash => "CRASH",
            Verdict::Segfault => "SEGFAULT",
            Verdict::Timeout => "TIMEOUT",
        }
    }

    /// Icon used by the console and markdown renderers.
    pub fn icon(self) -> &'static str {
        match self {
            Verdict::Pass => "✅",
            Verdict::Fail => "❌",
            Verdict::Crash => "💥",
            Verdict::Segfault => "🚨",
            Verdict::Timeout => "⏰",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The observable result of one subprocess invocation.
/// Produced fresh by the process runner for every phase.
///
/// 一次子进程调用的可观测结果。
/// 由进程运行器为每个阶段重新生成。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOutcome {
    /// Exit code, absent if the process was killed by the deadline or a signal.
    /// 退出码；如果进程因超时或信号被终止，则不存在。
    pub exit_code: Option<i32>,
    /// Captured standard output, bounded by the configured limit.
    /// 捕获的标准输出，受配置的上限约束。
    pub stdout: String,
    /// Captured standard error, bounded by the configured limit.
    /// 捕获的标准错误，受配置的上限约束。
    pub stderr: String,
    /// `true` if either stream exceeded the limit and was cut.
    /// 如果任一流超出上限并被截断，则为 `true`。
    #[serde(default)]
    pub truncated: bool,
    /// Signal that terminated the process, if any.
    /// 终止进程的信号（如果有）。
    pub signal: Option<i32>,
    /// Measured wall-clock duration of the phase.
    /// 该阶段测得的墙钟时间。
    #[serde(with = "secs", rename = "wall_clock_secs")]
    pub wall_clock: Duration,
    /// `true` iff the deadline elapsed before natural termination.
    /// 当且仅当截止时间在进程自然终止前到达时为 `true`。
    pub timed_out: bool,
}

impl ProcessOutcome {
    /// Exited on its own with status zero.
    pub fn succeeded(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }

    /// Compiler diagnostics as a single block (stdout followed by stderr).
    pub fn combined_output(&self) -> String {
        let mut out = String::with_capacity(self.stdout.len() + self.stderr.len());
        out.push_str(&self.stdout);
        out.push_str(&self.stderr);
        out
    }

    /// Short human-readable description of how the process ended.
    pub fn termination(&self) -> String {
        if self.timed_out {
            return "deadline exceeded".to_string();
        }
        match (self.signal, self.exit_code) {
            (Some(sig), _) => format!("signal {sig}"),
            (None, Some(code)) => format!("exit code {code}"),
            (None, None) => "unknown termination".to_string(),
        }
    }
}

/// The final record for one test case. Owned by the suite report and
/// never mutated after creation.
///
/// 单个测试用例的最终记录。归套件报告所有，创建后不再修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub verdict: Verdict,
    /// Explanation for every non-`Pass` verdict; empty for `Pass`.
    /// 对每个非 `Pass` 判定的解释；`Pass` 时为空。
    pub diagnostic: String,
    /// Raw compile-phase outcome; absent when the harness failed before compiling.
    /// 编译阶段的原始结果；当工具在编译前失败时不存在。
    pub compile: Option<ProcessOutcome>,
    /// Raw run-phase outcome; absent when no run phase took place.
    /// 运行阶段的原始结果；当没有运行阶段时不存在。
    pub run: Option<ProcessOutcome>,
    /// Total wall time of the case, summed across phases.
    /// 用例的总墙钟时间，为各阶段之和。
    #[serde(with = "secs", rename = "elapsed_secs")]
    pub elapsed: Duration,
}

impl TestReport {
    pub fn new(
        case: &TestCase,
        verdict: Verdict,
        diagnostic: String,
        compile: Option<ProcessOutcome>,
        run: Option<ProcessOutcome>,
    ) -> Self {
        let elapsed = compile.iter().chain(run.iter()).map(|o| o.wall_clock).sum();
        Self {
            name: case.name.clone(),
            category: case.category.clone(),
            description: case.description.clone(),
            verdict,
            diagnostic,
            compile,
            run,
            elapsed,
        }
    }

    pub fn is_pass(&self) -> bool {
        self.verdict == Verdict::Pass
    }
}

/// The ordered sequence of per-case reports for one suite execution.
/// Created empty, appended to as cases complete, then summarized.
///
/// 一次套件执行中各用例报告的有序序列。
/// 初始为空，随用例完成而追加，最后进行汇总。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    reports: Vec<TestReport>,
}

impl SuiteReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, report: TestReport) {
        self.reports.push(report);
    }

    pub fn reports(&self) -> &[TestReport] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Groups reports by category, in order of each category's first appearance.
    /// Within a category, the append order is preserved.
    ///
    /// 按类别对报告分组，类别顺序为其首次出现的顺序。
    /// 在同一类别内保留追加顺序。
    pub fn by_category(&self) -> Vec<(&str, Vec<&TestReport>)> {
        let mut groups: Vec<(&str, Vec<&TestReport>)> = Vec::new();
        for report in &self.reports {
            match groups.iter_mut().find(|(cat, _)| *cat == report.category) {
                Some((_, members)) => members.push(report),
                None => groups.push((&report.category, vec![report])),
            }
        }
        groups
    }
}

impl FromIterator<TestReport> for SuiteReport {
    fn from_iter<I: IntoIterator<Item = TestReport>>(iter: I) -> Self {
        Self {
            reports: iter.into_iter().collect(),
        }
    }
}

/// Serializes a `Duration` as fractional seconds.
pub(crate) mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(name: &str, category: &str, verdict: Verdict) -> TestReport {
        TestReport {
            name: name.to_string(),
            category: category.to_string(),
            description: String::new(),
            verdict,
            diagnostic: String::new(),
            compile: None,
            run: None,
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn by_category_keeps_first_appearance_and_append_order() {
        let suite: SuiteReport = [
            report("b1", "beta", Verdict::Pass),
            report("a1", "alpha", Verdict::Fail),
            report("b2", "beta", Verdict::Crash),
            report("a2", "alpha", Verdict::Pass),
        ]
        .into_iter()
        .collect();

        let groups = suite.by_category();
        let names: Vec<(&str, Vec<&str>)> = groups
            .iter()
            .map(|(cat, members)| (*cat, members.iter().map(|r| r.name.as_str()).collect()))
            .collect();
        assert_eq!(
            names,
            vec![("beta", vec!["b1", "b2"]), ("alpha", vec!["a1", "a2"])]
        );
    }

    #[test]
    fn high_severity_covers_crash_and_segfault_only() {
        let severe: Vec<_> = Verdict::ALL
            .into_iter()
            .filter(|v| v.is_high_severity())
            .collect();
        assert_eq!(severe, vec![Verdict::Crash, Verdict::Segfault]);
    }

    #[test]
    fn only_a_clean_zero_exit_succeeds() {
        let ok = ProcessOutcome {
            exit_code: Some(0),
            ..Default::default()
        };
        assert!(ok.succeeded());
        assert!(!ProcessOutcome { exit_code: Some(1), ..Default::default() }.succeeded());
        assert!(!ProcessOutcome { signal: Some(9), ..Default::default() }.succeeded());
        assert!(!ProcessOutcome { timed_out: true, ..ok }.succeeded());
    }

    #[test]
    fn elapsed_sums_both_phases() {
        let case = TestCase::new("timed", "fn main() {}");
        let compile = ProcessOutcome {
            exit_code: Some(0),
            wall_clock: Duration::from_millis(300),
            ..Default::default()
        };
        let run = ProcessOutcome {
            exit_code: Some(0),
            wall_clock: Duration::from_millis(200),
            ..Default::default()
        };
        let report = TestReport::new(&case, Verdict::Pass, String::new(), Some(compile), Some(run));
        assert_eq!(report.elapsed, Duration::from_millis(500));
    }

    #[test]
    fn verdict_serializes_upper_case() {
        let json = serde_json::to_string(&Verdict::Segfault).unwrap();
        assert_eq!(json, "\"SEGFAULT\"");
    }
}
