//! # Outcome Classifier Module / 结果分类模块
//!
//! Maps the expectations of a case and the raw outcomes of its phases to exactly
//! one [`Verdict`]. The rules are evaluated strictly in order and the first
//! match wins: timeout, then fault, then expectation checks, then output
//! comparison.
//!
//! 将用例的预期及其各阶段的原始结果映射为唯一的 [`Verdict`]。
//! 规则严格按顺序求值，第一个匹配的规则生效：
//! 先超时，再故障，然后是预期检查，最后是输出比较。

use crate::core::config::TestCase;
use crate::core::models::{ProcessOutcome, Verdict};

/// Decides whether a terminated process indicates a fault in the program
/// (as opposed to an ordinary non-zero exit).
///
/// 判断已终止的进程是否表示程序发生故障（而不是普通的非零退出）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultPolicy {
    /// Terminating signals treated as a fault.
    /// 视为故障的终止信号。
    pub signals: Vec<i32>,
    /// Exit codes treated as a fault, for platforms that report faults via exit status.
    /// 视为故障的退出码，用于通过退出状态报告故障的平台。
    pub exit_codes: Vec<i32>,
}

impl FaultPolicy {
    /// SIGSEGV, SIGBUS, SIGILL and SIGFPE on unix; nothing elsewhere.
    pub fn default_signals() -> Vec<i32> {
        #[cfg(unix)]
        {
            vec![libc::SIGSEGV, libc::SIGBUS, libc::SIGILL, libc::SIGFPE]
        }
        #[cfg(not(unix))]
        {
            Vec::new()
        }
    }

    pub fn indicates_fault(&self, outcome: &ProcessOutcome) -> bool {
        if outcome.timed_out {
            return false;
        }
        let by_signal = outcome
            .signal
            .is_some_and(|sig| self.signals.contains(&sig));
        let by_exit_code = outcome
            .exit_code
            .is_some_and(|code| self.exit_codes.contains(&code));
        by_signal || by_exit_code
    }
}

impl Default for FaultPolicy {
    fn default() -> Self {
        Self {
            signals: Self::default_signals(),
            exit_codes: vec![139, -1_073_741_819],
        }
    }
}

/// A verdict together with the explanation shown in reports.
/// The diagnostic is empty for `Pass`.
///
/// 判定结果及报告中显示的解释。`Pass` 时诊断信息为空。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub verdict: Verdict,
    pub diagnostic: String,
}

impl Classification {
    pub fn pass() -> Self {
        Self {
            verdict: Verdict::Pass,
            diagnostic: String::new(),
        }
    }

    pub fn new(verdict: Verdict, diagnostic: impl Into<String>) -> Self {
        Self {
            verdict,
            diagnostic: diagnostic.into(),
        }
    }
}

/// Classifies a whole case. `run` is `None` when no run outcome exists, either
/// because the case stops after compiling or because no artifact was produced.
///
/// 对整个用例进行分类。当不存在运行结果时 `run` 为 `None`，
/// 原因可能是用例在编译后停止，或者没有生成产物。
pub fn classify(
    case: &TestCase,
    compile: &ProcessOutcome,
    run: Option<&ProcessOutcome>,
    faults: &FaultPolicy,
) -> Classification {
    classify_compile(case, compile, faults).unwrap_or_else(|| classify_run(case, run, faults))
}

/// Rules 1 to 5. Returns `Some` when the compile phase alone decides the
/// verdict, in which case no run phase may be attempted.
///
/// 规则 1 到 5。当仅凭编译阶段即可确定判定时返回 `Some`，
/// 此时不得尝试运行阶段。
pub fn classify_compile(
    case: &TestCase,
    compile: &ProcessOutcome,
    faults: &FaultPolicy,
) -> Option<Classification> {
    if compile.timed_out {
        return Some(Classification::new(Verdict::Timeout, "compilation timed out"));
    }

    if faults.indicates_fault(compile) {
        return Some(Classification::new(
            Verdict::Segfault,
            format!("fault during compilation ({})", compile.termination()),
        ));
    }

    let exited_zero = compile.succeeded();

    if !case.expect_compile_success {
        return Some(if exited_zero {
            Classification::new(
                Verdict::Fail,
                "expected compilation failure but it succeeded",
            )
        } else {
            Classification::pass()
        });
    }

    if !exited_zero {
        return Some(Classification::new(
            Verdict::Fail,
            format!(
                "compilation failed ({}): {}",
                compile.termination(),
                compile.combined_output().trim_end()
            ),
        ));
    }

    if !case.expect_run {
        return Some(Classification::pass());
    }

    None
}

/// Rules 6 to 11, applied once compilation succeeded and a run was warranted.
///
/// 规则 6 到 11，在编译成功且需要运行时应用。
pub fn classify_run(
    case: &TestCase,
    run: Option<&ProcessOutcome>,
    faults: &FaultPolicy,
) -> Classification {
    let Some(run) = run else {
        return Classification::new(Verdict::Fail, "executable not produced");
    };

    if run.timed_out {
        return Classification::new(Verdict::Timeout, "execution timed out");
    }

    if faults.indicates_fault(run) {
        return Classification::new(
            Verdict::Segfault,
            format!("fault during execution ({})", run.termination()),
        );
    }

    if run.exit_code != Some(0) {
        return Classification::new(
            Verdict::Crash,
            format!(
                "runtime crash ({}): {}",
                run.termination(),
                run.stderr.trim_end()
            ),
        );
    }

    match &case.expected_output {
        Some(expected) if !output_matches(&run.stdout, expected) => Classification::new(
            Verdict::Fail,
            format!(
                "output mismatch\nexpected:\n{}\nactual:\n{}",
                expected, run.stdout
            ),
        ),
        _ => Classification::pass(),
    }
}

/// Trailing whitespace is ignored on both sides; everything else is byte-exact.
/// 双方的尾部空白均被忽略；其余部分逐字节精确比较。
pub fn output_matches(actual: &str, expected: &str) -> bool {
    actual.trim_end() == expected.trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn exited(code: i32) -> ProcessOutcome {
        ProcessOutcome {
            exit_code: Some(code),
            wall_clock: Duration::from_millis(10),
            ..Default::default()
        }
    }

    fn printed(stdout: &str) -> ProcessOutcome {
        ProcessOutcome {
            stdout: stdout.to_string(),
            ..exited(0)
        }
    }

    fn timed_out() -> ProcessOutcome {
        ProcessOutcome {
            timed_out: true,
            ..Default::default()
        }
    }

    #[test]
    fn expected_output_with_trailing_newline_passes() {
        let case = TestCase {
            expected_output: Some("1\n3\n5\n".to_string()),
            ..TestCase::new("array_indexing_basic", "")
        };
        let result = classify(&case, &exited(0), Some(&printed("1\n3\n5\n")), &FaultPolicy::default());
        assert_eq!(result, Classification::pass());
    }

    #[test]
    fn leading_whitespace_is_significant() {
        assert!(output_matches("a\n", "a"));
        assert!(!output_matches(" a", "a"));
    }

    #[test]
    fn compile_timeout_beats_expected_failure() {
        let case = TestCase {
            expect_compile_success: false,
            ..TestCase::new("hang", "")
        };
        let result = classify(&case, &timed_out(), None, &FaultPolicy::default());
        assert_eq!(result.verdict, Verdict::Timeout);
    }

    #[test]
    fn fault_exit_code_is_a_segfault_even_when_failure_expected() {
        let case = TestCase {
            expect_compile_success: false,
            ..TestCase::new("crashy_parser", "")
        };
        let result = classify(&case, &exited(139), None, &FaultPolicy::default());
        assert_eq!(result.verdict, Verdict::Segfault);
    }

    #[test]
    fn missing_run_outcome_means_no_executable() {
        let case = TestCase::new("no_binary", "");
        let result = classify(&case, &exited(0), None, &FaultPolicy::default());
        assert_eq!(result.verdict, Verdict::Fail);
        assert_eq!(result.diagnostic, "executable not produced");
    }

    #[test]
    fn killed_by_non_fault_signal_is_a_crash() {
        let case = TestCase::new("aborted", "");
        let run = ProcessOutcome {
            signal: Some(6),
            ..Default::default()
        };
        let policy = FaultPolicy {
            signals: vec![11],
            exit_codes: vec![],
        };
        let result = classify(&case, &exited(0), Some(&run), &policy);
        assert_eq!(result.verdict, Verdict::Crash);
    }
}
