//! # Suite Runner Module / 套件运行模块
//!
//! Runs every planned case through the executor on a bounded worker pool and
//! appends each report as it completes. The only shared mutable state is the
//! suite report, and a single consumer performs all appends.
//!
//! 在有界的工作池上通过执行器运行每个计划中的用例，并在每个用例完成时追加其报告。
//! 唯一共享的可变状态是套件报告，所有追加都由单个消费者完成。

use futures::{StreamExt, stream};
use tracing::error;

use crate::core::{
    config::TestCase,
    execution::TestExecutor,
    models::{SuiteReport, TestReport, Verdict},
};
use crate::infra::command::ProcessRunner;

/// Executes `cases` with at most `jobs` running at once (`jobs = 1` is strictly
/// sequential) and returns the report in completion order.
///
/// No case can stop another: a panicking case task is recorded as a `Crash`
/// for that case and the suite carries on.
///
/// 以最多 `jobs` 个并发执行 `cases`（`jobs = 1` 时严格顺序执行），
/// 并按完成顺序返回报告。
///
/// 任何用例都不能阻止其他用例：发生 panic 的用例任务会被记录为该用例的 `Crash`，
/// 套件继续执行。
pub async fn run_suite<R>(cases: Vec<TestCase>, executor: &TestExecutor<R>, jobs: usize) -> SuiteReport
where
    R: ProcessRunner + 'static,
{
    let mut results = stream::iter(cases.into_iter().map(|case| {
        let executor = executor.clone();
        let case_for_error = case.clone();
        let handle = tokio::spawn(async move { executor.execute(&case).await });
        async move {
            match handle.await {
                Ok(report) => report,
                Err(e) => {
                    error!(case = %case_for_error.name, "case task failed: {}", e);
                    TestReport::new(
                        &case_for_error,
                        Verdict::Crash,
                        format!("internal harness error: case task failed: {e}"),
                        None,
                        None,
                    )
                }
            }
        }
    }))
    .buffer_unordered(jobs.max(1));

    let mut suite = SuiteReport::new();
    while let Some(report) = results.next().await {
        suite.push(report);
    }
    suite
}
