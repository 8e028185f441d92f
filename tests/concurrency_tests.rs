//! # Concurrency Tests using Loom / 使用 Loom 的并发测试
//!
//! Models how `run_suite` gathers results: every case finishes on its own
//! worker and hands its `TestReport` to a single consumer, which is the only
//! writer of the `SuiteReport`. Loom explores every completion order and
//! checks that each case lands in the report exactly once and that the
//! summary does not depend on that order.
//!
//! 模拟 `run_suite` 如何收集结果：每个用例在各自的工作者上完成，
//! 并把它的 `TestReport` 交给唯一的消费者，后者是 `SuiteReport` 的唯一写入者。
//! Loom 探索所有完成顺序，检查每个用例恰好进入报告一次，且汇总结果与顺序无关。

#[cfg(test)]
mod tests {
    use conformance_runner::core::config::TestCase;
    use conformance_runner::core::models::{SuiteReport, TestReport, Verdict};
    use conformance_runner::core::summary::summarize;
    use loom::sync::mpsc::channel;
    use loom::thread;

    /// This test models the hand-off between case workers and the appender.
    ///
    /// One worker produces a normal verdict; the other stands in for a task
    /// whose failure was already turned into a `Crash` report. The consumer
    /// receives exactly as many reports as cases were submitted, which is
    /// what `run_suite` does when it drains its stream.
    ///
    /// 此测试模拟用例工作者与追加者之间的交接。
    /// 一个工作者产生正常判定；另一个代表其失败已被转换为 `Crash` 报告的任务。
    /// 消费者接收的报告数量恰好等于提交的用例数量，这正是 `run_suite` 排空其流时的行为。
    #[test]
    fn test_reports_reach_single_appender_exactly_once() {
        // We spawn a new thread with a larger stack size to prevent a stack overflow,
        // which can occur with loom's deep exploration of concurrent models.
        const STACK_SIZE: usize = 8 * 1024 * 1024; // 8 MB

        let builder = std::thread::Builder::new()
            .name("loom-test-thread".into())
            .stack_size(STACK_SIZE);

        let handle = builder
            .spawn(|| {
                loom::model(|| {
                    let submitted = [("reads_array", Verdict::Pass), ("task_panicked", Verdict::Crash)];
                    let (tx, rx) = channel::<TestReport>();

                    let workers: Vec<_> = submitted
                        .iter()
                        .map(|&(name, verdict)| {
                            let tx = tx.clone();
                            thread::spawn(move || {
                                let case = TestCase::new(name, "");
                                let diagnostic = if verdict == Verdict::Pass {
                                    String::new()
                                } else {
                                    "internal harness error: case task failed".to_string()
                                };
                                tx.send(TestReport::new(&case, verdict, diagnostic, None, None))
                                    .unwrap();
                            })
                        })
                        .collect();

                    let mut suite = SuiteReport::new();
                    for _ in 0..submitted.len() {
                        suite.push(rx.recv().unwrap());
                    }

                    for worker in workers {
                        worker.join().unwrap();
                    }

                    assert_eq!(suite.len(), submitted.len());
                    let mut names: Vec<&str> = suite.reports().iter().map(|r| r.name.as_str()).collect();
                    names.sort_unstable();
                    assert_eq!(names, vec!["reads_array", "task_panicked"]);

                    let summary = summarize(&suite);
                    assert_eq!(summary.counts.pass, 1);
                    assert_eq!(summary.counts.crash, 1);
                    assert_eq!(summary.high_severity(), 1);
                });
            })
            .unwrap();

        handle.join().unwrap();
    }
}
