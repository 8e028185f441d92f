use conformance_runner::core::classifier::{FaultPolicy, classify};
use conformance_runner::core::config::TestCase;
use conformance_runner::core::models::{ProcessOutcome, SuiteReport, TestReport, Verdict};
use conformance_runner::core::summary::summarize;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

fn exited(code: i32, stdout: &str) -> ProcessOutcome {
    ProcessOutcome {
        exit_code: Some(code),
        stdout: stdout.to_string(),
        wall_clock: Duration::from_millis(12),
        ..Default::default()
    }
}

fn bench_classify(c: &mut Criterion) {
    let faults = FaultPolicy::default();
    let mut case = TestCase::new("bench_case", "");
    case.expected_output = Some("1\n3\n5\n".repeat(200));
    let compile = exited(0, "");
    let matching = exited(0, &"1\n3\n5\n".repeat(200));
    let mismatching = exited(0, &"1\n2\n".repeat(300));

    c.bench_function("classify_matching_output", |b| {
        b.iter(|| classify(black_box(&case), &compile, Some(black_box(&matching)), &faults))
    });
    c.bench_function("classify_mismatched_output", |b| {
        b.iter(|| classify(black_box(&case), &compile, Some(black_box(&mismatching)), &faults))
    });
}

fn bench_summarize(c: &mut Criterion) {
    let report: SuiteReport = (0..1000)
        .map(|i| {
            let mut case = TestCase::new(format!("case_{i}"), "");
            case.category = format!("category_{}", i % 12);
            let verdict = Verdict::ALL[i % Verdict::ALL.len()];
            let diagnostic = if verdict == Verdict::Pass {
                String::new()
            } else {
                "diagnostic".to_string()
            };
            TestReport::new(&case, verdict, diagnostic, Some(exited(0, "")), None)
        })
        .collect();

    c.bench_function("summarize_1000_cases", |b| b.iter(|| summarize(black_box(&report))));
}

criterion_group!(benches, bench_classify, bench_summarize);
criterion_main!(benches);
