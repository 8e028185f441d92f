//! # Process Runner Integration Tests / 进程运行器集成测试
//!
//! Runs real child processes through `SubprocessRunner`: exit codes,
//! terminating signals, deadlines and output caps.
//!
//! 通过 `SubprocessRunner` 运行真实的子进程：退出码、终止信号、截止时间和输出上限。

#![cfg(unix)]

use conformance_runner::infra::HarnessError;
use conformance_runner::infra::command::{Invocation, ProcessRunner, SubprocessRunner};
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn shell(script: &str, timeout: Duration) -> Invocation {
    Invocation {
        program: PathBuf::from("sh"),
        args: vec!["-c".to_string(), script.to_string()],
        working_dir: std::env::temp_dir(),
        timeout,
        output_limit: 1024,
    }
}

#[tokio::test]
async fn test_captures_streams_and_exit_code() {
    let outcome = SubprocessRunner
        .run(&shell("echo out; echo err >&2; exit 3", Duration::from_secs(5)))
        .await
        .unwrap();

    assert_eq!(outcome.exit_code, Some(3));
    assert_eq!(outcome.stdout, "out\n");
    assert_eq!(outcome.stderr, "err\n");
    assert_eq!(outcome.signal, None);
    assert!(!outcome.timed_out);
    assert!(!outcome.truncated);
}

#[tokio::test]
async fn test_terminating_signal_is_reported() {
    let outcome = SubprocessRunner
        .run(&shell("kill -SEGV $$", Duration::from_secs(5)))
        .await
        .unwrap();

    assert_eq!(outcome.signal, Some(libc::SIGSEGV));
    assert_eq!(outcome.exit_code, None);
    assert!(!outcome.timed_out);
}

#[tokio::test]
async fn test_deadline_kills_process_and_its_children() {
    let started = Instant::now();
    let outcome = SubprocessRunner
        .run(&shell("echo started; sleep 30; echo never", Duration::from_millis(300)))
        .await
        .unwrap();

    assert!(outcome.timed_out);
    assert_eq!(outcome.exit_code, None);
    assert_eq!(outcome.stdout, "started\n");
    assert!(outcome.wall_clock >= Duration::from_millis(300));
    // Deadline plus termination grace, with room for a slow CI machine.
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_deadline_escalates_when_sigterm_is_ignored() {
    let started = Instant::now();
    let outcome = SubprocessRunner
        .run(&shell("trap '' TERM; sleep 30", Duration::from_millis(200)))
        .await
        .unwrap();

    assert!(outcome.timed_out);
    assert_eq!(outcome.exit_code, None);
    assert_eq!(outcome.signal, Some(libc::SIGKILL));
    // Deadline plus the full grace period before SIGKILL.
    assert!(started.elapsed() >= Duration::from_millis(700));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_output_is_capped_but_drained() {
    let outcome = SubprocessRunner
        .run(&shell(
            "head -c 100000 /dev/zero | tr '\\0' 'x'; echo done >&2",
            Duration::from_secs(5),
        ))
        .await
        .unwrap();

    assert_eq!(outcome.exit_code, Some(0));
    assert_eq!(outcome.stdout.len(), 1024);
    assert!(outcome.truncated);
    assert_eq!(outcome.stderr, "done\n");
}

#[tokio::test]
async fn test_missing_program_is_a_spawn_error() {
    let invocation = Invocation {
        program: PathBuf::from("/nonexistent/conformance-compiler"),
        args: Vec::new(),
        working_dir: std::env::temp_dir(),
        timeout: Duration::from_secs(1),
        output_limit: 1024,
    };

    let err = SubprocessRunner.run(&invocation).await.unwrap_err();
    assert!(matches!(err, HarnessError::Spawn { .. }), "{err}");
}
