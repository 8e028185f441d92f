//! # Process Runner Module / 进程运行模块
//!
//! Executes one subprocess with a bounded deadline and captures its stdout and
//! stderr independently, each up to a byte limit. A non-zero exit is a normal
//! outcome, never an error; only failing to spawn or wait is.
//!
//! 在有限的截止时间内执行一个子进程，并分别捕获其 stdout 和 stderr，
//! 每个流都有字节上限。非零退出是正常结果，而不是错误；
//! 只有无法派生或等待进程才算错误。

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::core::models::ProcessOutcome;
use crate::infra::error::HarnessError;

/// Time a process gets between the polite termination request and `SIGKILL`.
/// Also bounds how long the output readers may linger after the process ended.
///
/// 进程在收到终止请求后到 `SIGKILL` 之间的宽限时间。
/// 同时限制进程结束后输出读取任务的最长等待时间。
pub const TERMINATION_GRACE: Duration = Duration::from_millis(500);

const READ_CHUNK: usize = 8 * 1024;

/// A fully prepared command line plus its execution limits.
///
/// 一个完整准备好的命令行及其执行限制。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub timeout: Duration,
    /// Maximum bytes kept per stream; the rest is read and discarded.
    /// 每个流保留的最大字节数；其余部分会被读取并丢弃。
    pub output_limit: usize,
}

/// Executes prepared invocations. The executor is generic over this seam so
/// the real subprocess runner can be swapped for a scripted one in tests.
///
/// 执行准备好的调用。执行器在此接口上是泛型的，
/// 因此在测试中可以用脚本化的实现替换真实的子进程运行器。
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutcome, HarnessError>;
}

/// Runs invocations as real child processes via `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubprocessRunner;

#[async_trait]
impl ProcessRunner for SubprocessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutcome, HarnessError> {
        run_with_deadline(invocation).await
    }
}

/// Bytes captured from one stream.
#[derive(Debug, Default)]
struct Captured {
    bytes: Vec<u8>,
    truncated: bool,
}

impl Captured {
    fn append(&mut self, data: &[u8], limit: usize) {
        let room = limit.saturating_sub(self.bytes.len());
        if data.len() > room {
            self.truncated = true;
        }
        self.bytes.extend_from_slice(&data[..data.len().min(room)]);
    }
}

/// Spawns the invocation, enforces its deadline, and collects the outcome.
///
/// On expiry the process group receives `SIGTERM`, then `SIGKILL` after
/// [`TERMINATION_GRACE`]. The child is also spawned with `kill_on_drop`, so it
/// cannot outlive this call on any path.
///
/// 派生调用、执行截止时间并收集结果。
///
/// 超时时进程组会先收到 `SIGTERM`，在 [`TERMINATION_GRACE`] 之后收到 `SIGKILL`。
/// 子进程同时以 `kill_on_drop` 方式派生，因此在任何路径上都不会比此调用存活得更久。
pub async fn run_with_deadline(invocation: &Invocation) -> Result<ProcessOutcome, HarnessError> {
    let mut cmd = tokio::process::Command::new(&invocation.program);
    cmd.args(&invocation.args)
        .current_dir(&invocation.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // A dedicated process group lets the deadline reach grandchildren too.
    #[cfg(unix)]
    cmd.process_group(0);

    let start = Instant::now();
    let mut child = cmd.spawn().map_err(|source| HarnessError::Spawn {
        program: invocation.program.clone(),
        source,
    })?;
    let pid = child.id();
    debug!(program = %invocation.program.display(), ?pid, timeout = ?invocation.timeout, "spawned");

    let stdout = child.stdout.take().ok_or_else(|| HarnessError::CaptureStream {
        program: invocation.program.clone(),
        stream: "stdout",
    })?;
    let stderr = child.stderr.take().ok_or_else(|| HarnessError::CaptureStream {
        program: invocation.program.clone(),
        stream: "stderr",
    })?;

    let stdout_buf = Arc::new(Mutex::new(Captured::default()));
    let stderr_buf = Arc::new(Mutex::new(Captured::default()));
    let stdout_handle = tokio::spawn(drain(stdout, invocation.output_limit, Arc::clone(&stdout_buf)));
    let stderr_handle = tokio::spawn(drain(stderr, invocation.output_limit, Arc::clone(&stderr_buf)));

    let wait_error = |source| HarnessError::Wait {
        program: invocation.program.clone(),
        source,
    };

    let (status, timed_out) = match tokio::time::timeout(invocation.timeout, child.wait()).await {
        Ok(status) => (status.map_err(wait_error)?, false),
        Err(_) => {
            debug!(program = %invocation.program.display(), ?pid, "deadline elapsed, terminating");
            (terminate(&mut child, pid).await.map_err(wait_error)?, true)
        }
    };
    let wall_clock = start.elapsed();

    // Readers only finish once every holder of the pipes is gone. Descendants
    // that outlive the process itself are swept with the rest of its group;
    // a live member keeps the group id from being reused.
    let stdout_done = settle(stdout_handle).await;
    let stderr_done = settle(stderr_handle).await;
    if !(stdout_done && stderr_done) {
        warn!(program = %invocation.program.display(), "output still open after exit, killing process group");
        if let Some(pid) = pid {
            signal_group(pid, Signal::Kill);
        }
    }

    let stdout = std::mem::take(&mut *stdout_buf.lock().await);
    let stderr = std::mem::take(&mut *stderr_buf.lock().await);
    let truncated = stdout.truncated || stderr.truncated;
    if truncated {
        debug!(program = %invocation.program.display(), limit = invocation.output_limit, "output truncated");
    }

    let (exit_code, signal) = decode_status(status);
    Ok(ProcessOutcome {
        exit_code: if timed_out { None } else { exit_code },
        stdout: String::from_utf8_lossy(&stdout.bytes).into_owned(),
        stderr: String::from_utf8_lossy(&stderr.bytes).into_owned(),
        truncated,
        signal,
        wall_clock,
        timed_out,
    })
}

/// Reads a stream to its end, keeping at most `limit` bytes.
async fn drain<R>(mut reader: R, limit: usize, sink: Arc<Mutex<Captured>>)
where
    R: AsyncRead + Unpin,
{
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => sink.lock().await.append(&chunk[..n], limit),
            Err(e) => {
                debug!("stream read failed: {}", e);
                break;
            }
        }
    }
}

/// Waits up to the grace period for a reader; aborts it otherwise.
/// Whatever it captured so far stays in its buffer.
async fn settle(mut handle: JoinHandle<()>) -> bool {
    match tokio::time::timeout(TERMINATION_GRACE, &mut handle).await {
        Ok(_) => true,
        Err(_) => {
            handle.abort();
            false
        }
    }
}

/// Asks the process group to stop, then kills it if the grace period passes.
///
/// The group is only signalled while its leader is unreaped: until then the
/// leader's pid, and with it the group id, cannot be handed to another process.
async fn terminate(child: &mut Child, pid: Option<u32>) -> std::io::Result<ExitStatus> {
    match pid {
        Some(pid) if cfg!(unix) => signal_group(pid, Signal::Term),
        _ => {
            let _ = child.start_kill();
        }
    }

    match tokio::time::timeout(TERMINATION_GRACE, child.wait()).await {
        Ok(status) => status,
        Err(_) => {
            debug!(?pid, "still alive after grace period, killing");
            if let Some(pid) = pid {
                signal_group(pid, Signal::Kill);
            }
            if let Err(e) = child.start_kill() {
                debug!("start_kill failed: {}", e);
            }
            child.wait().await
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Signal {
    Term,
    Kill,
}

#[cfg(unix)]
fn signal_group(pid: u32, signal: Signal) {
    let sig = match signal {
        Signal::Term => libc::SIGTERM,
        Signal::Kill => libc::SIGKILL,
    };
    let Ok(pgid) = libc::pid_t::try_from(pid) else {
        return;
    };
    // SAFETY: kill(2) only delivers a signal; a negative pid addresses the
    // process group created for this child at spawn time.
    let rc = unsafe { libc::kill(-pgid, sig) };
    if rc != 0 {
        debug!(pgid, ?signal, "kill returned {}", std::io::Error::last_os_error());
    }
}

#[cfg(not(unix))]
fn signal_group(_pid: u32, _signal: Signal) {}

#[cfg(unix)]
fn decode_status(status: ExitStatus) -> (Option<i32>, Option<i32>) {
    use std::os::unix::process::ExitStatusExt;
    (status.code(), status.signal())
}

#[cfg(not(unix))]
fn decode_status(status: ExitStatus) -> (Option<i32>, Option<i32>) {
    (status.code(), None)
}
