//! # Harness Error Module / 工具错误模块
//!
//! Infrastructure errors that can occur while driving a single case. None of
//! them escapes the case boundary: the executor turns each one into a `Crash`
//! verdict with the error text as diagnostic.
//!
//! 驱动单个用例时可能发生的基础设施错误。它们都不会越过用例边界：
//! 执行器会把每个错误转换为 `Crash` 判定，并以错误文本作为诊断信息。

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("cannot write source file '{path}': {source}")]
    WriteSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot remove stale artifact '{path}': {source}")]
    RemoveArtifact {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot probe artifact '{path}': {source}")]
    ProbeArtifact {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for '{program}': {source}")]
    Wait {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{stream} of '{program}' could not be captured")]
    CaptureStream {
        program: PathBuf,
        stream: &'static str,
    },
}
