//! # File System Operations Module / 文件系统操作模块
//!
//! Case-scoped files on disk: where a case's source is written and where the
//! compiler is expected to leave its artifact. Names are derived only from the
//! case name, so reruns overwrite and concurrent cases never collide.
//!
//! 磁盘上以用例为范围的文件：用例源文件的写入位置，以及编译器应放置产物的位置。
//! 文件名仅由用例名称派生，因此重新运行会覆盖，并发用例之间也不会冲突。

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::infra::error::HarnessError;

/// The pair of paths owned by one case.
/// 一个用例拥有的路径对。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasePaths {
    pub source: PathBuf,
    pub artifact: PathBuf,
}

impl CasePaths {
    /// `<source_dir>/<stem>.<extension>` and the same path with `artifact_suffix`
    /// appended, e.g. `loops.src` → `loops.src.out`.
    pub fn new(source_dir: &Path, stem: &str, extension: &str, artifact_suffix: &str) -> Self {
        let file_name = if extension.is_empty() {
            stem.to_string()
        } else {
            format!("{stem}.{}", extension.trim_start_matches('.'))
        };
        let source = source_dir.join(file_name);
        let artifact = artifact_path(&source, artifact_suffix);
        Self { source, artifact }
    }
}

/// Applies the fixed suffix transformation from source path to artifact path.
/// 将固定的后缀变换从源文件路径应用到产物路径。
pub fn artifact_path(source: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = source.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Writes the case source (creating its directory) and removes any artifact
/// left over from a previous run, so a missing artifact is detected reliably.
///
/// 写入用例源文件（必要时创建目录），并删除上次运行遗留的产物，
/// 以便可靠地检测产物缺失。
pub async fn materialize_source(paths: &CasePaths, text: &str) -> Result<(), HarnessError> {
    if let Some(parent) = paths.source.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| HarnessError::WriteSource {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    tokio::fs::write(&paths.source, text)
        .await
        .map_err(|source| HarnessError::WriteSource {
            path: paths.source.clone(),
            source,
        })?;

    match tokio::fs::remove_file(&paths.artifact).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(HarnessError::RemoveArtifact {
            path: paths.artifact.clone(),
            source,
        }),
    }
}

pub async fn artifact_exists(path: &Path) -> Result<bool, HarnessError> {
    tokio::fs::try_exists(path)
        .await
        .map_err(|source| HarnessError::ProbeArtifact {
            path: path.to_path_buf(),
            source,
        })
}

/// Gets the absolute path from a potentially relative path.
///
/// # Arguments
/// * `path` - Path to canonicalize
///
/// # Returns
/// Canonicalized absolute path, or an error if the path doesn't exist
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).with_context(|| format!("Failed to resolve path: {}", path.display()))
}

/// Resolves `path` against `base` unless it is already absolute.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
