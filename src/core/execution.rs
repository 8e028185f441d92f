//! # Test Execution Engine Module / 测试执行引擎模块
//!
//! This module drives the full lifecycle of a single case: write the source,
//! compile it, optionally run the produced artifact, classify, and record.
//! Infrastructure errors never escape a case; they become a `Crash` verdict.
//!
//! 此模块驱动单个用例的完整生命周期：写入源文件、编译、
//! 可选地运行生成的产物、分类并记录。
//! 基础设施错误绝不会越过用例边界，而是变成 `Crash` 判定。

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    core::{
        classifier::{Classification, FaultPolicy, classify_compile, classify_run},
        config::{SuiteConfig, TestCase, parse_command_line},
        models::{ProcessOutcome, TestReport, Verdict},
    },
    infra::{
        HarnessError,
        command::{Invocation, ProcessRunner, SubprocessRunner},
        fs::{self, CasePaths, absolute_path, resolve_against},
    },
    reporting::console::{print_case_finished, print_case_started},
};

/// Everything the executor needs to know about the compiler under test and
/// where cases live on disk. Resolved once, shared by every case.
///
/// 执行器需要了解的关于被测编译器以及用例在磁盘上位置的全部信息。
/// 只解析一次，由所有用例共享。
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorSettings {
    /// Compiler program; relative paths with a separator are anchored at `root`.
    /// 编译器程序；带有路径分隔符的相对路径以 `root` 为基准。
    pub compiler: PathBuf,
    /// Arguments placed before the source path.
    /// 放在源文件路径之前的参数。
    pub compiler_args: Vec<String>,
    /// Working directory of both phases.
    /// 两个阶段的工作目录。
    pub root: PathBuf,
    pub source_dir: PathBuf,
    pub source_extension: String,
    pub artifact_suffix: String,
    pub default_timeout: Duration,
    pub output_limit: usize,
    pub faults: FaultPolicy,
}

impl ExecutorSettings {
    /// Resolves the suite's settings. Relative `root` is anchored at
    /// `config_dir` (the suite file's directory) and must exist.
    ///
    /// 解析套件的设置。相对的 `root` 以 `config_dir`（套件文件所在目录）为基准，且必须存在。
    pub fn from_config(config: &SuiteConfig, config_dir: &Path) -> Result<Self> {
        let root = absolute_path(&resolve_against(config_dir, &config.root))?;
        let (program, compiler_args) = parse_command_line(&config.compiler)?;

        Ok(Self {
            compiler: resolve_program(&root, &program),
            compiler_args,
            source_dir: resolve_against(&root, &config.source_dir),
            root,
            source_extension: config.source_extension.clone(),
            artifact_suffix: config.artifact_suffix.clone(),
            default_timeout: config.default_timeout(),
            output_limit: config.output_limit_bytes,
            faults: config.fault_policy(),
        })
    }
}

/// Bare names (`wync`) are left for `PATH` lookup; anything containing a
/// separator is a path and is anchored at the working directory.
fn resolve_program(root: &Path, program: &str) -> PathBuf {
    let path = Path::new(program);
    if path.components().count() > 1 {
        resolve_against(root, path)
    } else {
        path.to_path_buf()
    }
}

/// Outcomes recorded so far; survives an infrastructure error mid-case.
#[derive(Debug, Default)]
struct Phases {
    compile: Option<ProcessOutcome>,
    run: Option<ProcessOutcome>,
}

/// Runs single cases. Cheap to clone; every clone shares the same settings
/// and process runner.
///
/// 运行单个用例。克隆开销很小；所有克隆共享相同的设置和进程运行器。
#[derive(Debug)]
pub struct TestExecutor<R = SubprocessRunner> {
    settings: Arc<ExecutorSettings>,
    runner: Arc<R>,
}

impl<R> Clone for TestExecutor<R> {
    fn clone(&self) -> Self {
        Self {
            settings: Arc::clone(&self.settings),
            runner: Arc::clone(&self.runner),
        }
    }
}

impl TestExecutor<SubprocessRunner> {
    pub fn new(settings: ExecutorSettings) -> Self {
        Self::with_runner(settings, SubprocessRunner)
    }
}

impl<R: ProcessRunner> TestExecutor<R> {
    pub fn with_runner(settings: ExecutorSettings, runner: R) -> Self {
        Self {
            settings: Arc::new(settings),
            runner: Arc::new(runner),
        }
    }

    pub fn settings(&self) -> &ExecutorSettings {
        &self.settings
    }

    /// Source and artifact locations of a case.
    pub fn case_paths(&self, case: &TestCase) -> CasePaths {
        CasePaths::new(
            &self.settings.source_dir,
            &case.file_stem(),
            &self.settings.source_extension,
            &self.settings.artifact_suffix,
        )
    }

    /// Executes one case end to end. Never fails: every outcome, including a
    /// broken harness, is expressed as a verdict in the returned report.
    ///
    /// 端到端地执行一个用例。永不失败：所有结果（包括工具自身故障）
    /// 都以返回报告中的判定来表达。
    pub async fn execute(&self, case: &TestCase) -> TestReport {
        print_case_started(case);

        let mut phases = Phases::default();
        let classification = match self.drive(case, &mut phases).await {
            Ok(classification) => classification,
            Err(err) => {
                warn!(case = %case.name, "harness error: {}", err);
                Classification::new(Verdict::Crash, format!("internal harness error: {err}"))
            }
        };

        let report = TestReport::new(
            case,
            classification.verdict,
            classification.diagnostic,
            phases.compile,
            phases.run,
        );
        print_case_finished(&report);
        report
    }

    async fn drive(
        &self,
        case: &TestCase,
        phases: &mut Phases,
    ) -> Result<Classification, HarnessError> {
        let faults = &self.settings.faults;
        let paths = self.case_paths(case);
        fs::materialize_source(&paths, &case.source).await?;

        let compile = self.runner.run(&self.compile_invocation(case, &paths)).await?;
        let compile = phases.compile.insert(compile);
        if let Some(classification) = classify_compile(case, compile, faults) {
            debug!(case = %case.name, verdict = %classification.verdict, "decided after compile phase");
            return Ok(classification);
        }

        if !fs::artifact_exists(&paths.artifact).await? {
            debug!(case = %case.name, artifact = %paths.artifact.display(), "artifact missing");
            return Ok(classify_run(case, None, faults));
        }

        let run = self.runner.run(&self.run_invocation(case, &paths)).await?;
        let run = phases.run.insert(run);
        Ok(classify_run(case, Some(&*run), faults))
    }

    /// `<compiler> [compiler args…] <source path>`
    pub fn compile_invocation(&self, case: &TestCase, paths: &CasePaths) -> Invocation {
        let mut args = self.settings.compiler_args.clone();
        args.push(paths.source.to_string_lossy().into_owned());
        Invocation {
            program: self.settings.compiler.clone(),
            args,
            working_dir: self.settings.root.clone(),
            timeout: case.compile_timeout(self.settings.default_timeout),
            output_limit: self.settings.output_limit,
        }
    }

    pub fn run_invocation(&self, case: &TestCase, paths: &CasePaths) -> Invocation {
        Invocation {
            program: paths.artifact.clone(),
            args: Vec::new(),
            working_dir: self.settings.root.clone(),
            timeout: case.run_timeout(self.settings.default_timeout),
            output_limit: self.settings.output_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_compiler_names_stay_on_path() {
        let root = Path::new("/suite");
        assert_eq!(resolve_program(root, "wync"), PathBuf::from("wync"));
        assert_eq!(resolve_program(root, "./bin/wync"), PathBuf::from("/suite/./bin/wync"));
        assert_eq!(resolve_program(root, "/usr/bin/wync"), PathBuf::from("/usr/bin/wync"));
    }
}
