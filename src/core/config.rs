//! # Suite Configuration Module / 套件配置模块
//!
//! Defines the test case model and the suite file (`Conformance.toml`) that
//! declares the compiler under test, harness settings, and every case.
//!
//! 定义测试用例模型以及套件文件（`Conformance.toml`），
//! 该文件声明被测编译器、工具设置和所有用例。

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::classifier::FaultPolicy;
use crate::infra::t;

/// Default name of the suite file.
/// 套件文件的默认名称。
pub const DEFAULT_CONFIG_FILE: &str = "Conformance.toml";

/// Category assigned to cases that do not declare one.
pub const DEFAULT_CATEGORY: &str = "general";

/// One scenario: a program, what the compiler should do with it, and what the
/// produced artifact should print. Immutable once the suite is loaded.
///
/// 一个场景：一段程序、编译器应如何处理它，以及生成的产物应输出什么。
/// 套件加载后不可变。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TestCase {
    /// Unique name, also used to derive the on-disk file name.
    /// 唯一名称，同时用于生成磁盘上的文件名。
    pub name: String,
    /// Free-form description shown in reports.
    /// 报告中显示的自由格式描述。
    #[serde(default)]
    pub description: String,
    /// Grouping tag used only for reporting.
    /// 仅用于报告的分组标签。
    #[serde(default = "default_category")]
    pub category: String,
    /// The program text handed to the compiler.
    /// 交给编译器的程序文本。
    pub source: String,
    /// Whether the compile phase is expected to exit zero.
    /// 编译阶段是否预期以零退出。
    #[serde(default = "default_true", alias = "should_compile")]
    pub expect_compile_success: bool,
    /// Whether a run phase should be attempted at all.
    /// 是否应尝试运行阶段。
    #[serde(default = "default_true", alias = "should_run")]
    pub expect_run: bool,
    /// Exact expected stdout (trailing whitespace ignored). `None` accepts any output.
    /// 精确的预期标准输出（忽略尾部空白）。`None` 表示接受任何输出。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
    /// Per-phase budget in seconds; falls back to the suite default.
    /// 每个阶段的时间预算（秒）；未设置时使用套件默认值。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Run-phase budget in seconds; falls back to `timeout_secs`.
    /// 运行阶段的时间预算（秒）；未设置时使用 `timeout_secs`。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_timeout_secs: Option<u64>,
}

impl TestCase {
    /// A case that must compile, run, and may print anything.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn compile_timeout(&self, default: Duration) -> Duration {
        self.timeout_secs.map(Duration::from_secs).unwrap_or(default)
    }

    pub fn run_timeout(&self, default: Duration) -> Duration {
        self.run_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| self.compile_timeout(default))
    }

    /// File-system safe form of the name. Deterministic, so reruns overwrite.
    /// 名称的文件系统安全形式。结果是确定的，因此重新运行会覆盖旧文件。
    pub fn file_stem(&self) -> String {
        sanitize_name(&self.name)
    }
}

impl Default for TestCase {
    fn default() -> Self {
        Self {
            name: "unknown".to_string(),
            description: String::new(),
            category: default_category(),
            source: String::new(),
            expect_compile_success: true,
            expect_run: true,
            expected_output: None,
            timeout_secs: None,
            run_timeout_secs: None,
        }
    }
}

/// The whole suite file: harness settings plus the ordered list of cases.
///
/// 整个套件文件：工具设置加上有序的用例列表。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SuiteConfig {
    /// Language for the runner's messages (e.g. "en", "zh-CN"). When absent
    /// the system locale is used.
    /// 运行器消息的语言（例如 "en"、"zh-CN"）。未设置时使用系统语言。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Command line of the compiler under test. The source path is appended.
    /// `~` and environment variables are expanded; quoting follows shell rules.
    ///
    /// 被测编译器的命令行。源文件路径会附加在末尾。
    /// 会展开 `~` 和环境变量；引号遵循 shell 规则。
    pub compiler: String,

    /// Working directory of both phases, relative to the suite file.
    /// 两个阶段的工作目录，相对于套件文件。
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Where case sources are written, relative to `root`.
    /// 用例源文件的写入位置，相对于 `root`。
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    /// Appended to the source path to locate the compiled artifact.
    /// 附加到源文件路径之后以定位编译产物。
    #[serde(default = "default_artifact_suffix")]
    pub artifact_suffix: String,

    #[serde(default = "default_timeout_secs")]
    pub default_timeout_secs: u64,

    /// Cap on captured bytes per stream.
    /// 每个流捕获字节数的上限。
    #[serde(default = "default_output_limit")]
    pub output_limit_bytes: usize,

    /// Parallel workers; the CLI `--jobs` flag takes precedence.
    /// 并行工作数；CLI 的 `--jobs` 参数优先。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,

    /// Exit codes treated as a fault (e.g. 139 from a shell reporting SIGSEGV).
    /// 视为故障的退出码（例如 shell 报告 SIGSEGV 时的 139）。
    #[serde(default = "default_fault_exit_codes")]
    pub fault_exit_codes: Vec<i32>,

    /// Signals treated as a fault. Defaults to the platform's SEGV/BUS/ILL/FPE.
    /// 视为故障的信号。默认为平台的 SEGV/BUS/ILL/FPE。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault_signals: Option<Vec<i32>>,

    /// Display titles for categories, keyed by category tag.
    /// 类别的显示标题，以类别标签为键。
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub categories: BTreeMap<String, String>,

    pub cases: Vec<TestCase>,
}

impl SuiteConfig {
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }

    pub fn fault_policy(&self) -> FaultPolicy {
        FaultPolicy {
            signals: self
                .fault_signals
                .clone()
                .unwrap_or_else(FaultPolicy::default_signals),
            exit_codes: self.fault_exit_codes.clone(),
        }
    }

    /// Rejects suites the harness cannot run meaningfully: no cases, duplicate
    /// names (including names that collide once sanitized for the file system),
    /// zero timeouts, an empty compiler command, or an artifact suffix that
    /// would make the artifact path equal the source path.
    ///
    /// 拒绝工具无法有效运行的套件：没有用例、名称重复
    /// （包括在文件系统清理后冲突的名称）、超时为零或编译器命令为空。
    pub fn validate(&self) -> Result<()> {
        if self.compiler.trim().is_empty() {
            bail!("{}", t!("config.empty_compiler"));
        }
        if self.artifact_suffix.is_empty() {
            bail!("{}", t!("config.empty_artifact_suffix"));
        }
        if self.cases.is_empty() {
            bail!("{}", t!("config.no_cases"));
        }
        if self.default_timeout_secs == 0 {
            bail!("{}", t!("config.zero_timeout", name = "default_timeout_secs"));
        }

        let mut stems: HashMap<String, &str> = HashMap::new();
        for case in &self.cases {
            if case.name.trim().is_empty() {
                bail!("{}", t!("config.empty_case_name"));
            }
            if case.timeout_secs == Some(0) || case.run_timeout_secs == Some(0) {
                bail!("{}", t!("config.zero_timeout", name = &case.name));
            }
            // Case-insensitive file systems would map `Loop` and `loop` to one file.
            if let Some(previous) = stems.insert(case.file_stem().to_lowercase(), &case.name) {
                bail!(
                    "{}",
                    t!("config.duplicate_case", first = previous, second = &case.name)
                );
            }
        }
        Ok(())
    }

    /// Display title for a category: the configured one, or the tag with
    /// underscores turned into spaces and each word capitalised.
    pub fn category_title(&self, category: &str) -> String {
        self.categories
            .get(category)
            .cloned()
            .unwrap_or_else(|| title_case(category))
    }
}

/// Loads and validates a suite file.
///
/// 加载并验证套件文件。
pub fn load_suite(path: &Path) -> Result<SuiteConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| t!("config.read_failed", path = path.display()).to_string())?;
    let suite: SuiteConfig =
        toml::from_str(&content)
        .with_context(|| t!("config.parse_failed", path = path.display()).to_string())?;
    suite.validate()?;
    Ok(suite)
}

/// Splits a shell-style command line into program and arguments, expanding
/// `~` and environment variables first.
///
/// 将 shell 风格的命令行拆分为程序和参数，先展开 `~` 和环境变量。
pub fn parse_command_line(command: &str) -> Result<(String, Vec<String>)> {
    let expanded = shellexpand::full(command)
        .with_context(|| t!("config.expand_failed", command = command).to_string())?
        .to_string();

    let mut parts = shlex::split(&expanded)
        .ok_or_else(|| anyhow::anyhow!("{}", t!("config.split_failed", command = &expanded)))?;

    if parts.is_empty() {
        bail!("{}", t!("config.empty_compiler"));
    }
    let program = parts.remove(0);
    Ok((program, parts))
}

pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

pub fn title_case(tag: &str) -> String {
    tag.split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn default_true() -> bool {
    true
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("target/conformance")
}

fn default_source_extension() -> String {
    "src".to_string()
}

fn default_artifact_suffix() -> String {
    ".out".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_output_limit() -> usize {
    1024 * 1024
}

fn default_fault_exit_codes() -> Vec<i32> {
    // 128 + SIGSEGV as reported by shells, and Windows STATUS_ACCESS_VIOLATION.
    vec![139, -1_073_741_819]
}
