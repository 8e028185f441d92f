//! # Conformance Runner Library / Conformance Runner 库
//!
//! This library provides the core functionality of the conformance runner,
//! a configuration-driven harness that feeds small programs to a compiler
//! under test, runs what it produces, and classifies every case as
//! Pass, Fail, Crash, Segfault or Timeout.
//!
//! 此库为一致性测试运行器提供核心功能。这是一个配置驱动的测试工具，
//! 它把小程序交给被测编译器、运行其产物，并把每个用例分类为
//! Pass、Fail、Crash、Segfault 或 Timeout。
//!
//! ## Modules / 模块
//!
//! - `core` - Data models, configuration, classification, execution and summaries
//! - `infra` - Subprocess execution, case files and infrastructure errors
//! - `reporting` - Console output and Markdown/HTML/JSON reports
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 数据模型、配置、分类、执行和汇总
//! - `infra` - 子进程执行、用例文件和基础设施错误
//! - `reporting` - 控制台输出以及 Markdown/HTML/JSON 报告
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::config;
pub use core::execution;
pub use core::models;

/// Sets the interface language.
///
/// `preferred` (from `--lang` or the suite file) wins; otherwise the system
/// locale is used. The full locale (e.g. "zh-CN") is tried first, then the
/// language part alone, then "en". Returns the locale that was applied.
///
/// 设置界面语言。优先使用 `preferred`（来自 `--lang` 或套件文件），
/// 否则使用系统语言。先尝试完整的语言区域（如 "zh-CN"），再尝试仅语言部分，
/// 最后回退到 "en"。返回实际应用的语言区域。
pub fn apply_locale(preferred: Option<&str>) -> String {
    let locale = preferred
        .map(str::to_string)
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    let lang = if available_locales.contains(&locale.as_str()) {
        locale.as_str()
    } else {
        locale
            .split(['-', '_'])
            .next()
            .filter(|code| !code.is_empty())
            .and_then(|code| available_locales.iter().copied().find(|l| l.starts_with(code)))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
    lang.to_string()
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
