//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command: load the suite file, apply
//! command-line overrides, plan which cases to run, execute them on the
//! worker pool, then print and export the results.
//!
//! 此模块实现 `run` 命令：加载套件文件、应用命令行覆盖、
//! 规划要运行的用例、在工作池上执行它们，然后打印并导出结果。

use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{
    core::{
        config::{self, SuiteConfig},
        execution::{ExecutorSettings, TestExecutor},
        planner::{self, CaseFilter},
        suite::run_suite,
        summary::{Summary, summarize_with},
    },
    infra::{fs::absolute_path, t},
    reporting::{
        console::{print_failure_details, print_summary},
        generate_html_report, write_json_report, write_markdown_report,
    },
};

/// Everything the `run` command accepts from the command line.
/// `run` 命令从命令行接收的全部参数。
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config: PathBuf,
    pub jobs: Option<usize>,
    /// Overrides the suite's `root`; relative to the current directory.
    /// 覆盖套件的 `root`；相对于当前目录。
    pub root: Option<PathBuf>,
    /// Overrides the suite's `compiler` command line.
    /// 覆盖套件的 `compiler` 命令行。
    pub compiler: Option<String>,
    pub categories: Vec<String>,
    pub name_filter: Option<String>,
    pub total_runners: Option<usize>,
    pub runner_index: Option<usize>,
    pub markdown: Option<PathBuf>,
    pub html: Option<PathBuf>,
    pub json: Option<PathBuf>,
    /// Language given with `--lang`; wins over the suite file.
    /// 通过 `--lang` 指定的语言；优先于套件文件。
    pub language: Option<String>,
}

/// Worker count when neither `--jobs` nor the suite file sets one.
pub fn default_jobs() -> usize {
    num_cpus::get() / 2 + 1
}

/// Executes the run command.
///
/// Returns the number of `Crash` + `Segfault` cases.
///
/// 执行运行命令。返回 `Crash` + `Segfault` 用例的数量。
pub async fn execute(options: RunOptions) -> Result<usize> {
    let (mut suite, config_path) = setup_and_parse_config(&options.config)?;
    if options.language.is_none() {
        if let Some(language) = suite.language.as_deref() {
            crate::apply_locale(Some(language));
        }
    }
    apply_overrides(&mut suite, &options)?;

    println!("{}", t!("run.loading_suite", path = config_path.display()));

    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    let settings = ExecutorSettings::from_config(&suite, config_dir)?;
    println!("{}", t!("run.compiler", command = &suite.compiler).cyan());
    println!("{}", t!("run.root", path = settings.root.display()).cyan());
    debug!(?settings, "resolved executor settings");

    let filter = CaseFilter {
        categories: options.categories.clone(),
        name_contains: options.name_filter.clone(),
    };
    let plan = planner::plan_execution(
        suite.cases.clone(),
        &filter,
        options.total_runners,
        options.runner_index,
    )?;

    if plan.filtered_count > 0 {
        println!(
            "{}",
            t!(
                "run.filtered_cases",
                filtered = plan.filtered_count,
                total = suite.cases.len()
            )
            .cyan()
        );
    }

    if plan.cases_to_run.is_empty() {
        println!("{}", t!("run.no_cases_to_run").green());
        return Ok(0);
    }

    let jobs = options.jobs.or(suite.jobs).unwrap_or_else(default_jobs).max(1);
    if let (true, Some(total), Some(index)) =
        (plan.is_distributed, options.total_runners, options.runner_index)
    {
        println!(
            "{}",
            t!(
                "run.running_as_split_runner",
                index = index + 1,
                total = total,
                count = plan.cases_to_run.len()
            )
            .bold()
        );
    } else {
        println!(
            "{}",
            t!("run.running_as_single_runner", count = plan.cases_to_run.len(), jobs = jobs).bold()
        );
    }

    let executor = TestExecutor::new(settings);
    let report = run_suite(plan.cases_to_run, &executor, jobs).await;
    let summary = summarize_with(&report, &suite);

    print_summary(&report, &summary);
    print_failure_details(&report);
    export_reports(&report, &summary, &options)?;

    let high_severity = summary.high_severity();
    if high_severity == 0 {
        println!("\n{}", t!("run.no_high_severity").green().bold());
    } else {
        println!("\n{}", t!("run.high_severity", count = high_severity).red().bold());
    }
    Ok(high_severity)
}

/// Canonicalizes the suite path and loads the suite.
fn setup_and_parse_config(config_path_arg: &Path) -> Result<(SuiteConfig, PathBuf)> {
    let config_path = std::fs::canonicalize(config_path_arg).with_context(|| {
        t!("config.read_failed", path = config_path_arg.display()).to_string()
    })?;
    let suite = config::load_suite(&config_path)?;
    Ok((suite, config_path))
}

fn apply_overrides(suite: &mut SuiteConfig, options: &RunOptions) -> Result<()> {
    if let Some(root) = &options.root {
        suite.root = absolute_path(root)?;
    }
    if let Some(compiler) = &options.compiler {
        suite.compiler = compiler.clone();
        suite.validate()?;
    }
    Ok(())
}

fn export_reports(report: &crate::core::SuiteReport, summary: &Summary, options: &RunOptions) -> Result<()> {
    if let Some(path) = &options.markdown {
        println!("{}", t!("run.writing_report", kind = "Markdown", path = path.display()));
        write_markdown_report(report, summary, path)?;
    }
    if let Some(path) = &options.html {
        println!("{}", t!("run.writing_report", kind = "HTML", path = path.display()));
        generate_html_report(report, summary, path)?;
    }
    if let Some(path) = &options.json {
        println!("{}", t!("run.writing_report", kind = "JSON", path = path.display()));
        write_json_report(report, summary, path)?;
    }
    Ok(())
}
