//! # Command-Line Interface Module / 命令行接口模块
//!
//! Builds the `clap` command tree with translated help text and dispatches
//! to the `run` and `init` commands.
//!
//! 使用翻译后的帮助文本构建 `clap` 命令树，并分派到 `run` 和 `init` 命令。

pub mod commands;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::core::config::DEFAULT_CONFIG_FILE;
use crate::infra::t;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for `--lang <VALUE>` or `--lang=<VALUE>`.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    if let Some(pos) = args.iter().position(|arg| arg == "--lang") {
        return args.get(pos + 1).cloned();
    }
    args.iter()
        .find_map(|arg| arg.strip_prefix("--lang="))
        .map(str::to_string)
}

fn path_arg(id: &'static str, value_name: &'static str, help: String) -> Arg {
    Arg::new(id)
        .long(id)
        .help(help)
        .value_name(value_name)
        .value_parser(clap::value_parser!(PathBuf))
        .action(ArgAction::Set)
}

pub fn build_cli() -> Command {
    Command::new("conformance-runner")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about").to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli.lang").to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cli.run_about").to_string())
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help(t!("cli.arg_config").to_string())
                        .value_name("CONFIG")
                        .default_value(DEFAULT_CONFIG_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("jobs")
                        .short('j')
                        .long("jobs")
                        .help(t!("cli.arg_jobs").to_string())
                        .value_name("JOBS")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                )
                .arg(path_arg("root", "DIR", t!("cli.arg_root").to_string()))
                .arg(
                    Arg::new("compiler")
                        .long("compiler")
                        .help(t!("cli.arg_compiler").to_string())
                        .value_name("COMMAND")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("category")
                        .long("category")
                        .help(t!("cli.arg_category").to_string())
                        .value_name("CATEGORY")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("filter")
                        .long("filter")
                        .help(t!("cli.arg_filter").to_string())
                        .value_name("SUBSTRING")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("total-runners")
                        .long("total-runners")
                        .help(t!("cli.arg_total_runners").to_string())
                        .value_name("TOTAL_RUNNERS")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set)
                        .requires("runner-index"),
                )
                .arg(
                    Arg::new("runner-index")
                        .long("runner-index")
                        .help(t!("cli.arg_runner_index").to_string())
                        .value_name("RUNNER_INDEX")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set)
                        .requires("total-runners"),
                )
                .arg(path_arg("markdown", "MARKDOWN", t!("cli.arg_markdown").to_string()))
                .arg(path_arg("html", "HTML", t!("cli.arg_html").to_string()))
                .arg(path_arg("json", "JSON", t!("cli.arg_json").to_string())),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cli.init_about").to_string())
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("cli.arg_non_interactive").to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help(t!("cli.arg_output").to_string())
                        .value_name("PATH")
                        .default_value(DEFAULT_CONFIG_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
}

fn run_options(matches: &ArgMatches, language: Option<String>) -> commands::run::RunOptions {
    commands::run::RunOptions {
        config: matches
            .get_one::<PathBuf>("config")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
        jobs: matches.get_one::<usize>("jobs").copied(),
        root: matches.get_one::<PathBuf>("root").cloned(),
        compiler: matches.get_one::<String>("compiler").cloned(),
        categories: matches
            .get_many::<String>("category")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        name_filter: matches.get_one::<String>("filter").cloned(),
        total_runners: matches.get_one::<usize>("total-runners").copied(),
        runner_index: matches.get_one::<usize>("runner-index").copied(),
        markdown: matches.get_one::<PathBuf>("markdown").cloned(),
        html: matches.get_one::<PathBuf>("html").cloned(),
        json: matches.get_one::<PathBuf>("json").cloned(),
        language,
    }
}

/// Parses the command line and runs the chosen command.
///
/// Returns the number of high-severity cases (`Crash` + `Segfault`), which
/// becomes the process exit code; `init` always returns zero.
///
/// 解析命令行并运行所选命令。
///
/// 返回高严重度用例（`Crash` + `Segfault`）的数量，作为进程退出码；
/// `init` 始终返回零。
pub async fn run() -> Result<usize> {
    // Pre-parse language and initialize i18n first.
    let language = pre_parse_language();
    crate::apply_locale(language.as_deref());

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("run", run_matches)) => commands::run::execute(run_options(run_matches, language)).await,
        Some(("init", init_matches)) => {
            let non_interactive = init_matches.get_flag("non-interactive");
            let output = init_matches
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            commands::init::execute(&output, non_interactive, &rust_i18n::locale())?;
            Ok(0)
        }
        // `subcommand_required` makes clap exit before reaching this arm.
        _ => Ok(0),
    }
}
