//! # Init Command Module / 初始化命令模块
//!
//! This module implements the `init` command, which creates a starter suite
//! file. Interactively it asks for the compiler command and which case
//! templates to include; with `--non-interactive` it writes a commented
//! template instead.
//!
//! 此模块实现 `init` 命令，用于创建初始套件文件。交互模式下会询问编译器命令
//! 以及要包含哪些用例模板；使用 `--non-interactive` 时则写入带注释的模板。

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input, MultiSelect, theme::ColorfulTheme};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::{SuiteConfig, TestCase};
use crate::infra::t;

pub const DEFAULT_CONFIG: &str = r#"# Conformance Suite / 一致性测试套件

# Language for runner messages (en, zh-CN) / 运行器消息的语言
language = "en"

# Compiler under test; the source path is appended / 被测编译器；源文件路径附加在末尾
compiler = "./wyn"

# Working directory of both phases, relative to this file / 两个阶段的工作目录，相对于本文件
root = "."

# Where case sources are written, relative to root / 用例源文件的写入位置，相对于 root
source_dir = "target/conformance"
source_extension = "wyn"

# The compiler leaves its executable at <source><artifact_suffix> / 编译器把可执行文件放在 <源文件><后缀>
artifact_suffix = ".out"

# Per-phase deadline in seconds / 每个阶段的截止时间（秒）
default_timeout_secs = 5

[categories]
basics = "Basic Programs"
diagnostics = "Compiler Diagnostics"

[[cases]]
name = "hello_world"
category = "basics"
description = "Prints a line and exits cleanly"
source = """
fn main() -> int {
    print("Hello, World!")
    return 0
}
"""
expected_output = "Hello, World!\n"

[[cases]]
name = "rejects_undeclared_variable"
category = "diagnostics"
description = "Using an undeclared variable must not compile"
source = """
fn main() -> int {
    print(missing)
    return 0
}
"""
expect_compile_success = false

[[cases]]
name = "infinite_loop_is_bounded"
category = "basics"
description = "Compiles only; running would never finish"
source = """
fn main() -> int {
    while true {}
    return 0
}
"""
expect_run = false
"#;

/// Case templates offered by the wizard, paired with their translation key.
fn case_templates() -> Vec<(&'static str, TestCase)> {
    let hello = TestCase {
        category: "basics".to_string(),
        description: "Prints a line and exits cleanly".to_string(),
        expected_output: Some("Hello, World!\n".to_string()),
        ..TestCase::new(
            "hello_world",
            "fn main() -> int {\n    print(\"Hello, World!\")\n    return 0\n}\n",
        )
    };
    let arithmetic = TestCase {
        category: "basics".to_string(),
        description: "Integer arithmetic and printing".to_string(),
        expected_output: Some("7\n".to_string()),
        ..TestCase::new(
            "integer_arithmetic",
            "fn main() -> int {\n    var x = 3 + 4\n    print(x)\n    return 0\n}\n",
        )
    };
    let rejected = TestCase {
        category: "diagnostics".to_string(),
        description: "Using an undeclared variable must not compile".to_string(),
        expect_compile_success: false,
        ..TestCase::new(
            "rejects_undeclared_variable",
            "fn main() -> int {\n    print(missing)\n    return 0\n}\n",
        )
    };
    let compile_only = TestCase {
        category: "basics".to_string(),
        description: "Compiles only; running would never finish".to_string(),
        expect_run: false,
        ..TestCase::new(
            "infinite_loop_is_bounded",
            "fn main() -> int {\n    while true {}\n    return 0\n}\n",
        )
    };

    vec![
        ("init.template_output", hello),
        ("init.template_arithmetic", arithmetic),
        ("init.template_compile_error", rejected),
        ("init.template_compile_only", compile_only),
    ]
}

/// Executes the init command.
///
/// # Arguments
/// * `output` - Path of the suite file to create
/// * `non_interactive` - Write the commented template without prompting
/// * `language` - Language recorded in the generated suite
pub fn execute(output: &Path, non_interactive: bool, language: &str) -> Result<()> {
    if non_interactive {
        if output.exists() {
            println!("{}", t!("init.file_exists", path = output.display()).yellow());
            return Ok(());
        }
        write_config(output, DEFAULT_CONFIG)?;
        print_success(output);
        return Ok(());
    }
    run_init_wizard(output, language)
}

/// Runs the interactive wizard to generate a suite file.
///
/// 运行交互式向导以生成套件文件。
pub fn run_init_wizard(output: &Path, language: &str) -> Result<()> {
    let theme = ColorfulTheme::default();
    println!("\n{}", t!("init.welcome").bold().cyan());
    println!("{}\n", t!("init.description"));

    if !confirm_overwrite(&theme, output)? {
        println!("{}", t!("init.aborted").yellow());
        return Ok(());
    }

    let compiler: String = Input::with_theme(&theme)
        .with_prompt(t!("init.compiler_prompt").to_string())
        .default("./wyn".to_string())
        .interact_text()?;
    let source_extension: String = Input::with_theme(&theme)
        .with_prompt(t!("init.extension_prompt").to_string())
        .default("wyn".to_string())
        .interact_text()?;
    let default_timeout_secs: u64 = Input::with_theme(&theme)
        .with_prompt(t!("init.timeout_prompt").to_string())
        .default(5)
        .interact_text()?;

    let templates = case_templates();
    let labels: Vec<String> = templates.iter().map(|&(key, _)| t!(key).to_string()).collect();
    let selections = MultiSelect::with_theme(&theme)
        .with_prompt(t!("init.case_selection_prompt").to_string())
        .items(&labels)
        .defaults(&[true, false, true, false])
        .interact()?;

    let mut cases: Vec<TestCase> = templates
        .into_iter()
        .enumerate()
        .filter(|(i, _)| selections.contains(i))
        .map(|(_, (_, case))| case)
        .collect();
    if cases.is_empty() {
        // A suite needs at least one case to load.
        println!("{}", t!("init.no_cases_selected").yellow());
        cases.extend(case_templates().into_iter().take(1).map(|(_, case)| case));
    }

    let suite = SuiteConfig {
        language: Some(language.to_string()),
        compiler,
        root: PathBuf::from("."),
        source_dir: PathBuf::from("target/conformance"),
        source_extension,
        artifact_suffix: ".out".to_string(),
        default_timeout_secs,
        output_limit_bytes: 1024 * 1024,
        jobs: None,
        fault_exit_codes: vec![139, -1_073_741_819],
        fault_signals: None,
        categories: BTreeMap::from([
            ("basics".to_string(), "Basic Programs".to_string()),
            ("diagnostics".to_string(), "Compiler Diagnostics".to_string()),
        ]),
        cases,
    };
    suite.validate()?;

    let toml_string =
        toml::to_string_pretty(&suite).context(t!("init.serialize_failed").to_string())?;
    write_config(output, &toml_string)?;
    print_success(output);
    Ok(())
}

/// Asks before replacing an existing file; `true` when there is nothing to replace.
fn confirm_overwrite(theme: &ColorfulTheme, output: &Path) -> Result<bool> {
    if output.exists() {
        Confirm::with_theme(theme)
            .with_prompt(t!("init.overwrite_prompt", path = output.display()).to_string())
            .default(false)
            .interact()
            .context(t!("init.confirmation_failed").to_string())
    } else {
        Ok(true)
    }
}

fn write_config(output: &Path, content: &str) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| {
            t!("init.create_parent_dir_failed", path = parent.display()).to_string()
        })?;
    }
    fs::write(output, content)
        .with_context(|| t!("init.write_failed", path = output.display()).to_string())
}

fn print_success(output: &Path) {
    println!(
        "\n{} {}",
        "✔".green(),
        t!("init.success", path = output.display()).bold()
    );
    println!("{}", t!("init.next_steps", path = output.display()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_is_a_valid_suite() {
        let suite: SuiteConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        suite.validate().unwrap();
        assert_eq!(suite.cases.len(), 3);
        assert!(!suite.cases[1].expect_compile_success);
        assert!(!suite.cases[2].expect_run);
        assert_eq!(suite.category_title("diagnostics"), "Compiler Diagnostics");
    }

    #[test]
    fn wizard_templates_have_unique_names() {
        let templates = case_templates();
        let mut names: Vec<_> = templates.iter().map(|(_, c)| c.file_stem()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), templates.len());
    }
}
