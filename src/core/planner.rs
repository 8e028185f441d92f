//! # Test Execution Planner Module / 测试执行计划模块
//!
//! This module selects which cases of a suite run in this invocation:
//! filtering by category and name, then optionally sharding the remainder
//! across several CI runners.
//!
//! 此模块选择套件中哪些用例在本次调用中运行：
//! 先按类别和名称过滤，然后可选地将剩余用例分片到多个 CI 运行器上。

use anyhow::{Result, bail};

use crate::core::config::TestCase;
use crate::infra::t;

/// Which cases to keep. Empty filters keep everything.
/// 要保留哪些用例。空过滤条件表示保留全部。
#[derive(Debug, Clone, Default)]
pub struct CaseFilter {
    /// Exact category tags; a case must match one of them.
    /// 精确的类别标签；用例必须匹配其中之一。
    pub categories: Vec<String>,
    /// Substring that must occur in the case name.
    /// 用例名称中必须包含的子串。
    pub name_contains: Option<String>,
}

impl CaseFilter {
    pub fn matches(&self, case: &TestCase) -> bool {
        let category_ok =
            self.categories.is_empty() || self.categories.iter().any(|c| *c == case.category);
        let name_ok = self
            .name_contains
            .as_deref()
            .is_none_or(|needle| case.name.contains(needle));
        category_ok && name_ok
    }
}

/// Represents a complete execution plan for a suite.
/// 表示套件的完整执行计划。
#[derive(Debug)]
pub struct ExecutionPlan {
    /// Cases to execute, in declaration order.
    /// 要执行的用例，按声明顺序排列。
    pub cases_to_run: Vec<TestCase>,
    /// The number of cases removed by the filter.
    /// 被过滤器移除的用例数量。
    pub filtered_count: usize,
    /// Whether the cases are distributed across multiple runners (CI environment).
    /// 用例是否分布在多个运行器上（CI 环境）。
    pub is_distributed: bool,
}

/// Creates an execution plan for the given cases.
///
/// 为给定的用例创建执行计划。
///
/// # Arguments
/// * `cases` - All cases of the suite, in declaration order
/// * `filter` - Category and name filter
/// * `total_runners` - Optional total number of runners for distributed execution
/// * `runner_index` - Optional index of this runner (0-based)
pub fn plan_execution(
    cases: Vec<TestCase>,
    filter: &CaseFilter,
    total_runners: Option<usize>,
    runner_index: Option<usize>,
) -> Result<ExecutionPlan> {
    let (selected, filtered): (Vec<_>, Vec<_>) =
        cases.into_iter().partition(|case| filter.matches(case));

    let (cases_to_run, is_distributed) = match (total_runners, runner_index) {
        (Some(total), Some(index)) => {
            if total == 0 || index >= total {
                bail!("{}", t!("plan.invalid_runner_index", index = index, total = total));
            }
            let distributed_cases: Vec<_> = selected
                .into_iter()
                .enumerate()
                .filter(|(i, _)| i % total == index)
                .map(|(_, case)| case)
                .collect();
            (distributed_cases, true)
        }
        (None, None) => (selected, false),
        _ => bail!("{}", t!("plan.runner_flags_incomplete")),
    };

    Ok(ExecutionPlan {
        cases_to_run,
        filtered_count: filtered.len(),
        is_distributed,
    })
}
