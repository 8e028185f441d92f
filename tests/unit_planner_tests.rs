//! # Planner Unit Tests / 计划模块单元测试
//!
//! Filtering by category and name, and sharding across CI runners.
//!
//! 按类别和名称过滤，以及在 CI 运行器之间分片。

use conformance_runner::core::config::TestCase;
use conformance_runner::core::planner::{CaseFilter, plan_execution};

fn cases() -> Vec<TestCase> {
    ["loop_a", "loop_b", "array_a", "array_b", "parser_a"]
        .iter()
        .map(|name| {
            let mut case = TestCase::new(*name, "");
            case.category = name.split('_').next().unwrap_or_default().to_string();
            case
        })
        .collect()
}

fn names(cases: &[TestCase]) -> Vec<&str> {
    cases.iter().map(|c| c.name.as_str()).collect()
}

#[test]
fn test_empty_filter_keeps_everything() {
    let plan = plan_execution(cases(), &CaseFilter::default(), None, None).unwrap();
    assert_eq!(plan.cases_to_run.len(), 5);
    assert_eq!(plan.filtered_count, 0);
    assert!(!plan.is_distributed);
}

#[test]
fn test_category_and_name_filters_combine() {
    let filter = CaseFilter {
        categories: vec!["loop".to_string(), "array".to_string()],
        name_contains: Some("_b".to_string()),
    };
    let plan = plan_execution(cases(), &filter, None, None).unwrap();
    assert_eq!(names(&plan.cases_to_run), vec!["loop_b", "array_b"]);
    assert_eq!(plan.filtered_count, 3);
}

#[test]
fn test_sharding_is_round_robin_and_complete() {
    let mut seen = Vec::new();
    for index in 0..2 {
        let plan = plan_execution(cases(), &CaseFilter::default(), Some(2), Some(index)).unwrap();
        assert!(plan.is_distributed);
        seen.extend(names(&plan.cases_to_run).into_iter().map(str::to_string));
    }
    assert_eq!(seen, vec!["loop_a", "array_a", "parser_a", "loop_b", "array_b"]);
}

#[test]
fn test_sharding_applies_after_filtering() {
    let filter = CaseFilter {
        categories: vec!["array".to_string()],
        name_contains: None,
    };
    let plan = plan_execution(cases(), &filter, Some(2), Some(1)).unwrap();
    assert_eq!(names(&plan.cases_to_run), vec!["array_b"]);
}

#[test]
fn test_invalid_runner_flags_are_rejected() {
    assert!(plan_execution(cases(), &CaseFilter::default(), Some(2), Some(2)).is_err());
    assert!(plan_execution(cases(), &CaseFilter::default(), Some(0), Some(0)).is_err());
    assert!(plan_execution(cases(), &CaseFilter::default(), Some(2), None).is_err());
    assert!(plan_execution(cases(), &CaseFilter::default(), None, Some(0)).is_err());
}
