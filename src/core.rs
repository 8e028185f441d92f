//! # Core Module / 核心模块
//!
//! This module contains the core functionality of the conformance runner:
//! data models, suite configuration, outcome classification, per-case
//! execution, suite scheduling and summary statistics.
//!
//! 此模块包含一致性测试运行器的核心功能：
//! 数据模型、套件配置、结果分类、单用例执行、套件调度和汇总统计。

pub mod classifier;
pub mod config;
pub mod execution;
pub mod models;
pub mod planner;
pub mod suite;
pub mod summary;

// Re-exports
pub use classifier::{FaultPolicy, classify};
pub use config::{SuiteConfig, TestCase};
pub use execution::{ExecutorSettings, TestExecutor};
pub use models::{ProcessOutcome, SuiteReport, TestReport, Verdict};
pub use suite::run_suite;
pub use summary::{Summary, summarize};
