//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for the harness:
//! subprocess execution with deadlines, on-disk case files, and the
//! infrastructure error type.
//!
//! 此模块为测试工具提供基础设施服务：
//! 带截止时间的子进程执行、磁盘上的用例文件以及基础设施错误类型。

pub mod command;
pub mod error;
pub mod fs;

pub use error::HarnessError;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
