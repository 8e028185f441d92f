//! # Reporting Module / 报告模块
//!
//! This module handles the display and export of suite results: live
//! progress and a coloured summary on the console, plus Markdown, HTML and
//! JSON report files.
//!
//! 此模块处理套件结果的显示与导出：控制台上的实时进度和彩色摘要，
//! 以及 Markdown、HTML 和 JSON 报告文件。

pub mod console;
pub mod html;
pub mod json;
pub mod markdown;

// Re-export common reporting functions
pub use console::{print_failure_details, print_summary};
pub use html::generate_html_report;
pub use json::write_json_report;
pub use markdown::write_markdown_report;
