//! 项目管理模块
//!
//! 提供项目根目录查找功能

pub mod root_finder;

// 重导出
pub use root_finder::{find_project_root, find_project_root_or, BELMONT_DIR};
