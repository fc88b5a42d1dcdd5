//! 项目根目录查找
//!
//! 支持多种场景：
//! - 向上遍历父目录查找 .belmont
//! - Git superproject（submodule 的父项目）
//! - Git 仓库根目录

use crate::utils::git::{get_git_root, get_git_superproject_root};
use std::path::{Path, PathBuf};

/// 项目级 belmont 目录名
pub const BELMONT_DIR: &str = ".belmont";

const MAX_DEPTH: usize = 10;

/// 查找项目根目录
///
/// 搜索顺序：
/// 1. 从 `start` 向上遍历（最多 10 层），找到包含 .belmont 的目录
/// 2. Git superproject（submodule 的父项目）
/// 3. Git 仓库根目录
///
/// # Returns
///
/// 返回项目根目录，如果找不到返回 None
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    // 方法1: 向上遍历
    let mut current = Some(start);
    for _ in 0..MAX_DEPTH {
        let Some(dir) = current else { break };
        if dir.join(BELMONT_DIR).is_dir() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }

    // 方法2: git superproject
    if let Some(super_root) = get_git_superproject_root(Some(start)) {
        return Some(super_root);
    }

    // 方法3: git 仓库根目录
    get_git_root(Some(start)).ok()
}

/// 查找项目根目录，失败时返回 `start`
pub fn find_project_root_or(start: &Path) -> PathBuf {
    find_project_root(start).unwrap_or_else(|| start.to_path_buf())
}
