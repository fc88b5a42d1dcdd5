//! Git 操作工具

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// 执行 git 命令并返回输出
pub fn git_command(args: &[&str], cwd: Option<&Path>) -> Result<String> {
    let mut cmd = Command::new("git");
    cmd.args(args);

    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let output = cmd.output().context("Failed to execute git command")?;

    if !output.status.success() {
        anyhow::bail!(
            "Git command failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// 获取 git 仓库根目录
pub fn get_git_root(cwd: Option<&Path>) -> Result<PathBuf> {
    git_command(&["rev-parse", "--show-toplevel"], cwd).map(PathBuf::from)
}

/// 获取 git superproject 根目录（用于 submodule）
pub fn get_git_superproject_root(cwd: Option<&Path>) -> Option<PathBuf> {
    match git_command(&["rev-parse", "--show-superproject-working-tree"], cwd) {
        Ok(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => None,
    }
}
