//! 文件系统工具

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// 安全写入文件
pub fn write_bytes(path: &Path, content: &[u8]) -> Result<()> {
    // 确保父目录存在
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }

    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
}

/// 尝试读取文件，失败时返回 None
pub fn try_read_bytes(path: &Path) -> Option<Vec<u8>> {
    fs::read(path).ok()
}

/// 检查文件是否存在
pub fn file_exists(path: &Path) -> bool {
    path.exists() && path.is_file()
}

/// 计算内容 MD5 hash
pub fn content_hash(content: &[u8]) -> String {
    format!("{:x}", md5::compute(content))
}

/// 计算文件 MD5 hash，文件不存在时返回 None
pub fn file_hash(path: &Path) -> Option<String> {
    try_read_bytes(path).map(|content| content_hash(&content))
}

/// 删除文件，并向上清理变空的目录（不越过 `stop_at`）
pub fn remove_file_and_prune(path: &Path, stop_at: &Path) -> Result<()> {
    fs::remove_file(path).with_context(|| format!("Failed to remove file: {}", path.display()))?;

    let mut dir = path.parent();
    while let Some(current) = dir {
        if current == stop_at || !current.starts_with(stop_at) {
            break;
        }
        let is_empty = fs::read_dir(current)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false);
        if !is_empty {
            break;
        }
        fs::remove_dir(current)
            .with_context(|| format!("Failed to remove directory: {}", current.display()))?;
        dir = current.parent();
    }

    Ok(())
}
