//! 安装清单
//!
//! 记录已安装文件及其内容 hash，存放于 `<root>/.belmont/manifest.json`

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Tool;
use crate::assets::{normalize_asset_path, AssetTree};
use crate::project::BELMONT_DIR;
use crate::utils::{read_json, write_json};

pub const MANIFEST_FILE: &str = "manifest.json";

/// 单个已安装文件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub tool: Tool,
    pub tree: AssetTree,
    pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallManifest {
    pub version: String,
    pub source: String,
    pub installed_at: DateTime<Utc>,
    /// 相对安装根目录的路径 -> 记录
    #[serde(default)]
    pub files: BTreeMap<String, FileRecord>,
}

impl InstallManifest {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            source: source.into(),
            installed_at: Utc::now(),
            files: BTreeMap::new(),
        }
    }

    pub fn path(root: &Path) -> PathBuf {
        root.join(BELMONT_DIR).join(MANIFEST_FILE)
    }

    /// 读取清单，不存在时返回 None
    ///
    /// 丢弃不在 `<tool dir>/<tree>/belmont/` 之下的记录，清单中的路径不能指向安装根目录以外。
    pub fn load(root: &Path) -> Result<Option<Self>> {
        let path = Self::path(root);
        if !path.exists() {
            return Ok(None);
        }
        let mut manifest: Self = read_json(&path)?;
        manifest.files.retain(|key, record| {
            let valid = is_valid_key(key, record);
            if !valid {
                warn!("Ignoring manifest entry outside the install layout: {}", key);
            }
            valid
        });
        Ok(Some(manifest))
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        write_json(&Self::path(root), self)
    }

    /// 删除清单，`.belmont` 变空时一并删除
    pub fn remove(root: &Path) -> Result<()> {
        let path = Self::path(root);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }

        let dir = root.join(BELMONT_DIR);
        let is_empty = fs::read_dir(&dir)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false);
        if is_empty {
            fs::remove_dir(&dir).with_context(|| format!("Failed to remove {}", dir.display()))?;
        }
        Ok(())
    }

    /// 清单中出现过的工具
    pub fn tools(&self) -> BTreeSet<Tool> {
        self.files.values().map(|record| record.tool).collect()
    }
}

/// 记录路径必须是规范化的相对路径，且位于记录所属工具与资源树的命名空间下
fn is_valid_key(key: &str, record: &FileRecord) -> bool {
    let prefix = record.tool.install_key(record.tree, "");
    match normalize_asset_path(key) {
        Ok(normalized) => normalized == key && key.len() > prefix.len() && key.starts_with(&prefix),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_load_remove() {
        let temp = TempDir::new().unwrap();
        assert!(InstallManifest::load(temp.path()).unwrap().is_none());

        let mut manifest = InstallManifest::new("embedded");
        manifest.files.insert(
            ".claude/agents/belmont/a.md".to_string(),
            FileRecord {
                tool: Tool::Claude,
                tree: AssetTree::Agents,
                hash: "abc".to_string(),
            },
        );
        manifest.save(temp.path()).unwrap();

        let raw = fs::read_to_string(InstallManifest::path(temp.path())).unwrap();
        assert!(raw.contains("\"tool\": \"claude\""));
        assert!(raw.contains("\"tree\": \"agents\""));

        let loaded = InstallManifest::load(temp.path()).unwrap().unwrap();
        assert_eq!(loaded, manifest);
        assert_eq!(loaded.tools().into_iter().collect::<Vec<_>>(), vec![Tool::Claude]);

        InstallManifest::remove(temp.path()).unwrap();
        assert!(!temp.path().join(BELMONT_DIR).exists());
    }

    fn record(tool: Tool, tree: AssetTree) -> FileRecord {
        FileRecord {
            tool,
            tree,
            hash: "abc".to_string(),
        }
    }

    #[test]
    fn test_is_valid_key() {
        let claude_agent = record(Tool::Claude, AssetTree::Agents);
        assert!(is_valid_key(".claude/agents/belmont/a.md", &claude_agent));
        assert!(is_valid_key(".claude/agents/belmont/nested/a.md", &claude_agent));

        for bad in [
            "../victim.txt",
            "/etc/passwd",
            ".claude/agents/belmont/../../../victim.txt",
            ".claude/agents/belmont/",
            ".claude/agents/belmont",
            ".claude/agents/mine.md",
            ".claude/skills/belmont/a.md",
            ".codex/agents/belmont/a.md",
            "./.claude/agents/belmont/a.md",
        ] {
            assert!(!is_valid_key(bad, &claude_agent), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_load_drops_entries_outside_layout() {
        let temp = TempDir::new().unwrap();
        let mut manifest = InstallManifest::new("x");
        manifest
            .files
            .insert("../victim.txt".to_string(), record(Tool::Claude, AssetTree::Agents));
        manifest
            .files
            .insert("/tmp/victim.txt".to_string(), record(Tool::Claude, AssetTree::Agents));
        manifest.files.insert(
            ".claude/agents/belmont/a.md".to_string(),
            record(Tool::Claude, AssetTree::Agents),
        );
        manifest.save(temp.path()).unwrap();

        let loaded = InstallManifest::load(temp.path()).unwrap().unwrap();
        assert_eq!(
            loaded.files.keys().collect::<Vec<_>>(),
            vec![".claude/agents/belmont/a.md"]
        );
    }

    #[test]
    fn test_remove_keeps_other_belmont_files() {
        let temp = TempDir::new().unwrap();
        InstallManifest::new("x").save(temp.path()).unwrap();
        fs::write(temp.path().join(BELMONT_DIR).join("PRD.md"), "# PRD").unwrap();

        InstallManifest::remove(temp.path()).unwrap();
        assert!(temp.path().join(BELMONT_DIR).join("PRD.md").exists());
        assert!(!InstallManifest::path(temp.path()).exists());
    }
}
