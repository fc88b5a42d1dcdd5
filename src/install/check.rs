//! 安装状态检查：对比源、清单与磁盘

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};

use super::InstallManifest;
use crate::assets::{AssetProvider, AssetTree};
use crate::utils::{content_hash, file_hash};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckStatus {
    UpToDate,
    /// 磁盘与清单一致，但源已更新
    Outdated,
    /// 磁盘内容被本地修改
    Modified,
    Missing,
    /// 源中已不存在
    Orphaned,
    /// 源中新增、尚未安装
    NotInstalled,
}

impl CheckStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckStatus::UpToDate => "up-to-date",
            CheckStatus::Outdated => "outdated",
            CheckStatus::Modified => "modified",
            CheckStatus::Missing => "missing",
            CheckStatus::Orphaned => "orphaned",
            CheckStatus::NotInstalled => "not-installed",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckEntry {
    pub path: String,
    pub status: CheckStatus,
}

/// 检查 `root` 下的安装状态，按路径排序返回
pub fn check(provider: &dyn AssetProvider, root: &Path) -> Result<Vec<CheckEntry>> {
    let manifest = InstallManifest::load(root)?
        .with_context(|| format!("No belmont installation found in {}", root.display()))?;

    let mut source = BTreeMap::new();
    for tool in manifest.tools() {
        for tree in AssetTree::ALL {
            for asset in provider.list(tree)? {
                let data = provider.read(tree, &asset)?;
                source.insert(tool.install_key(tree, &asset), content_hash(&data));
            }
        }
    }

    let mut entries = Vec::new();
    for (key, record) in &manifest.files {
        let status = match file_hash(&root.join(key)) {
            None => CheckStatus::Missing,
            Some(disk) if disk != record.hash => CheckStatus::Modified,
            Some(_) => match source.get(key) {
                None => CheckStatus::Orphaned,
                Some(hash) if *hash != record.hash => CheckStatus::Outdated,
                Some(_) => CheckStatus::UpToDate,
            },
        };
        entries.push(CheckEntry {
            path: key.clone(),
            status,
        });
    }

    for key in source.keys() {
        if !manifest.files.contains_key(key) {
            entries.push(CheckEntry {
                path: key.clone(),
                status: CheckStatus::NotInstalled,
            });
        }
    }

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::LocalProvider;
    use crate::install::{install, InstallOptions, Tool};
    use std::fs;
    use tempfile::TempDir;

    fn status_of(entries: &[CheckEntry], path: &str) -> CheckStatus {
        entries
            .iter()
            .find(|e| e.path == path)
            .map(|e| e.status)
            .unwrap_or_else(|| panic!("no entry for {}", path))
    }

    #[test]
    fn test_check_reports_drift() {
        let source = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let src = source.path();
        fs::create_dir_all(src.join("skills/a")).unwrap();
        fs::create_dir_all(src.join("agents")).unwrap();
        fs::write(src.join("skills/a/SKILL.md"), "a").unwrap();
        fs::write(src.join("agents/one.md"), "one").unwrap();
        fs::write(src.join("agents/two.md"), "two").unwrap();
        fs::write(src.join("agents/three.md"), "three").unwrap();

        let provider = LocalProvider::new(src).unwrap();
        install(
            &provider,
            &InstallOptions {
                root: project.path().to_path_buf(),
                tools: vec![Tool::Claude],
                force: false,
                dry_run: false,
            },
        )
        .unwrap();

        let entries = check(&provider, project.path()).unwrap();
        assert!(entries.iter().all(|e| e.status == CheckStatus::UpToDate));

        fs::write(src.join("agents/one.md"), "one v2").unwrap();
        fs::write(project.path().join(".claude/agents/belmont/two.md"), "mine").unwrap();
        fs::remove_file(project.path().join(".claude/agents/belmont/three.md")).unwrap();
        fs::remove_dir_all(src.join("skills/a")).unwrap();
        fs::write(src.join("agents/four.md"), "four").unwrap();

        let entries = check(&provider, project.path()).unwrap();
        assert_eq!(
            status_of(&entries, ".claude/agents/belmont/one.md"),
            CheckStatus::Outdated
        );
        assert_eq!(
            status_of(&entries, ".claude/agents/belmont/two.md"),
            CheckStatus::Modified
        );
        assert_eq!(
            status_of(&entries, ".claude/agents/belmont/three.md"),
            CheckStatus::Missing
        );
        assert_eq!(
            status_of(&entries, ".claude/skills/belmont/a/SKILL.md"),
            CheckStatus::Orphaned
        );
        assert_eq!(
            status_of(&entries, ".claude/agents/belmont/four.md"),
            CheckStatus::NotInstalled
        );
    }

    #[test]
    fn test_check_without_installation() {
        let source = TempDir::new().unwrap();
        fs::create_dir_all(source.path().join("skills")).unwrap();
        fs::create_dir_all(source.path().join("agents")).unwrap();
        let provider = LocalProvider::new(source.path()).unwrap();

        let project = TempDir::new().unwrap();
        assert!(check(&provider, project.path()).is_err());
    }
}
