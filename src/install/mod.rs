//! 安装 skills 与 agents 到工具目录
//!
//! 每个文件的处理：
//! - 磁盘内容与源一致：unchanged
//! - 文件不存在、未被本地修改（与清单 hash 一致）或 `force`：written
//! - 其余情况（本地修改或非 belmont 文件）：skipped
//!
//! 上次安装过、但源中已不存在的文件，未修改时删除。

pub mod check;
pub mod manifest;
pub mod tool;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::assets::{AssetProvider, AssetTree};
use crate::utils::{content_hash, file_hash, remove_file_and_prune, write_bytes};

pub use check::{check, CheckEntry, CheckStatus};
pub use manifest::{FileRecord, InstallManifest};
pub use tool::Tool;

#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// 安装根目录（项目根目录或 home）
    pub root: PathBuf,
    pub tools: Vec<Tool>,
    pub force: bool,
    pub dry_run: bool,
}

/// 安装结果，路径均相对安装根目录
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub written: Vec<String>,
    pub unchanged: Vec<String>,
    pub skipped: Vec<String>,
    pub removed: Vec<String>,
}

impl InstallReport {
    pub fn total(&self) -> usize {
        self.written.len() + self.unchanged.len() + self.skipped.len() + self.removed.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileAction {
    Unchanged,
    Write,
    Skip,
}

fn plan_file(disk: Option<&str>, recorded: Option<&str>, source: &str, force: bool) -> FileAction {
    match disk {
        Some(hash) if hash == source => FileAction::Unchanged,
        None => FileAction::Write,
        Some(_) if force => FileAction::Write,
        Some(hash) if recorded == Some(hash) => FileAction::Write,
        Some(_) => FileAction::Skip,
    }
}

/// 安装全部资源到选定工具目录
pub fn install(provider: &dyn AssetProvider, options: &InstallOptions) -> Result<InstallReport> {
    let previous = InstallManifest::load(&options.root)?;
    let empty = BTreeMap::new();
    let previous_files = previous.as_ref().map(|m| &m.files).unwrap_or(&empty);

    let mut manifest = InstallManifest::new(provider.origin().to_string());
    let mut report = InstallReport::default();
    let mut seen = BTreeSet::new();

    // 本次未选择的工具保持原记录
    for (key, record) in previous_files {
        if !options.tools.contains(&record.tool) {
            manifest.files.insert(key.clone(), record.clone());
        }
    }

    for &tool in &options.tools {
        for tree in AssetTree::ALL {
            for asset in provider.list(tree)? {
                let data = provider
                    .read(tree, &asset)
                    .with_context(|| format!("Failed to load {}/{}", tree, asset))?;
                let hash = content_hash(&data);
                let key = tool.install_key(tree, &asset);
                let dest = options.root.join(&key);
                let recorded = previous_files.get(&key);
                seen.insert(key.clone());

                let disk = file_hash(&dest);
                match plan_file(
                    disk.as_deref(),
                    recorded.map(|r| r.hash.as_str()),
                    &hash,
                    options.force,
                ) {
                    FileAction::Unchanged => {
                        debug!("Unchanged {}", key);
                        report.unchanged.push(key.clone());
                    }
                    FileAction::Write => {
                        if !options.dry_run {
                            write_bytes(&dest, &data)?;
                        }
                        debug!("Wrote {}", key);
                        report.written.push(key.clone());
                    }
                    FileAction::Skip => {
                        warn!("Skipping locally modified {}", key);
                        report.skipped.push(key.clone());
                        if let Some(record) = recorded {
                            manifest.files.insert(key, record.clone());
                        }
                        continue;
                    }
                }

                manifest
                    .files
                    .insert(key, FileRecord { tool, tree, hash });
            }
        }
    }

    for (key, record) in previous_files {
        if !options.tools.contains(&record.tool) || seen.contains(key) {
            continue;
        }

        let dest = options.root.join(key);
        match file_hash(&dest) {
            None => debug!("Stale {} already gone", key),
            Some(hash) if hash == record.hash || options.force => {
                if !options.dry_run {
                    remove_file_and_prune(&dest, &options.root)?;
                }
                report.removed.push(key.clone());
            }
            Some(_) => {
                warn!("Keeping locally modified stale file {}", key);
                report.skipped.push(key.clone());
                manifest.files.insert(key.clone(), record.clone());
            }
        }
    }

    if !options.dry_run {
        manifest.save(&options.root)?;
    }

    info!(
        written = report.written.len(),
        unchanged = report.unchanged.len(),
        skipped = report.skipped.len(),
        removed = report.removed.len(),
        dry_run = options.dry_run,
        "Install finished"
    );

    Ok(report)
}

/// 卸载结果，路径均相对安装根目录
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UninstallReport {
    pub removed: Vec<String>,
    pub kept: Vec<String>,
    pub missing: Vec<String>,
}

/// 删除清单记录的文件；本地修改过的文件仅在 `force` 时删除
pub fn uninstall(root: &Path, force: bool, dry_run: bool) -> Result<UninstallReport> {
    let mut manifest = InstallManifest::load(root)?
        .with_context(|| format!("No belmont installation found in {}", root.display()))?;

    let mut report = UninstallReport::default();
    let mut kept = BTreeMap::new();

    for (key, record) in std::mem::take(&mut manifest.files) {
        let dest = root.join(&key);
        match file_hash(&dest) {
            None => report.missing.push(key),
            Some(hash) if hash == record.hash || force => {
                if !dry_run {
                    remove_file_and_prune(&dest, root)?;
                }
                report.removed.push(key);
            }
            Some(_) => {
                warn!("Keeping locally modified {}", key);
                report.kept.push(key.clone());
                kept.insert(key, record);
            }
        }
    }

    if !dry_run {
        if kept.is_empty() {
            InstallManifest::remove(root)?;
        } else {
            manifest.files = kept;
            manifest.save(root)?;
        }
    }

    info!(
        removed = report.removed.len(),
        kept = report.kept.len(),
        missing = report.missing.len(),
        "Uninstall finished"
    );

    Ok(report)
}
