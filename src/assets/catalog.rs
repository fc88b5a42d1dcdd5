//! 资源目录：列出 markdown 资源及其名称、描述

use std::path::Path;

use tracing::warn;

use super::{frontmatter, AssetProvider, AssetTree};
use crate::error::AssetError;

const SKILL_FILE: &str = "SKILL.md";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    pub tree: AssetTree,
    pub path: String,
    pub name: String,
    pub description: Option<String>,
    pub size: usize,
}

/// 列出资源树中的 markdown 资源
///
/// skills 树中只有 `SKILL.md` 与顶层 `.md` 文件算作条目，其余视为引用文件。
pub fn list_entries(
    provider: &dyn AssetProvider,
    tree: AssetTree,
) -> Result<Vec<AssetEntry>, AssetError> {
    let mut entries = Vec::new();

    for path in provider.list(tree)? {
        if !is_entry(tree, &path) {
            continue;
        }

        let content = match provider.read_to_string(tree, &path) {
            Ok(content) => content,
            Err(AssetError::NotUtf8 { .. }) => {
                warn!("Skipping non UTF-8 asset {}/{}", tree, path);
                continue;
            }
            Err(e) => return Err(e),
        };

        let meta = frontmatter::parse(&content);
        let name = meta
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| fallback_name(&path));

        entries.push(AssetEntry {
            tree,
            size: content.len(),
            description: meta.description,
            name,
            path,
        });
    }

    Ok(entries)
}

fn is_entry(tree: AssetTree, path: &str) -> bool {
    if !path.ends_with(".md") {
        return false;
    }
    match tree {
        AssetTree::Skills => path.ends_with(&format!("/{}", SKILL_FILE)) || !path.contains('/'),
        AssetTree::Agents => true,
    }
}

fn fallback_name(path: &str) -> String {
    let p = Path::new(path);
    let from_parent = p.file_name().and_then(|n| n.to_str()) == Some(SKILL_FILE);
    let name = if from_parent {
        p.parent().and_then(|d| d.file_name())
    } else {
        p.file_stem()
    };
    name.and_then(|n| n.to_str())
        .unwrap_or(path)
        .to_string()
}
