//! 嵌入资源
//!
//! 使用 rust-embed 将 skills/ 与 agents/ 编译进二进制（`embed` feature）

use std::borrow::Cow;

use rust_embed::RustEmbed;

use super::{normalize_asset_path, AssetOrigin, AssetProvider, AssetTree};
use crate::error::AssetError;

/// skills 资源树（编译时嵌入）
#[derive(RustEmbed)]
#[folder = "skills/"]
pub struct EmbeddedSkills;

/// agents 资源树（编译时嵌入）
#[derive(RustEmbed)]
#[folder = "agents/"]
pub struct EmbeddedAgents;

/// 从二进制内嵌资源读取的 provider
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedProvider;

impl EmbeddedProvider {
    pub fn new() -> Self {
        Self
    }

    fn get(tree: AssetTree, path: &str) -> Option<rust_embed::EmbeddedFile> {
        match tree {
            AssetTree::Skills => EmbeddedSkills::get(path),
            AssetTree::Agents => EmbeddedAgents::get(path),
        }
    }

    fn iter(tree: AssetTree) -> Vec<Cow<'static, str>> {
        match tree {
            AssetTree::Skills => EmbeddedSkills::iter().collect(),
            AssetTree::Agents => EmbeddedAgents::iter().collect(),
        }
    }
}

impl AssetProvider for EmbeddedProvider {
    fn origin(&self) -> AssetOrigin {
        AssetOrigin::Embedded
    }

    fn list(&self, tree: AssetTree) -> Result<Vec<String>, AssetError> {
        let mut paths: Vec<String> = Self::iter(tree)
            .into_iter()
            .map(|path| path.replace('\\', "/"))
            .collect();
        paths.sort();
        Ok(paths)
    }

    fn read(&self, tree: AssetTree, path: &str) -> Result<Cow<'static, [u8]>, AssetError> {
        let normalized = normalize_asset_path(path)?;
        Self::get(tree, &normalized)
            .map(|file| file.data)
            .ok_or(AssetError::NotFound {
                tree,
                path: normalized,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::LocalProvider;

    fn manifest_dir() -> std::path::PathBuf {
        std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    }

    #[test]
    fn test_embedded_matches_packaged_trees() {
        let embedded = EmbeddedProvider::new();
        let local = LocalProvider::new(manifest_dir()).unwrap();

        for tree in AssetTree::ALL {
            assert_eq!(embedded.list(tree).unwrap(), local.list(tree).unwrap());
        }
    }

    #[test]
    fn test_embedded_read() {
        let provider = EmbeddedProvider::new();
        let content = provider
            .read_to_string(AssetTree::Skills, "belmont-plan/SKILL.md")
            .unwrap();
        assert!(content.contains("name: belmont-plan"));
        assert_eq!(provider.origin(), AssetOrigin::Embedded);
    }

    #[test]
    fn test_embedded_not_found() {
        let provider = EmbeddedProvider::new();
        let err = provider
            .read(AssetTree::Agents, "no-such-agent.md")
            .unwrap_err();
        assert!(matches!(err, AssetError::NotFound { .. }));
        assert!(!provider.exists(AssetTree::Agents, "../Cargo.toml"));
    }
}
