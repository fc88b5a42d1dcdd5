//! 本地源目录
//!
//! 运行时从 `<root>/skills` 与 `<root>/agents` 读取资源

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::{normalize_asset_path, AssetOrigin, AssetProvider, AssetTree};
use crate::error::AssetError;
use crate::utils::file_exists;

/// 从本地目录读取资源的 provider
#[derive(Debug, Clone)]
pub struct LocalProvider {
    root: PathBuf,
}

impl LocalProvider {
    /// 创建 provider，`root` 必须同时包含 skills/ 与 agents/
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, AssetError> {
        let root = root.into();
        if !is_source_root(&root) {
            return Err(AssetError::SourceMissing { path: root });
        }
        debug!("Using local asset source {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn tree_dir(&self, tree: AssetTree) -> PathBuf {
        self.root.join(tree.dir_name())
    }
}

/// 检查目录是否是 belmont 源目录
pub fn is_source_root(dir: &Path) -> bool {
    AssetTree::ALL
        .iter()
        .all(|tree| dir.join(tree.dir_name()).is_dir())
}

impl AssetProvider for LocalProvider {
    fn origin(&self) -> AssetOrigin {
        AssetOrigin::Local(self.root.clone())
    }

    fn list(&self, tree: AssetTree) -> Result<Vec<String>, AssetError> {
        let base = self.tree_dir(tree);
        let mut paths = Vec::new();

        for entry in WalkDir::new(&base).follow_links(true) {
            let entry = entry.map_err(|e| AssetError::Io {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| base.clone()),
                source: e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "filesystem loop")),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            // strip_prefix 对 WalkDir 产出的路径不会失败
            if let Ok(rel) = entry.path().strip_prefix(&base) {
                let parts: Vec<String> = rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                paths.push(parts.join("/"));
            }
        }

        paths.sort();
        Ok(paths)
    }

    fn read(&self, tree: AssetTree, path: &str) -> Result<Cow<'static, [u8]>, AssetError> {
        let normalized = normalize_asset_path(path)?;
        let full = self.tree_dir(tree).join(&normalized);

        if !file_exists(&full) {
            return Err(AssetError::NotFound {
                tree,
                path: normalized,
            });
        }

        fs::read(&full)
            .map(Cow::Owned)
            .map_err(|source| AssetError::Io { path: full, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_source() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("skills/alpha")).unwrap();
        fs::create_dir_all(root.join("agents")).unwrap();
        fs::write(root.join("skills/alpha/SKILL.md"), "# alpha").unwrap();
        fs::write(root.join("skills/.hidden"), "dot").unwrap();
        fs::write(root.join("skills/beta.md"), "# beta").unwrap();
        temp
    }

    #[test]
    fn test_rejects_non_source_dir() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("skills")).unwrap();

        let err = LocalProvider::new(temp.path()).unwrap_err();
        assert!(matches!(err, AssetError::SourceMissing { .. }));
    }

    #[test]
    fn test_list_includes_hidden_and_nested() {
        let temp = make_source();
        let provider = LocalProvider::new(temp.path()).unwrap();

        let skills = provider.list(AssetTree::Skills).unwrap();
        assert_eq!(skills, vec![".hidden", "alpha/SKILL.md", "beta.md"]);
    }

    #[test]
    fn test_empty_tree_is_legitimate() {
        let temp = make_source();
        let provider = LocalProvider::new(temp.path()).unwrap();

        assert!(provider.list(AssetTree::Agents).unwrap().is_empty());
    }

    #[test]
    fn test_read_and_not_found() {
        let temp = make_source();
        let provider = LocalProvider::new(temp.path()).unwrap();

        let content = provider
            .read_to_string(AssetTree::Skills, "./alpha/SKILL.md")
            .unwrap();
        assert_eq!(content, "# alpha");

        let err = provider.read(AssetTree::Skills, "alpha").unwrap_err();
        assert!(matches!(err, AssetError::NotFound { .. }));
    }

    #[test]
    fn test_read_rejects_escape() {
        let temp = make_source();
        fs::write(temp.path().join("secret.txt"), "nope").unwrap();
        let provider = LocalProvider::new(temp.path()).unwrap();

        let err = provider.read(AssetTree::Skills, "../secret.txt").unwrap_err();
        assert!(matches!(err, AssetError::InvalidPath { .. }));
    }

    #[test]
    fn test_read_to_string_rejects_binary() {
        let temp = make_source();
        fs::write(temp.path().join("agents/blob.bin"), [0xff, 0xfe, 0x00]).unwrap();
        let provider = LocalProvider::new(temp.path()).unwrap();

        let err = provider
            .read_to_string(AssetTree::Agents, "blob.bin")
            .unwrap_err();
        assert!(matches!(err, AssetError::NotUtf8 { .. }));
    }
}
