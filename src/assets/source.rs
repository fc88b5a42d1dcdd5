//! 资源来源选择
//!
//! 选择顺序：
//! 1. 显式源目录（`--source` / `BELMONT_SOURCE`）
//! 2. 嵌入资源（`embed` feature）
//! 3. 从可执行文件所在目录、当前目录向上查找源目录（最多 10 层）

use std::env;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::local::is_source_root;
use super::{AssetProvider, LocalProvider, HAS_EMBEDDED_FILES};
use crate::error::AssetError;

const MAX_ANCESTORS: usize = 10;

/// 来源选择参数
#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    /// 显式指定的源目录
    pub source: Option<PathBuf>,
    /// 额外的查找起点（默认为可执行文件目录与当前目录）
    pub search_from: Vec<PathBuf>,
}

impl SourceOptions {
    pub fn with_source(source: Option<PathBuf>) -> Self {
        Self {
            source,
            search_from: Vec::new(),
        }
    }

    fn search_roots(&self) -> Vec<PathBuf> {
        if !self.search_from.is_empty() {
            return self.search_from.clone();
        }

        let mut roots = Vec::new();
        if let Some(dir) = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            roots.push(dir);
        }
        if let Ok(cwd) = env::current_dir() {
            roots.push(cwd);
        }
        roots
    }
}

/// 解析出本次运行使用的资源 provider
pub fn resolve_provider(options: &SourceOptions) -> Result<Box<dyn AssetProvider>, AssetError> {
    if let Some(source) = &options.source {
        info!("Using explicit source {}", source.display());
        return Ok(Box::new(LocalProvider::new(source.clone())?));
    }

    if let Some(provider) = embedded_provider() {
        info!("Using embedded assets");
        return Ok(provider);
    }

    for start in options.search_roots() {
        if let Some(root) = discover_source_root(&start) {
            info!("Discovered source {}", root.display());
            return Ok(Box::new(LocalProvider::new(root)?));
        }
    }

    Err(AssetError::NoSource)
}

#[cfg(feature = "embed")]
fn embedded_provider() -> Option<Box<dyn AssetProvider>> {
    debug_assert!(HAS_EMBEDDED_FILES);
    Some(Box::new(super::EmbeddedProvider::new()))
}

#[cfg(not(feature = "embed"))]
fn embedded_provider() -> Option<Box<dyn AssetProvider>> {
    debug!(embedded = HAS_EMBEDDED_FILES, "Binary was built without embedded assets");
    None
}

/// 从 `start` 向上查找同时包含 skills/ 与 agents/ 的目录
pub fn discover_source_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    for _ in 0..=MAX_ANCESTORS {
        let dir = current?;
        if is_source_root(dir) {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    debug!("No source root above {}", start.display());
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetOrigin, AssetTree};
    use std::fs;
    use tempfile::TempDir;

    fn make_source(root: &Path) {
        fs::create_dir_all(root.join("skills")).unwrap();
        fs::create_dir_all(root.join("agents")).unwrap();
        fs::write(root.join("agents/a.md"), "a").unwrap();
    }

    #[test]
    fn test_discover_from_nested_dir() {
        let temp = TempDir::new().unwrap();
        make_source(temp.path());
        let nested = temp.path().join("target/release/deps");
        fs::create_dir_all(&nested).unwrap();

        let found = discover_source_root(&nested).unwrap();
        assert_eq!(found, temp.path());
    }

    #[test]
    fn test_discover_none() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();

        // 临时目录的祖先中不应存在源目录
        if discover_source_root(temp.path()).is_none() {
            assert!(discover_source_root(&nested).is_none());
        }
    }

    #[test]
    fn test_explicit_source_wins() {
        let temp = TempDir::new().unwrap();
        make_source(temp.path());

        let provider =
            resolve_provider(&SourceOptions::with_source(Some(temp.path().to_path_buf())))
                .unwrap();
        assert_eq!(provider.origin(), AssetOrigin::Local(temp.path().to_path_buf()));
        assert_eq!(provider.list(AssetTree::Agents).unwrap(), vec!["a.md"]);
    }

    #[test]
    fn test_explicit_source_must_be_valid() {
        let temp = TempDir::new().unwrap();
        let result = resolve_provider(&SourceOptions::with_source(Some(temp.path().to_path_buf())));
        assert!(matches!(result, Err(AssetError::SourceMissing { .. })));
    }

    #[cfg(not(feature = "embed"))]
    #[test]
    fn test_discovery_used_without_embed() {
        let temp = TempDir::new().unwrap();
        make_source(temp.path());
        let nested = temp.path().join("bin");
        fs::create_dir_all(&nested).unwrap();

        let options = SourceOptions {
            source: None,
            search_from: vec![nested],
        };
        let provider = resolve_provider(&options).unwrap();
        assert_eq!(provider.origin(), AssetOrigin::Local(temp.path().to_path_buf()));
    }

    #[cfg(feature = "embed")]
    #[test]
    fn test_embedded_preferred_over_discovery() {
        let temp = TempDir::new().unwrap();
        make_source(temp.path());

        let options = SourceOptions {
            source: None,
            search_from: vec![temp.path().to_path_buf()],
        };
        let provider = resolve_provider(&options).unwrap();
        assert_eq!(provider.origin(), AssetOrigin::Embedded);
    }
}
