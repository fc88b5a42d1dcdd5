//! 资源树访问
//!
//! skills 与 agents 两棵只读资源树。启用 `embed` feature 时在编译期嵌入二进制，
//! 否则在运行时从本地源目录读取。两种来源实现同一个 [`AssetProvider`] 接口。

pub mod catalog;
#[cfg(feature = "embed")]
pub mod embedded;
pub mod frontmatter;
pub mod local;
pub mod source;

use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AssetError;

pub use catalog::{list_entries, AssetEntry};
#[cfg(feature = "embed")]
pub use embedded::EmbeddedProvider;
pub use local::LocalProvider;
pub use source::{resolve_provider, SourceOptions};

/// 本构建是否携带嵌入资源
pub const HAS_EMBEDDED_FILES: bool = cfg!(feature = "embed");

/// 资源树
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetTree {
    Skills,
    Agents,
}

impl AssetTree {
    pub const ALL: [AssetTree; 2] = [AssetTree::Skills, AssetTree::Agents];

    /// 源目录中的子目录名
    pub fn dir_name(self) -> &'static str {
        match self {
            AssetTree::Skills => "skills",
            AssetTree::Agents => "agents",
        }
    }
}

impl fmt::Display for AssetTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for AssetTree {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skills" | "skill" => Ok(AssetTree::Skills),
            "agents" | "agent" => Ok(AssetTree::Agents),
            other => Err(format!("unknown asset tree '{}' (expected skills or agents)", other)),
        }
    }
}

/// 资源来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOrigin {
    Embedded,
    Local(PathBuf),
}

impl fmt::Display for AssetOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetOrigin::Embedded => f.write_str("embedded"),
            AssetOrigin::Local(root) => write!(f, "{}", root.display()),
        }
    }
}

/// 只读资源查找接口
pub trait AssetProvider: Send + Sync {
    fn origin(&self) -> AssetOrigin;

    /// 列出资源树中的全部文件（已排序，包含隐藏文件）
    fn list(&self, tree: AssetTree) -> Result<Vec<String>, AssetError>;

    /// 读取单个资源，不存在时返回 [`AssetError::NotFound`]
    fn read(&self, tree: AssetTree, path: &str) -> Result<Cow<'static, [u8]>, AssetError>;

    fn exists(&self, tree: AssetTree, path: &str) -> bool {
        self.read(tree, path).is_ok()
    }

    fn read_to_string(&self, tree: AssetTree, path: &str) -> Result<String, AssetError> {
        let data = self.read(tree, path)?;
        String::from_utf8(data.into_owned()).map_err(|_| AssetError::NotUtf8 {
            tree,
            path: path.to_string(),
        })
    }
}

/// 规范化资源路径
///
/// 统一为 `/` 分隔的相对路径；拒绝空路径、绝对路径以及任何 `..` 段。
pub fn normalize_asset_path(path: &str) -> Result<String, AssetError> {
    let invalid = |reason| AssetError::InvalidPath {
        path: path.to_string(),
        reason,
    };

    let unified = path.replace('\\', "/");
    if unified.starts_with('/') || has_drive_prefix(&unified) {
        return Err(invalid("absolute paths are not allowed"));
    }

    let mut segments = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(invalid("parent directory segments are not allowed")),
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return Err(invalid("path is empty"));
    }

    Ok(segments.join("/"))
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
