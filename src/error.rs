//! 资源访问错误类型

use std::path::PathBuf;

use thiserror::Error;

use crate::assets::AssetTree;

/// 资源查找与读取错误
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("{tree}/{path} not found")]
    NotFound { tree: AssetTree, path: String },

    #[error("invalid asset path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("{tree}/{path} is not valid UTF-8")]
    NotUtf8 { tree: AssetTree, path: String },

    #[error("'{}' is not a belmont source directory (expected skills/ and agents/)", path.display())]
    SourceMissing { path: PathBuf },

    #[error(
        "no skills/agents source available: pass --source <DIR>, set BELMONT_SOURCE, \
         or build with --features embed"
    )]
    NoSource,

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
