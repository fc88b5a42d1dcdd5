// Belmont - Library Root
//
// 分发 skills 与 agents 资源：嵌入二进制或从本地源目录读取

pub mod assets;
pub mod cli;
pub mod error;
pub mod install;
pub mod project;
pub mod utils;

// 重新导出常用类型
pub use assets::{resolve_provider, AssetProvider, AssetTree, SourceOptions, HAS_EMBEDDED_FILES};
pub use error::AssetError;
pub use install::{install, InstallOptions, Tool};
pub use project::find_project_root;
