//! 目标工具及其目录布局

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::assets::AssetTree;

/// 安装到工具目录下的命名空间
pub const NAMESPACE: &str = "belmont";

/// 支持的 AI 编码工具
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Claude,
    Codex,
    Cursor,
    Gemini,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Claude, Tool::Codex, Tool::Cursor, Tool::Gemini];

    pub fn as_str(self) -> &'static str {
        match self {
            Tool::Claude => "claude",
            Tool::Codex => "codex",
            Tool::Cursor => "cursor",
            Tool::Gemini => "gemini",
        }
    }

    /// 工具的配置目录（相对项目根目录或 home）
    pub fn dir_name(self) -> &'static str {
        match self {
            Tool::Claude => ".claude",
            Tool::Codex => ".codex",
            Tool::Cursor => ".cursor",
            Tool::Gemini => ".gemini",
        }
    }

    /// 资源在安装根目录下的相对路径：`<tool dir>/<tree>/belmont/<asset>`
    pub fn install_key(self, tree: AssetTree, asset: &str) -> String {
        format!("{}/{}/{}/{}", self.dir_name(), tree, NAMESPACE, asset)
    }

    /// 解析工具列表：空列表默认 claude，`all` 展开为全部工具
    pub fn resolve(names: &[String]) -> Result<Vec<Tool>, String> {
        if names.is_empty() {
            return Ok(vec![Tool::Claude]);
        }

        let mut tools = Vec::new();
        for name in names.iter().flat_map(|n| n.split(',')) {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            if name.eq_ignore_ascii_case("all") {
                tools.extend(Tool::ALL);
            } else {
                tools.push(name.parse()?);
            }
        }

        tools.sort();
        tools.dedup();
        if tools.is_empty() {
            return Err("no tools selected".to_string());
        }
        Ok(tools)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::ALL
            .into_iter()
            .find(|tool| tool.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown tool '{}' (expected one of: claude, codex, cursor, gemini, all)",
                    s
                )
            })
    }
}
