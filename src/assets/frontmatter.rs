//! Markdown front-matter 解析

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

lazy_static! {
    static ref FRONTMATTER_RE: Regex =
        Regex::new(r"(?s)\A\u{feff}?---[ \t]*\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n|\z)")
            .expect("front-matter regex is valid");
}

/// 资源元数据（来自 YAML front-matter）
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Frontmatter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// 解析 front-matter，缺失或格式错误时返回空元数据
pub fn parse(content: &str) -> Frontmatter {
    let Some(block) = FRONTMATTER_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
    else {
        return Frontmatter::default();
    };

    match serde_yaml::from_str::<Frontmatter>(block.as_str()) {
        Ok(meta) => meta,
        Err(e) => {
            debug!("Ignoring malformed front-matter: {}", e);
            Frontmatter::default()
        }
    }
}

/// 去掉 front-matter 后的正文
pub fn body(content: &str) -> &str {
    match FRONTMATTER_RE.find(content) {
        Some(m) => &content[m.end()..],
        None => content,
    }
}
