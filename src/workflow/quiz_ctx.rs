//! 文档处理上下文
//!
//! 封装"我正在处理第几个文档、它在哪里"这一信息

use std::fmt::Display;
use std::path::{Path, PathBuf};

use crate::models::loaders::SourceKind;

/// 文档处理上下文
#[derive(Debug, Clone)]
pub struct QuizCtx {
    /// 文档索引（从 1 开始，仅用于日志显示）
    pub document_index: usize,

    /// 输入文件路径
    pub source: PathBuf,

    /// 输入文件类型
    pub kind: SourceKind,
}

impl QuizCtx {
    /// 按扩展名创建上下文，不支持的文件返回 `None`
    pub fn new(document_index: usize, source: impl Into<PathBuf>) -> Option<Self> {
        let source = source.into();
        let kind = SourceKind::from_path(&source)?;
        Some(Self {
            document_index,
            source,
            kind,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// 日志前缀 `[文档 N]`
    pub fn tag(&self) -> String {
        format!("[文档 {}]", self.document_index)
    }
}

impl Display for QuizCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self
            .source
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        write!(f, "[文档 {} {}]", self.document_index, name)
    }
}
