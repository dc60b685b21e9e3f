use crate::error::{AppError, AppResult, FileError};
use crate::models::quiz::QuizDocument;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 输入文件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// 原始 Markdown，需要交给 LLM 解析
    Markdown,
    /// 预解析的 JSON 题目文档
    Json,
    /// 预解析的 TOML 题目文档
    Toml,
}

impl SourceKind {
    /// 按扩展名判断（大小写不敏感），不支持的类型返回 `None`
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// 从 JSON / TOML 文件加载题目文档
pub async fn load_quiz_document(path: &Path) -> AppResult<QuizDocument> {
    let display = path.display().to_string();
    let kind = SourceKind::from_path(path);
    if !matches!(kind, Some(SourceKind::Json | SourceKind::Toml)) {
        return Err(FileError::UnsupportedFormat { path: display }.into());
    }

    let content = read_source(path).await?;

    let document = match kind {
        Some(SourceKind::Json) => {
            serde_json::from_str(&content).map_err(|e| FileError::JsonParseFailed {
                path: display.clone(),
                source: Box::new(e),
            })?
        }
        _ => toml::from_str(&content).map_err(|e| FileError::TomlParseFailed {
            path: display.clone(),
            source: Box::new(e),
        })?,
    };

    Ok(document)
}

/// 读取 Markdown 原文
pub async fn load_markdown(path: &Path) -> AppResult<String> {
    read_source(path).await
}

/// 列出目录下所有支持的输入文件（按文件名排序）
pub async fn scan_input_folder(folder_path: &str) -> AppResult<Vec<PathBuf>> {
    let folder = PathBuf::from(folder_path);

    if !fs::try_exists(&folder).await.unwrap_or(false) {
        return Err(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let mut sources = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?
    {
        let path = entry.path();
        if path.is_file() && SourceKind::from_path(&path).is_some() {
            sources.push(path);
        }
    }

    sources.sort();
    tracing::debug!("在 {} 中找到 {} 个输入文件", folder_path, sources.len());

    Ok(sources)
}

async fn read_source(path: &Path) -> AppResult<String> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        return Err(FileError::NotFound {
            path: path.display().to_string(),
        }
        .into());
    }

    fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))
}
