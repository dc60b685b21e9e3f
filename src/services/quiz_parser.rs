use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::quiz::QuizItem;

/// 把 Markdown 原文解析成结构化题目
///
/// 生产环境由 [`super::LlmService`] 实现，测试中可以替换为固定返回的桩实现
#[async_trait]
pub trait QuizParser: Send + Sync {
    async fn parse_quiz(&self, markdown: &str) -> AppResult<Vec<QuizItem>>;
}
