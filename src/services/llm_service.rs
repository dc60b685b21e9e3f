//! LLM 服务 - 业务能力层
//!
//! 只负责"把 Markdown 题目解析成结构化 JSON"，不关心格式化和输出
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::quiz_parser::QuizParser;
use crate::config::Config;
use crate::error::{AppError, AppResult, LlmError};
use crate::models::quiz::QuizItem;
use crate::utils::logging::truncate_text;

const SYSTEM_PROMPT: &str = r#"You are an exam parser agent. Convert a markdown quiz into structured JSON.

VERBATIM
- Copy stems, step lines and option texts exactly. Do not paraphrase or shorten.
- Only remove leading numbering such as "1.", "(1)", "Q1:". Use '<br>' for line breaks.
- Replace figures with placeholders '§Pic.N§' in order of appearance.

SEPARATION
- Never put lettered choices inside the stem. Every choice goes into "options".
- Drop grading artifacts: "Correct answer:", "Incorrect answer:", ", Not Selected".
- Drop naked markers "A." / "B." that have no text.

TYPES
- MCQ when lettered choices exist, even if the stem contains blanks.
- CLOZE only when the stem has blanks '____' and there are no lettered choices.
- ORDER when the prompt asks to arrange labelled steps; steps go into "steps",
  sequence choices such as "B,A,C,D" go into "options".
- Figure-only MCQ: options A="A", B="B", C="C", D="D".
- Never emit an item that is only an answer summary like "... in order: D, C, A, B."

OUTPUT
Return one JSON object {"items": [...]} and nothing else. Each item:
- "qtype": "MCQ" | "CLOZE" | "ORDER"
- "stem": string
- "stem_translation": Simplified Chinese translation of the stem, or ""
- "steps": array of strings ([] unless ORDER)
- "steps_translation": array of translations aligned with "steps"
- "options": object with keys "A".."F", unused keys ""
- "options_translation": object with keys "A".."F"
- "answer": correct letter (or sequence for ORDER), "" for CLOZE or when unknown
- "cloze_answers": fills in order ([] unless CLOZE)
- "cloze_answers_translation": translations aligned with "cloze_answers"
- "analysis": optional object {"domain", "rationale", "key_points": [..], "distractors": [{"option", "reason"}]}, written in Simplified Chinese
No markdown fences, no commentary, no extra keys."#;

/// LLM 服务
///
/// 职责：
/// - 调用 LLM API 解析 Markdown 题目
/// - 提取并反序列化返回的 JSON
/// - 失败时按配置重试
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    max_retries: usize,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
            max_retries: config.llm_max_retries.max(1),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（已去首尾空白）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> AppResult<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(|e| AppError::llm_request_failed(&self.model_name, e))?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| AppError::llm_request_failed(&self.model_name, e))?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.2)
            .build()
            .map_err(|e| AppError::llm_request_failed(&self.model_name, e))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AppError::llm_api_failed(&self.model_name, e))?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| LlmError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }

    async fn parse_once(&self, markdown: &str) -> AppResult<Vec<QuizItem>> {
        let response = self
            .send_to_llm(&build_user_message(markdown), Some(SYSTEM_PROMPT))
            .await?;
        debug!("LLM 响应预览: {}", truncate_text(&response, 200));
        parse_quiz_response(&response)
    }
}

#[async_trait]
impl QuizParser for LlmService {
    async fn parse_quiz(&self, markdown: &str) -> AppResult<Vec<QuizItem>> {
        if markdown.trim().is_empty() {
            return Err(LlmError::EmptyInput.into());
        }

        let mut last_error = None;
        for attempt in 1..=self.max_retries {
            match self.parse_once(markdown).await {
                Ok(items) => return Ok(items),
                Err(e) => {
                    warn!("LLM 解析失败 (第 {}/{} 次): {}", attempt, self.max_retries, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::EmptyItems.into()))
    }
}

/// 构建用户消息
pub fn build_user_message(markdown: &str) -> String {
    format!(
        "Source markdown quiz:\n\n---\n{}\n---\n\nExtract every question. \
         Leave \"answer\" empty when the markdown does not state it. Return JSON only.",
        markdown.trim()
    )
}

/// 从响应中截取 JSON 对象
///
/// 去掉 ```json 代码块标记，取第一个 `{` 到最后一个 `}` 之间的内容
pub fn extract_json(response: &str) -> &str {
    let text = response.trim();
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// LLM 返回的题目列表，逐题反序列化
#[derive(Debug, Default, Deserialize)]
struct RawQuizResponse {
    #[serde(default)]
    items: Option<Vec<serde_json::Value>>,
}

/// 解析 LLM 返回的题目 JSON
///
/// 单道题目结构错误时跳过该题并记录警告，不影响其余题目
pub fn parse_quiz_response(response: &str) -> AppResult<Vec<QuizItem>> {
    let json = extract_json(response);
    let parsed: RawQuizResponse =
        serde_json::from_str(json).map_err(|e| LlmError::InvalidJson {
            response: truncate_text(response, 200),
            source: e,
        })?;

    let items: Vec<QuizItem> = parsed
        .items
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| match serde_json::from_value::<QuizItem>(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("跳过无法解析的第 {} 道题目: {}", idx + 1, e);
                None
            }
        })
        .collect();

    if items.is_empty() {
        return Err(LlmError::EmptyItems.into());
    }

    Ok(items)
}
