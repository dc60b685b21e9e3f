//! 文档处理流程 - 流程层
//!
//! 核心职责：定义"一个文档"的完整处理流程
//!
//! 流程顺序：
//! 1. 加载题目（Markdown 交给解析器，JSON / TOML 直接读取）
//! 2. 规范化并过滤不完整的题目
//! 3. 推断标题与题号起点
//! 4. 生成批次 ID → 格式化 → 写入输出文件

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::formatter::cloze::count_markers;
use crate::formatter::{FormatterConfig, QuizFormatter};
use crate::models::loaders::{load_markdown, load_quiz_document, SourceKind};
use crate::models::quiz::{count_by_type, QuestionType, QuizItem};
use crate::services::{
    generate_output_filename, infer_question_seed, resolve_titles, unique_path, write_output,
    BatchIdGenerator, QuizParser, DEFAULT_BATCH_TIMEZONE,
};
use crate::utils::logging::truncate_text;
use crate::workflow::quiz_ctx::QuizCtx;

/// 文档处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessResult {
    /// 处理成功，附带输出文件路径
    Success(PathBuf),
    /// 跳过（没有可输出的题目）
    Skipped,
}

/// 加载阶段的产物
struct LoadedQuiz {
    items: Vec<QuizItem>,
    title_main: String,
    title_sub: String,
}

/// 文档处理流程
///
/// - 编排单个文档的完整处理流程
/// - 只依赖业务能力（services）和格式化核心（formatter）
/// - 可在多个并发任务之间共享
pub struct QuizFlow {
    parser: Arc<dyn QuizParser>,
    output_folder: PathBuf,
    model_code: String,
    question_prefix: String,
    verbose_logging: bool,
    batch_timezone: Tz,
    // 批次字母取决于输出目录现有文件，取名和写入需要串行
    naming_lock: Mutex<()>,
}

impl QuizFlow {
    /// 创建新的文档处理流程
    pub fn new(config: &Config, parser: Arc<dyn QuizParser>, model_code: impl Into<String>) -> Self {
        Self {
            parser,
            output_folder: PathBuf::from(&config.output_folder),
            model_code: model_code.into(),
            question_prefix: config.question_prefix.clone(),
            verbose_logging: config.verbose_logging,
            batch_timezone: config.batch_tz().unwrap_or(DEFAULT_BATCH_TIMEZONE),
            naming_lock: Mutex::new(()),
        }
    }

    pub async fn run(&self, ctx: &QuizCtx) -> Result<ProcessResult> {
        info!("{} 📄 开始处理: {}", ctx.tag(), ctx.source.display());

        // ========== 1. 加载 ==========
        let loaded = self.load(ctx).await?;
        let raw_count = loaded.items.len();

        // ========== 2. 规范化 + 过滤 ==========
        // 没有任何选项文字的选择题在这里就被丢弃，不会进入图片选项补全；
        // 图片题的 A-D 占位选项由解析器按约定给出
        let items: Vec<QuizItem> = loaded
            .items
            .into_iter()
            .map(QuizItem::normalized)
            .filter(|item| {
                let valid = item.is_valid();
                if !valid {
                    debug!("{} 丢弃不完整题目: {}", ctx.tag(), truncate_text(&item.stem, 60));
                }
                valid
            })
            .collect();

        if items.len() < raw_count {
            warn!(
                "{} ⚠️ 丢弃 {} 道不完整的题目",
                ctx.tag(),
                raw_count - items.len()
            );
        }
        let misaligned = items.iter().filter(|item| !item.translations_aligned()).count();
        if misaligned > 0 {
            warn!("{} ⚠️ {} 道题目的译文数量与原文不一致", ctx.tag(), misaligned);
        }
        let unbalanced = items
            .iter()
            .filter(|item| {
                item.qtype == QuestionType::Cloze
                    && count_markers(&item.stem) != item.cloze_answers.len()
            })
            .count();
        if unbalanced > 0 {
            warn!("{} ⚠️ {} 道填空题的空格数与答案数不一致", ctx.tag(), unbalanced);
        }

        if items.is_empty() {
            warn!("{} ⚠️ 没有可输出的题目，跳过", ctx.tag());
            return Ok(ProcessResult::Skipped);
        }

        info!(
            "{} ✓ 有效题目 {} 道 {:?}",
            ctx.tag(),
            items.len(),
            count_by_type(&items)
        );
        info!("{} 🏷️ 标题: {} | {}", ctx.tag(), loaded.title_main, loaded.title_sub);

        // ========== 3. 取名 + 格式化 + 写入 ==========
        let _guard = self.naming_lock.lock().await;

        let batch_id = BatchIdGenerator::new(&self.output_folder)
            .with_timezone(self.batch_timezone)
            .generate(items.len())
            .context("生成批次 ID 失败")?;

        let mut formatter_config = FormatterConfig::new(loaded.title_main, loaded.title_sub)
            .with_batch_code(&batch_id)
            .with_question_prefix(&self.question_prefix);
        if let Some(seed) = infer_question_seed(ctx.source()) {
            formatter_config = formatter_config.with_question_start(seed);
        }

        let formatted = QuizFormatter::new(formatter_config).format_with_stats(&items);
        if formatted.rendered == 0 {
            warn!("{} ⚠️ 所有题目均被过滤，跳过", ctx.tag());
            return Ok(ProcessResult::Skipped);
        }
        if self.verbose_logging {
            debug!("{} 输出预览: {}", ctx.tag(), truncate_text(&formatted.text, 300));
        }

        let output_path = self.output_path(&batch_id, ctx.source());
        write_output(&output_path, &formatted.text)
            .await
            .with_context(|| format!("写入输出失败: {}", output_path.display()))?;

        info!(
            "{} ✅ 完成: {} 道题目 → {}",
            ctx.tag(),
            formatted.rendered,
            output_path.display()
        );

        Ok(ProcessResult::Success(output_path))
    }

    async fn load(&self, ctx: &QuizCtx) -> Result<LoadedQuiz> {
        match ctx.kind {
            SourceKind::Markdown => {
                let markdown = load_markdown(ctx.source())
                    .await
                    .with_context(|| format!("无法读取 Markdown: {}", ctx.source.display()))?;

                info!("{} 🤖 正在调用 LLM 解析题目...", ctx.tag());
                let items = self
                    .parser
                    .parse_quiz(&markdown)
                    .await
                    .with_context(|| format!("{} LLM 解析失败", ctx.tag()))?;

                let (title_main, title_sub) = resolve_titles(Some(markdown.as_str()), ctx.source());
                Ok(LoadedQuiz {
                    items,
                    title_main,
                    title_sub,
                })
            }
            SourceKind::Json | SourceKind::Toml => {
                let document = load_quiz_document(ctx.source())
                    .await
                    .with_context(|| format!("无法加载题目文件: {}", ctx.source.display()))?;

                let (fallback_main, fallback_sub) = resolve_titles(None, ctx.source());
                let title_main = non_empty_or(document.title_main, fallback_main);
                let title_sub = non_empty_or(document.title_sub, fallback_sub);

                Ok(LoadedQuiz {
                    items: document.items,
                    title_main,
                    title_sub,
                })
            }
        }
    }

    fn output_path(&self, batch_id: &str, source: &Path) -> PathBuf {
        let filename = generate_output_filename(batch_id, &self.model_code, Some(source), "txt");
        unique_path(&self.output_folder.join(filename))
    }
}

fn non_empty_or(value: String, fallback: String) -> String {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
