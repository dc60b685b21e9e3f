//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量文档的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：校验配置、解析模型代码、创建 LLM 服务
//! 2. **批量加载**：扫描输入目录中所有待处理的文档
//! 3. **并发控制**：使用 Semaphore 限制并发数量
//! 4. **分批处理**：将文档分批次处理，每批完成后再开始下一批
//! 5. **全局统计**：汇总所有文档的处理结果

use crate::config::Config;
use crate::models::loaders::scan_input_folder;
use crate::models::model_code::resolve_model_input;
use crate::services::{LlmService, QuizParser};
use crate::utils::logging::{
    append_log_line, init_log_file, log_batch_complete, log_batch_start, log_documents_loaded,
    log_startup, print_final_stats,
};
use crate::workflow::{ProcessResult, QuizCtx, QuizFlow};
use anyhow::{Context, Result};
use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    flow: Arc<QuizFlow>,
}

/// 处理统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total: usize,
}

/// 批次处理结果
#[derive(Debug, Default)]
struct BatchResult {
    success: usize,
    skipped: usize,
    failed: usize,
}

impl App {
    /// 使用 LLM 服务初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        let parser: Arc<dyn QuizParser> = Arc::new(LlmService::new(&config));
        Self::with_parser(config, parser)
    }

    /// 使用自定义解析器初始化应用
    pub fn with_parser(config: Config, parser: Arc<dyn QuizParser>) -> Result<Self> {
        config.validate().context("配置校验失败")?;

        let model_code = match &config.model_code {
            Some(code) => code.trim().to_string(),
            None => {
                let (_, code) = resolve_model_input(&config.llm_model_name)
                    .context("无法确定模型代码，请设置 MODEL_CODE")?;
                code
            }
        };

        init_log_file(&config.output_log_file)?;
        log_startup(config.max_concurrent_documents, &config.llm_model_name);
        info!("🔖 模型代码: {}", model_code);

        let flow = Arc::new(QuizFlow::new(&config, parser, model_code));

        Ok(Self { config, flow })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        info!("\n📁 正在扫描待处理的文档...");
        let sources = scan_input_folder(&self.config.input_folder)
            .await
            .with_context(|| format!("无法扫描输入目录: {}", self.config.input_folder))?;

        if sources.is_empty() {
            warn!("⚠️ 没有找到待处理的文档，程序结束");
            return Ok(ProcessingStats::default());
        }

        log_documents_loaded(sources.len(), self.config.max_concurrent_documents);

        let stats = self.process_all_documents(sources).await?;

        print_final_stats(
            stats.success,
            stats.skipped,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        );

        Ok(stats)
    }

    /// 处理所有文档
    async fn process_all_documents(&self, sources: Vec<PathBuf>) -> Result<ProcessingStats> {
        let max_concurrent = self.config.max_concurrent_documents;
        let semaphore = Arc::new(Semaphore::new(max_concurrent));
        let total = sources.len();
        let total_batches = total.div_ceil(max_concurrent);
        let mut stats = ProcessingStats {
            total,
            ..Default::default()
        };

        // 分批处理
        for (batch_idx, batch) in sources.chunks(max_concurrent).enumerate() {
            let batch_start = batch_idx * max_concurrent;
            let batch_num = batch_idx + 1;

            log_batch_start(
                batch_num,
                total_batches,
                batch_start + 1,
                batch_start + batch.len(),
                total,
            );

            let batch_result = self
                .process_batch(batch, batch_start, semaphore.clone())
                .await?;

            stats.success += batch_result.success;
            stats.skipped += batch_result.skipped;
            stats.failed += batch_result.failed;

            log_batch_complete(batch_num, batch_result.success, batch.len());
        }

        Ok(stats)
    }

    /// 处理单个批次
    async fn process_batch(
        &self,
        batch: &[PathBuf],
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> Result<BatchResult> {
        let mut documents = Vec::new();
        let mut handles = Vec::new();

        for (idx, source) in batch.iter().enumerate() {
            let document_index = batch_start + idx + 1;
            let Some(ctx) = QuizCtx::new(document_index, source.clone()) else {
                continue;
            };

            let permit = semaphore.clone().acquire_owned().await?;
            let flow = self.flow.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                let result = flow.run(&ctx).await;
                if let Err(e) = &result {
                    error!("{} ❌ 处理过程中发生错误: {:#}", ctx.tag(), e);
                }
                result
            });
            documents.push((document_index, source.clone()));
            handles.push(handle);
        }

        let outcomes = join_all(handles).await;
        let mut result = BatchResult::default();

        for ((document_index, source), outcome) in documents.into_iter().zip(outcomes) {
            let line = match outcome {
                Ok(Ok(ProcessResult::Success(output))) => {
                    result.success += 1;
                    format!(
                        "[文档 {}] 成功 {} -> {}",
                        document_index,
                        source.display(),
                        output.display()
                    )
                }
                Ok(Ok(ProcessResult::Skipped)) => {
                    result.skipped += 1;
                    format!("[文档 {}] 跳过 {}", document_index, source.display())
                }
                Ok(Err(e)) => {
                    result.failed += 1;
                    format!("[文档 {}] 失败 {}: {:#}", document_index, source.display(), e)
                }
                Err(e) => {
                    error!("[文档 {}] 任务执行失败: {}", document_index, e);
                    result.failed += 1;
                    format!("[文档 {}] 任务异常 {}: {}", document_index, source.display(), e)
                }
            };

            if let Err(e) = append_log_line(&self.config.output_log_file, &line) {
                warn!("写入运行日志失败: {}", e);
            }
        }

        Ok(result)
    }
}
