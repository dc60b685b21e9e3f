//! # Lithoformer
//!
//! 把测验 Markdown / 结构化题目转换为带双语、解析和题号标记的闪卡文本
//!
//! ## 架构设计
//!
//! ### ① 格式化核心（Formatter）
//! - `formatter/` - 纯函数，不做 I/O
//! - `QuizFormatter` - 题目列表 → 输出文本
//! - `pipeline` - 单题状态机（清理 → 定型 → 修复 → 渲染 → 双语 → 解析）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `LlmService` - Markdown → 结构化题目
//! - `titles` - 标题 / 题号推断
//! - `output_writer` - 批次 ID、输出文件命名与写入
//!
//! ### ③ 流程层（Workflow）
//! - `QuizCtx` - 上下文封装（文档索引 + 路径）
//! - `QuizFlow` - 流程编排（加载 → 过滤 → 格式化 → 写入）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量文档处理器，管理并发
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod formatter;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use formatter::{format_quiz, FormatterConfig, QuizFormatter};
pub use models::quiz::{Analysis, Distractor, OptionLabel, QuestionType, QuizItem, QuizOptions};
pub use orchestrator::{App, ProcessingStats};
pub use services::{LlmService, QuizParser};
pub use workflow::{ProcessResult, QuizCtx, QuizFlow};
