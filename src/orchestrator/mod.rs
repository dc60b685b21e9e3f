//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和并发调度。
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<文档>)
//!     ↓
//! workflow::QuizFlow (处理单个文档)
//!     ↓
//! services (能力层：LLM 解析 / 标题推断 / 输出命名)
//!     ↓
//! formatter (纯函数：题目 → 闪卡文本)
//! ```

pub mod batch_processor;

pub use batch_processor::{App, ProcessingStats};
