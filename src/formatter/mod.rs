//! 题目格式化核心
//!
//! 把结构化的 [`QuizItem`] 列表渲染为带双语 / 解析 / 题号标记的闪卡文本。
//! 纯函数，不做任何 I/O。

pub mod analysis;
pub mod bilingual;
pub mod classifier;
pub mod cloze;
pub mod pipeline;
pub mod rules;
pub mod text_cleaner;

use tracing::debug;

use crate::models::quiz::QuizItem;
use rules::PARAGRAPH;
use text_cleaner::collapse_separators;

/// 格式化参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterConfig {
    /// 标题主部分（通常是 "Quiz"）
    pub title_main: String,
    /// 标题副部分（科目 / 章节）
    pub title_sub: String,
    /// 批次编号，设置后在每题末尾追加
    pub batch_code: Option<String>,
    /// 题号起点，设置后第 k 道题的编号为 `start + k`
    pub question_start: Option<u32>,
    /// 题号前缀
    pub question_prefix: String,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            title_main: "Quiz".to_string(),
            title_sub: String::new(),
            batch_code: None,
            question_start: None,
            question_prefix: "L".to_string(),
        }
    }
}

impl FormatterConfig {
    pub fn new(title_main: impl Into<String>, title_sub: impl Into<String>) -> Self {
        Self {
            title_main: title_main.into(),
            title_sub: title_sub.into(),
            ..Default::default()
        }
    }

    pub fn with_batch_code(mut self, batch_code: impl Into<String>) -> Self {
        self.batch_code = Some(batch_code.into());
        self
    }

    pub fn with_question_start(mut self, start: u32) -> Self {
        self.question_start = Some(start);
        self
    }

    pub fn with_question_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.question_prefix = prefix.into();
        self
    }

    /// 标题头 `<b>main:<br>sub</b>`
    pub fn header(&self) -> String {
        format!("<b>{}:<br>{}</b>", self.title_main, self.title_sub)
    }

    /// 第 `ordinal` 道存活题目（从 1 开始）的题号
    pub fn question_code(&self, ordinal: usize) -> Option<String> {
        self.question_start
            .map(|start| format!("{}{:06}", self.question_prefix, u64::from(start) + ordinal as u64))
    }
}

/// 格式化结果统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedQuiz {
    pub text: String,
    pub rendered: usize,
    pub dropped: usize,
}

/// 题目格式化器
#[derive(Debug, Clone, Default)]
pub struct QuizFormatter {
    config: FormatterConfig,
}

impl QuizFormatter {
    pub fn new(config: FormatterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// 格式化一组题目，每题一块，块之间用 `\n` 分隔
    pub fn format(&self, items: &[QuizItem]) -> String {
        self.format_with_stats(items).text
    }

    /// 同 [`Self::format`]，同时返回渲染 / 丢弃数量
    pub fn format_with_stats(&self, items: &[QuizItem]) -> FormattedQuiz {
        let blocks: Vec<String> = items
            .iter()
            .cloned()
            .filter_map(|item| self.render_block(item))
            .collect();

        let rendered = blocks.len();
        let dropped = items.len() - rendered;
        if dropped > 0 {
            debug!("格式化完成: 渲染 {} 题，丢弃 {} 题", rendered, dropped);
        }

        // 题号只分配给存活的题目，所以放在过滤之后统一盖章
        let text = blocks
            .into_iter()
            .enumerate()
            .map(|(idx, block)| block + &self.stamp(idx + 1))
            .collect::<Vec<_>>()
            .join("\n");

        FormattedQuiz {
            text,
            rendered,
            dropped,
        }
    }

    /// 渲染单题（不含盖章），被丢弃的题目返回 `None`
    pub fn render_block(&self, item: QuizItem) -> Option<String> {
        let body = pipeline::run(item)?;
        Some(collapse_separators(&format!(
            "{}{PARAGRAPH}{body}",
            self.config.header()
        )))
    }

    fn stamp(&self, ordinal: usize) -> String {
        let mut footer = String::new();
        if let Some(batch_code) = &self.config.batch_code {
            footer.push_str(&right_aligned(batch_code));
        }
        if let Some(code) = self.config.question_code(ordinal) {
            footer.push_str(&right_aligned(&code));
        }
        footer
    }
}

/// 便捷函数：使用给定参数格式化
pub fn format_quiz(items: &[QuizItem], config: &FormatterConfig) -> String {
    QuizFormatter::new(config.clone()).format(items)
}

fn right_aligned(content: &str) -> String {
    format!("<div style=\"text-align: right;\">{content}</div>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::QuizOptions;

    fn sample() -> QuizItem {
        QuizItem::mcq(
            "What is 2+2?",
            QuizOptions::from_slice(&["3", "4", "5", "6"]),
            "B",
        )
    }

    #[test]
    fn test_header_and_question_code() {
        let config = FormatterConfig::new("Quiz", "Math").with_question_start(41);
        assert_eq!(config.header(), "<b>Quiz:<br>Math</b>");
        assert_eq!(config.question_code(1).as_deref(), Some("L000042"));
        assert_eq!(
            config.with_question_prefix("Q").question_code(3).as_deref(),
            Some("Q000044")
        );
        assert_eq!(FormatterConfig::default().question_code(1), None);
    }

    #[test]
    fn test_single_mcq_without_stamp() {
        let config = FormatterConfig::new("Quiz", "Math");
        assert_eq!(
            format_quiz(&[sample()], &config),
            "<b>Quiz:<br>Math</b><br><br>[What is 2+2?<br>A. 3<br>B. 4<br>C. 5<br>D. 6]::(B)"
        );
    }

    #[test]
    fn test_stamp_order_batch_then_code() {
        let config = FormatterConfig::new("Quiz", "Math")
            .with_batch_code("AS202610160001")
            .with_question_start(0);
        let text = format_quiz(&[sample()], &config);
        assert!(text.ends_with(
            "]::(B)<div style=\"text-align: right;\">AS202610160001</div>\
             <div style=\"text-align: right;\">L000001</div>"
        ));
    }

    #[test]
    fn test_stats_count_dropped_items() {
        let summary = QuizItem::mcq("Order: B, A.", QuizOptions::default(), "");
        let formatter = QuizFormatter::new(FormatterConfig::new("Quiz", "Math"));
        let result = formatter.format_with_stats(&[summary, sample()]);
        assert_eq!(result.rendered, 1);
        assert_eq!(result.dropped, 1);
        assert!(!result.text.contains('\n'));
    }

    #[test]
    fn test_empty_input_is_empty_output() {
        assert_eq!(QuizFormatter::default().format(&[]), "");
    }
}
