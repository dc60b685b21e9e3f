//! 解析块渲染 `[[解析:: ... ]]`

use super::rules::{BR, PARAGRAPH};
use super::text_cleaner::{collapse_separators, unify_line_breaks};
use crate::models::quiz::{Analysis, OptionLabel, QuizOptions};

const BLANK_DIV: &str = "<div><br></div>";

/// 渲染解析块
///
/// # 参数
/// - `analysis`: 解析内容（`None` 时返回空串）
/// - `answer`: 正确答案（字母或序列）
/// - `options`: 用于在标题中显示正确选项的文本
///
/// # 返回
/// 以两个 `<br>` 开头、`<br>` 结尾的解析标记
pub fn render_analysis(analysis: Option<&Analysis>, answer: &str, options: &QuizOptions) -> String {
    let Some(analysis) = analysis else {
        return String::new();
    };

    let mut sections: Vec<String> = Vec::new();

    let domain = analysis.domain.trim();
    if !domain.is_empty() {
        sections.push(div(&format!("领域：{domain}")));
    }

    let answer_letter = answer.trim().to_uppercase();
    let answer_text = OptionLabel::parse(&answer_letter)
        .map(|label| options.get(label).trim())
        .unwrap_or("");
    let mut header = format!("为什么选 {}", answer_letter.to_lowercase());
    if !answer_text.is_empty() {
        header.push_str(&format!("（{answer_text}）"));
    }
    sections.push(div(&header));

    let rationale = analysis.rationale.trim();
    if !rationale.is_empty() {
        sections.push(div(&unify_line_breaks(rationale)));
    }

    let key_points: Vec<&str> = analysis
        .key_points
        .iter()
        .map(|point| point.trim())
        .filter(|point| !point.is_empty())
        .collect();
    if !key_points.is_empty() {
        sections.push(BLANK_DIV.to_string());
        sections.push(div("相关知识："));
        sections.extend(key_points.iter().map(|point| div(&unify_line_breaks(point))));
    }

    let distractors: Vec<String> = analysis
        .distractors
        .iter()
        .filter_map(|dist| {
            let letter = dist.option.trim().to_uppercase();
            if letter.is_empty() {
                return None;
            }
            let reason = unify_line_breaks(dist.reason.trim());
            Some(div(&format!("{letter}. {reason}")))
        })
        .collect();
    if !distractors.is_empty() {
        sections.push(BLANK_DIV.to_string());
        sections.push(div(&format!(
            "其他选项为什么不如 {}：",
            answer_letter.to_lowercase()
        )));
        sections.extend(distractors);
    }

    let body = collapse_separators(&sections.concat());
    format!("{PARAGRAPH}[[解析::{BR}{body}]]{BR}")
}

fn div(content: &str) -> String {
    format!("<div>{content}</div>")
}
