//! 格式化规则中用到的正则表达式（编译一次，全局只读）

use once_cell::sync::Lazy;
use regex::Regex;

/// 逻辑换行符
pub const BR: &str = "<br>";

/// 段落分隔（两个逻辑换行）
pub const PARAGRAPH: &str = "<br><br>";

/// 误判 CLOZE 还原时使用的下划线
pub const RESTORED_BLANK: &str = "_______";

/// 图片占位符 `§Pic.N§`
pub static PIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"§Pic\.(\d+)§").expect("pic"));

/// 图片占位符连同两侧已有的一个换行
pub static PIC_ISOLATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:<br>)?(§Pic\.\d+§)(?:<br>)?").expect("pic isolate"));

/// 答案总结句结尾，例如 `... in order: D, C, A, B.`
pub static ANSWER_SUMMARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i):\s*[A-F](\s*,\s*[A-F])+\.*\s*$").expect("answer summary"));

/// 填空标记 `{{...}}`
pub static CURLY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{[^}]*\}\}").expect("curly"));

/// 填空下划线（3 个及以上）
pub static UNDERSCORE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_{3,}").expect("underscore"));

/// 小写伪选项行 `a. something`
pub static LOWER_OPTION_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*[a-d]\.\s+.+$").expect("lower option"));

/// 只有字母和点的行 `A.`
pub static NAKED_LETTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[A-F]\.\s*$").expect("naked letter"));

/// 判分残留 `Correct answer:` / `Incorrect answer:`
pub static GRADE_ARTIFACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(Correct\s*answer:|Incorrect\s*answer:)\s*$").expect("grade artifact")
});

/// 行尾 `, Not Selected`（可重复）
pub static NOT_SELECTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(,\s*Not Selected\s*)+$").expect("not selected"));

/// 纯序列行 `B, A, C, D`
pub static SEQUENCE_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*[A-F](\s*,\s*[A-F])+\s*\.?\s*$").expect("sequence line"));

/// 带标签的行 `A. <text>`
pub static LABELED_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[A-F]\.\s*(.+)$").expect("labeled line"));

/// 选项标签前缀 `A.` / `(A)` / `A)` / `[A]`
pub static OPTION_LABEL_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[\(\[]?\s*[A-Fa-f]\s*[\.\)\]]\s*").expect("option prefix"));

/// 项目符号前缀
pub static BULLET_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[•\-–—·\*]\s*").expect("bullet"));

/// 乱码前缀 `く`
pub static GARBLED_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^く+\s*").expect("garbled"));

/// 序列中的字母
pub static SEQUENCE_LETTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Fa-f]").expect("sequence letter"));

/// 3 个及以上连续的逻辑换行
pub static BR_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:<br>){3,}").expect("br run"));
