//! 文本清理工具
//!
//! 全部是纯函数（`&str -> String`），逻辑换行统一使用 `<br>`

use super::rules::{
    BR, BR_RUN_RE, BULLET_PREFIX_RE, GARBLED_PREFIX_RE, GRADE_ARTIFACT_RE, LOWER_OPTION_LINE_RE,
    NAKED_LETTER_RE, NOT_SELECTED_RE, OPTION_LABEL_PREFIX_RE, PARAGRAPH, PIC_ISOLATE_RE,
    SEQUENCE_LETTER_RE,
};

/// 统一换行符为 `<br>`（CRLF / CR / LF）
pub fn unify_line_breaks(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").replace('\n', BR)
}

/// 在图片占位符前后插入换行，保证占位符独占一行
///
/// 已经紧邻的换行会被复用，重复调用不会叠加空行
pub fn isolate_pictures(text: &str) -> String {
    PIC_ISOLATE_RE.replace_all(text, "<br>${1}<br>").into_owned()
}

/// 去掉行尾的 `, Not Selected`
pub fn strip_not_selected(line: &str) -> String {
    NOT_SELECTED_RE.replace(line, "").into_owned()
}

/// 是否为需要丢弃的垃圾行（判分残留、裸字母、小写伪选项）
pub fn is_artifact_line(line: &str) -> bool {
    if GRADE_ARTIFACT_RE.is_match(line) || NAKED_LETTER_RE.is_match(line) {
        return true;
    }
    LOWER_OPTION_LINE_RE.is_match(line)
        && line
            .trim_start()
            .chars()
            .next()
            .is_some_and(|c| c.is_lowercase())
}

/// 清理题干中的垃圾行 / 伪选项 / 空行
///
/// 相邻内容行之间只要出现过空行，就保留一个段落分隔（`<br><br>`）；
/// 开头和结尾的空行直接丢弃。被丢弃的垃圾行会吞掉它之前的空行。
pub fn strip_artifacts(text: &str) -> String {
    let text = unify_line_breaks(text);
    let mut out = String::with_capacity(text.len());
    let mut blank_seen = false;

    for raw in text.split(BR) {
        let line = strip_not_selected(raw);
        let line = line.trim();

        if line.is_empty() {
            blank_seen = true;
            continue;
        }
        if is_artifact_line(line) {
            blank_seen = false;
            continue;
        }

        if !out.is_empty() {
            out.push_str(if blank_seen { PARAGRAPH } else { BR });
        }
        out.push_str(line);
        blank_seen = false;
    }

    out
}

/// 题干清理：统一换行 -> 图片独占一行 -> 去垃圾行
pub fn clean_stem(stem: &str) -> String {
    strip_artifacts(&isolate_pictures(&unify_line_breaks(stem.trim())))
}

/// 折叠过多的 `<br>`：3 个及以上压缩为 2 个
pub fn collapse_separators(text: &str) -> String {
    BR_RUN_RE.replace_all(text, PARAGRAPH).into_owned()
}

/// 选项文本去头部前缀：`A.` / `(A)` / `A)` / `•` / `く` 等
pub fn strip_option_prefix(text: &str) -> String {
    let text = text.trim();
    let text = OPTION_LABEL_PREFIX_RE.replace(text, "");
    let text = BULLET_PREFIX_RE.replace(&text, "");
    let text = GARBLED_PREFIX_RE.replace(&text, "");
    strip_not_selected(&text).trim().to_string()
}

/// 序列规范化：`• B,A, C ,D` -> `B,A,C,D`
pub fn normalize_sequence(text: &str) -> String {
    SEQUENCE_LETTER_RE
        .find_iter(text)
        .map(|m| m.as_str().to_uppercase())
        .collect::<Vec<_>>()
        .join(",")
}

/// 翻译文本规范化：统一换行并折叠多余的 `<br>`
pub fn normalize_translation(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    collapse_separators(&unify_line_breaks(text))
}

/// 按行过滤文本，保留段落结构
///
/// 连续空行合并为一个，开头和结尾的空行去掉
pub fn retain_lines(text: &str, mut keep: impl FnMut(&str) -> bool) -> String {
    let mut lines: Vec<&str> = Vec::new();

    for line in text.split(BR).map(str::trim) {
        if line.is_empty() {
            if lines.last().is_some_and(|last| !last.is_empty()) {
                lines.push("");
            }
            continue;
        }
        if keep(line) {
            lines.push(line);
        }
    }

    while lines.last() == Some(&"") {
        lines.pop();
    }

    lines.join(BR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unify_line_breaks() {
        assert_eq!(unify_line_breaks("a\r\nb\rc\nd"), "a<br>b<br>c<br>d");
    }

    #[test]
    fn test_isolate_pictures() {
        assert_eq!(
            isolate_pictures("see §Pic.12§ below"),
            "see <br>§Pic.12§<br> below"
        );
        assert_eq!(
            clean_stem("see §Pic.1§ below"),
            "see<br>§Pic.1§<br>below"
        );
        assert_eq!(isolate_pictures("a<br>§Pic.1§<br>b"), "a<br>§Pic.1§<br>b");
    }

    #[test]
    fn test_strip_artifacts_drops_junk_lines() {
        let raw = "Which one?\nA.\nCorrect answer:\na. pseudo option\nB. real text\nlast, Not Selected";
        assert_eq!(
            strip_artifacts(raw),
            "Which one?<br>B. real text<br>last"
        );
    }

    #[test]
    fn test_strip_artifacts_keeps_one_paragraph_break() {
        assert_eq!(strip_artifacts("a\n\nb"), "a<br><br>b");
        assert_eq!(strip_artifacts("a\n\n\n\nb"), "a<br><br>b");
        assert_eq!(strip_artifacts("\n\na\nb\n\n"), "a<br>b");
    }

    #[test]
    fn test_artifact_swallows_preceding_blank() {
        assert_eq!(strip_artifacts("a\n\nIncorrect answer:\nb"), "a<br>b");
    }

    #[test]
    fn test_strip_artifacts_is_idempotent() {
        let samples = [
            "Q?\n\n\nA.\n b , Not Selected, Not Selected\n\nc\nCorrect Answer:\n",
            "§Pic.1§ text\n\nmore\na. junk",
            "",
        ];
        for raw in samples {
            let once = strip_artifacts(&isolate_pictures(raw));
            assert_eq!(strip_artifacts(&once), once);
        }
    }

    #[test]
    fn test_collapse_separators() {
        assert_eq!(collapse_separators("a<br><br><br><br>b"), "a<br><br>b");
        assert_eq!(collapse_separators("a<br><br>b"), "a<br><br>b");
    }

    #[test]
    fn test_strip_option_prefix() {
        assert_eq!(strip_option_prefix("A. Paris"), "Paris");
        assert_eq!(strip_option_prefix("(b) Berlin"), "Berlin");
        assert_eq!(strip_option_prefix("C) Rome"), "Rome");
        assert_eq!(strip_option_prefix("[D] Madrid"), "Madrid");
        assert_eq!(strip_option_prefix("• Lisbon"), "Lisbon");
        assert_eq!(strip_option_prefix("くく Oslo, Not Selected"), "Oslo");
        assert_eq!(strip_option_prefix("A"), "A");
    }

    #[test]
    fn test_normalize_sequence() {
        assert_eq!(normalize_sequence("• B,A, C ,D"), "B,A,C,D");
        assert_eq!(normalize_sequence("b, a"), "B,A");
        assert_eq!(normalize_sequence(""), "");
    }

    #[test]
    fn test_normalize_translation() {
        assert_eq!(normalize_translation("  "), "");
        assert_eq!(normalize_translation("一\n\n\n\n二"), "一<br><br>二");
    }

    #[test]
    fn test_retain_lines_keeps_paragraphs() {
        let text = "Q<br><br>drop<br>keep<br><br><br>drop";
        assert_eq!(retain_lines(text, |line| line != "drop"), "Q<br><br>keep");
    }
}
