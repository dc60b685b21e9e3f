//! 双语合成：逐行把译文 `((::译文))` 插到原文下一行

use super::rules::BR;

/// 合成原文与译文
///
/// 译文为空时原样返回原文（去首尾空白）。否则按 `<br>` 拆分两边，
/// 以较长的一侧为准逐行输出：
/// - 原文和译文都有：`原文<br>((::译文))`
/// - 只有原文：`原文`
/// - 只有译文：`((::译文))`
/// - 都没有：空行
pub fn combine_bilingual(primary: &str, translation: &str) -> String {
    let primary = primary.trim();
    let translation = translation.trim();

    if translation.is_empty() {
        return primary.to_string();
    }

    let primary_lines: Vec<&str> = primary.split(BR).collect();
    let translated_lines: Vec<&str> = translation.split(BR).collect();
    let len = primary_lines.len().max(translated_lines.len());

    (0..len)
        .map(|idx| {
            let line = primary_lines.get(idx).map_or("", |s| s.trim());
            let translated = translated_lines.get(idx).map_or("", |s| s.trim());
            match (line.is_empty(), translated.is_empty()) {
                (false, false) => format!("{line}{BR}((::{translated}))"),
                (false, true) => line.to_string(),
                (true, false) => format!("((::{translated}))"),
                (true, true) => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(BR)
}

/// 按下标取译文，越界时返回空串
pub fn translation_at(translations: &[String], idx: usize) -> &str {
    translations.get(idx).map_or("", String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_translation_returns_primary() {
        assert_eq!(combine_bilingual(" Hello<br>World ", ""), "Hello<br>World");
    }

    #[test]
    fn test_interleaves_line_by_line() {
        assert_eq!(
            combine_bilingual("Hello<br>World", "你好<br>世界"),
            "Hello<br>((::你好))<br>World<br>((::世界))"
        );
    }

    #[test]
    fn test_mismatched_lengths_are_padded() {
        assert_eq!(
            combine_bilingual("One<br>Two", "一"),
            "One<br>((::一))<br>Two"
        );
        assert_eq!(
            combine_bilingual("One", "一<br>二"),
            "One<br>((::一))<br>((::二))"
        );
    }

    #[test]
    fn test_blank_lines_stay_blank() {
        assert_eq!(
            combine_bilingual("A<br><br>B", "甲<br><br>乙"),
            "A<br>((::甲))<br><br>B<br>((::乙))"
        );
    }

    #[test]
    fn test_translation_at_out_of_range() {
        let translations = vec!["一".to_string()];
        assert_eq!(translation_at(&translations, 0), "一");
        assert_eq!(translation_at(&translations, 3), "");
    }
}
