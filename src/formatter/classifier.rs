//! 题型判定与结构修复
//!
//! 根据内容形状修正声明的题型，并把混进题干的选项 / 步骤 / 序列行挪出来

use std::collections::HashSet;

use super::cloze::restore_underscores;
use super::rules::{ANSWER_SUMMARY_RE, LABELED_LINE_RE, NAKED_LETTER_RE, PIC_RE, SEQUENCE_LINE_RE};
use super::text_cleaner::{normalize_sequence, retain_lines, strip_not_selected};
use crate::models::quiz::{OptionLabel, QuestionType, QuizOptions};

/// 是否为"答案总结句"伪题
///
/// 非 CLOZE、没有任何选项文本，且题干以 `: A, B, C.` 这样的字母序列结尾
pub fn is_answer_summary(qtype: QuestionType, stem: &str, options: &QuizOptions) -> bool {
    qtype != QuestionType::Cloze && !options.has_any_text() && ANSWER_SUMMARY_RE.is_match(stem)
}

/// CLOZE 误判兜底：有选项文本的 CLOZE 当作 MCQ，并把 `{{...}}` 还原为下划线
pub fn recover_misdetected_cloze(
    qtype: QuestionType,
    stem: String,
    options: &QuizOptions,
) -> (QuestionType, String) {
    if qtype == QuestionType::Cloze && options.has_any_text() {
        (QuestionType::Mcq, restore_underscores(&stem))
    } else {
        (qtype, stem)
    }
}

/// 从题干提取排序题的序列选项
///
/// 识别 `A. B,A,C,D` 或裸的 `B, A, C, D` 行，按出现顺序依次分配到 A、B、C…，
/// 并从题干中删除这些行。超过 F 的序列行同样会被删除。
///
/// # 返回
/// 返回 `(新题干, 提取到的选项)`
pub fn extract_order_sequences(stem: &str) -> (String, QuizOptions) {
    let mut recovered = QuizOptions::default();
    let mut labels = OptionLabel::ALL.iter();

    let new_stem = retain_lines(stem, |line| match sequence_text(line) {
        Some(seq) => {
            if let Some(label) = labels.next() {
                recovered.set(*label, normalize_sequence(seq));
            }
            false
        }
        None => true,
    });

    (new_stem, recovered)
}

/// 合并提取到的选项：只填充原本为空的槽位
pub fn merge_into_empty(options: &mut QuizOptions, recovered: &QuizOptions) {
    for (label, text) in recovered.iter() {
        let slot = options.get_mut(label);
        if slot.trim().is_empty() && !text.is_empty() {
            *slot = text.to_string();
        }
    }
}

/// 排序题：删除题干中与某个步骤完全相同的行，以及裸字母行
pub fn strip_steps_from_stem(stem: &str, steps: &[String]) -> String {
    let step_set: HashSet<String> = steps
        .iter()
        .map(|step| strip_not_selected(step).trim().to_string())
        .filter(|step| !step.is_empty())
        .collect();

    retain_lines(stem, |line| {
        !step_set.contains(line) && !NAKED_LETTER_RE.is_match(line)
    })
}

/// 选择题：删除题干中与某个选项文本完全相同的行
pub fn strip_option_texts_from_stem(stem: &str, options: &QuizOptions) -> String {
    let option_texts: HashSet<&str> = options.non_empty_texts().into_iter().collect();
    if option_texts.is_empty() {
        return stem.to_string();
    }

    retain_lines(stem, |line| !option_texts.contains(line))
}

/// 图片选择题兜底：选项全空且题干含图片时，回填 A..D = "A".."D"
///
/// # 返回
/// 返回是否进行了回填
pub fn synthesize_picture_options(stem: &str, options: &mut QuizOptions) -> bool {
    if options.has_any_text() || !PIC_RE.is_match(stem) {
        return false;
    }

    for label in &OptionLabel::ALL[..4] {
        options.set(*label, label.as_char().to_string());
    }
    true
}

fn sequence_text(line: &str) -> Option<&str> {
    if let Some(body) = LABELED_LINE_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
    {
        if SEQUENCE_LINE_RE.is_match(body) {
            return Some(body);
        }
    }

    SEQUENCE_LINE_RE.is_match(line).then_some(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_summary_detection() {
        let empty = QuizOptions::default();
        let stem = "Place the steps in order: D, C, A, B.";
        assert!(is_answer_summary(QuestionType::Mcq, stem, &empty));
        assert!(is_answer_summary(QuestionType::Order, stem, &empty));
        assert!(!is_answer_summary(QuestionType::Cloze, stem, &empty));

        let options = QuizOptions::from_slice(&["x"]);
        assert!(!is_answer_summary(QuestionType::Mcq, stem, &options));
        assert!(!is_answer_summary(QuestionType::Mcq, "Pick: A", &empty));
    }

    #[test]
    fn test_misdetected_cloze_becomes_mcq() {
        let mut options = QuizOptions::default();
        options.set(OptionLabel::B, "Paris");
        let (qtype, stem) =
            recover_misdetected_cloze(QuestionType::Cloze, "Capital is {{Paris}}.".into(), &options);
        assert_eq!(qtype, QuestionType::Mcq);
        assert_eq!(stem, "Capital is _______.");
    }

    #[test]
    fn test_true_cloze_is_untouched() {
        let (qtype, stem) = recover_misdetected_cloze(
            QuestionType::Cloze,
            "x {{y}}".into(),
            &QuizOptions::default(),
        );
        assert_eq!(qtype, QuestionType::Cloze);
        assert_eq!(stem, "x {{y}}");
    }

    #[test]
    fn test_extract_order_sequences() {
        let stem = "Put in order<br>A. B,A,C,D<br>B. a, b, d, c<br>C, D, A, B<br>Note";
        let (new_stem, recovered) = extract_order_sequences(stem);
        assert_eq!(new_stem, "Put in order<br>Note");
        assert_eq!(recovered.a, "B,A,C,D");
        assert_eq!(recovered.b, "A,B,D,C");
        assert_eq!(recovered.c, "C,D,A,B");
        assert_eq!(recovered.d, "");
    }

    #[test]
    fn test_labeled_prose_is_not_a_sequence() {
        let (new_stem, recovered) = extract_order_sequences("Q<br>A. First step");
        assert_eq!(new_stem, "Q<br>A. First step");
        assert!(!recovered.has_any_text());
    }

    #[test]
    fn test_merge_only_fills_empty_slots() {
        let mut options = QuizOptions::from_slice(&["A,B", ""]);
        let recovered = QuizOptions::from_slice(&["C,D", "D,C"]);
        merge_into_empty(&mut options, &recovered);
        assert_eq!(options.a, "A,B");
        assert_eq!(options.b, "D,C");
    }

    #[test]
    fn test_strip_steps_and_naked_letters() {
        let steps = vec!["A. Mix".to_string(), "B. Bake, Not Selected".to_string()];
        let stem = "Order these<br>A. Mix<br>B.<br>B. Bake<br>Then serve";
        assert_eq!(strip_steps_from_stem(stem, &steps), "Order these<br>Then serve");
    }

    #[test]
    fn test_strip_option_texts() {
        let options = QuizOptions::from_slice(&["Paris", "Rome"]);
        assert_eq!(
            strip_option_texts_from_stem("Capital?<br>Paris<br>Rome", &options),
            "Capital?"
        );
        assert_eq!(
            strip_option_texts_from_stem("Capital?<br>Paris", &QuizOptions::default()),
            "Capital?<br>Paris"
        );
    }

    #[test]
    fn test_picture_options_synthesized() {
        let mut options = QuizOptions::default();
        assert!(synthesize_picture_options("Which?<br>§Pic.1§", &mut options));
        assert_eq!(options, QuizOptions::from_slice(&["A", "B", "C", "D"]));

        let mut options = QuizOptions::default();
        assert!(!synthesize_picture_options("No picture", &mut options));
        assert!(!options.has_any_text());
    }
}
