//! 单题处理流水线
//!
//! ```text
//! RAW -> CLEANED -> TYPE-RESOLVED -> STEM-RECOVERED -> BODY-RENDERED
//!     -> BILINGUAL-MERGED -> ANALYSIS-APPENDED -> STAMPED
//! ```
//!
//! 每个阶段产出一个独立的值，后一阶段只消费前一阶段的输出。
//! 盖章（题号 / 批次）由 [`super::QuizFormatter`] 在所有题目处理完后统一完成。

use tracing::debug;

use super::analysis::render_analysis;
use super::bilingual::{combine_bilingual, translation_at};
use super::classifier::{
    extract_order_sequences, is_answer_summary, merge_into_empty, recover_misdetected_cloze,
    strip_option_texts_from_stem, strip_steps_from_stem, synthesize_picture_options,
};
use super::cloze::fill_cloze;
use super::rules::{BR, NAKED_LETTER_RE};
use super::text_cleaner::{
    clean_stem, collapse_separators, normalize_sequence, normalize_translation,
    strip_not_selected, strip_option_prefix,
};
use crate::models::quiz::{OptionLabel, QuestionType, QuizItem, QuizOptions};

/// CLEANED：题干已统一换行、图片独占一行、去掉垃圾行
#[derive(Debug, Clone)]
pub struct CleanedQuestion {
    pub item: QuizItem,
    pub stem: String,
}

/// TYPE-RESOLVED：题型已修正
#[derive(Debug, Clone)]
pub struct ResolvedQuestion {
    pub item: QuizItem,
    pub qtype: QuestionType,
    pub stem: String,
}

/// STEM-RECOVERED：题干中的重复内容已移除，选项已补全并去前缀
#[derive(Debug, Clone)]
pub struct RecoveredQuestion {
    pub item: QuizItem,
    pub qtype: QuestionType,
    pub stem: String,
    pub options: QuizOptions,
    pub answer: String,
}

/// BODY-RENDERED / BILINGUAL-MERGED：题目主体的各个部分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBody {
    pub qtype: QuestionType,
    pub stem: String,
    /// `(原始下标, 步骤文本)`，下标用于配对译文
    pub steps: Vec<(usize, String)>,
    pub options: Vec<(OptionLabel, String)>,
    pub answer: String,
}

/// RAW -> CLEANED
pub fn clean(item: QuizItem) -> CleanedQuestion {
    let stem = clean_stem(&item.stem);
    CleanedQuestion { item, stem }
}

/// CLEANED -> TYPE-RESOLVED
///
/// 答案总结句伪题返回 `None`（直接丢弃），随后处理 CLOZE 误判
pub fn resolve_type(question: CleanedQuestion) -> Option<ResolvedQuestion> {
    let CleanedQuestion { item, stem } = question;

    if is_answer_summary(item.qtype, &stem, &item.options) {
        debug!("丢弃答案总结句: {}", stem);
        return None;
    }

    let (qtype, stem) = recover_misdetected_cloze(item.qtype, stem, &item.options);
    if qtype != item.qtype {
        debug!("CLOZE 误判，按 {} 处理", qtype);
    }

    Some(ResolvedQuestion { item, qtype, stem })
}

/// TYPE-RESOLVED -> STEM-RECOVERED
pub fn recover_stem(question: ResolvedQuestion) -> RecoveredQuestion {
    let ResolvedQuestion {
        item,
        qtype,
        mut stem,
    } = question;
    let mut options = item.options.clone();
    let answer = item.answer.trim().to_uppercase();

    match qtype {
        QuestionType::Cloze => {}
        QuestionType::Order => {
            if !options.has_any_text() {
                let (new_stem, recovered) = extract_order_sequences(&stem);
                stem = new_stem;
                merge_into_empty(&mut options, &recovered);
            }
            stem = strip_steps_from_stem(&stem, &item.steps);
        }
        QuestionType::Mcq => {
            if synthesize_picture_options(&stem, &mut options) {
                debug!("图片选择题，回填选项 A-D");
            }
            options = options.map(|text| {
                if text.trim().is_empty() {
                    String::new()
                } else {
                    strip_option_prefix(text)
                }
            });
            stem = strip_option_texts_from_stem(&stem, &options);
        }
    }

    RecoveredQuestion {
        item,
        qtype,
        stem,
        options,
        answer,
    }
}

/// STEM-RECOVERED -> BODY-RENDERED
pub fn render_body(question: &RecoveredQuestion) -> QuestionBody {
    let mut body = QuestionBody {
        qtype: question.qtype,
        stem: question.stem.clone(),
        steps: Vec::new(),
        options: Vec::new(),
        answer: question.answer.clone(),
    };

    match question.qtype {
        QuestionType::Cloze => {
            body.stem = collapse_separators(&fill_cloze(&question.stem, &question.item.cloze_answers));
        }
        QuestionType::Order => {
            body.steps = question
                .item
                .steps
                .iter()
                .enumerate()
                .filter_map(|(idx, step)| {
                    let step = strip_not_selected(step).trim().to_string();
                    (!step.is_empty() && !NAKED_LETTER_RE.is_match(&step)).then_some((idx, step))
                })
                .collect();
            body.options = populated(&question.options, normalize_sequence);
        }
        QuestionType::Mcq => {
            body.options = populated(&question.options, |text| text.trim().to_string());
        }
    }

    body
}

/// BODY-RENDERED -> BILINGUAL-MERGED
///
/// 译文数组长度与原文不一致时，缺失的译文按空处理
pub fn merge_translations(body: QuestionBody, item: &QuizItem) -> QuestionBody {
    let stem = combine_bilingual(&body.stem, &normalize_translation(&item.stem_translation));

    let steps = body
        .steps
        .into_iter()
        .map(|(idx, step)| {
            let translated = normalize_translation(translation_at(&item.steps_translation, idx));
            (idx, combine_bilingual(&step, &translated))
        })
        .collect();

    let options = body
        .options
        .into_iter()
        .map(|(label, text)| {
            let translated = normalize_translation(item.options_translation.get(label));
            (label, combine_bilingual(&text, &translated))
        })
        .collect();

    QuestionBody {
        stem,
        steps,
        options,
        ..body
    }
}

impl QuestionBody {
    /// 输出题目主体标记
    ///
    /// CLOZE 直接输出题干；MCQ / ORDER 输出 `[题干<br> 步骤<br>A. 选项]::(答案)`
    pub fn to_markup(&self) -> String {
        if self.qtype == QuestionType::Cloze {
            return self.stem.clone();
        }

        let mut lines = Vec::with_capacity(1 + self.steps.len() + self.options.len());
        lines.push(self.stem.clone());
        lines.extend(self.steps.iter().map(|(_, step)| format!(" {step}")));
        lines.extend(
            self.options
                .iter()
                .map(|(label, text)| format!("{label}. {text}")),
        );

        format!("[{}]::({})", lines.join(BR), self.answer)
    }
}

/// BILINGUAL-MERGED -> ANALYSIS-APPENDED
pub fn append_analysis(markup: String, question: &RecoveredQuestion) -> String {
    let analysis = render_analysis(
        question.item.analysis.as_ref(),
        &question.answer,
        &question.options,
    );
    markup + &analysis
}

/// 依次执行所有阶段，返回未盖章的题目主体（含解析）
///
/// 被判定为答案总结句的题目返回 `None`
pub fn run(item: QuizItem) -> Option<String> {
    let resolved = resolve_type(clean(item))?;
    let recovered = recover_stem(resolved);
    let body = merge_translations(render_body(&recovered), &recovered.item);
    Some(append_analysis(body.to_markup(), &recovered))
}

fn populated(
    options: &QuizOptions,
    normalize: impl Fn(&str) -> String,
) -> Vec<(OptionLabel, String)> {
    options
        .iter()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(label, text)| (label, normalize(text)))
        .collect()
}
