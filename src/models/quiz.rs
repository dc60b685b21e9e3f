use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 题目类型
///
/// 反序列化时不区分大小写，无法识别的值或 null 按 MCQ 处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", from = "Option<String>")]
pub enum QuestionType {
    /// 选择题
    #[default]
    Mcq,
    /// 填空题
    Cloze,
    /// 排序题
    Order,
}

impl QuestionType {
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Mcq => "MCQ",
            QuestionType::Cloze => "CLOZE",
            QuestionType::Order => "ORDER",
        }
    }
}

impl From<String> for QuestionType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "CLOZE" => QuestionType::Cloze,
            "ORDER" => QuestionType::Order,
            _ => QuestionType::Mcq,
        }
    }
}

impl From<Option<String>> for QuestionType {
    fn from(value: Option<String>) -> Self {
        value.map(Self::from).unwrap_or_default()
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 选项标签 A-F
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl OptionLabel {
    /// 全部标签（按渲染顺序）
    pub const ALL: [OptionLabel; 6] = [
        OptionLabel::A,
        OptionLabel::B,
        OptionLabel::C,
        OptionLabel::D,
        OptionLabel::E,
        OptionLabel::F,
    ];

    pub fn as_char(self) -> char {
        match self {
            OptionLabel::A => 'A',
            OptionLabel::B => 'B',
            OptionLabel::C => 'C',
            OptionLabel::D => 'D',
            OptionLabel::E => 'E',
            OptionLabel::F => 'F',
        }
    }

    /// 从字母解析标签（不区分大小写）
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(OptionLabel::A),
            'B' => Some(OptionLabel::B),
            'C' => Some(OptionLabel::C),
            'D' => Some(OptionLabel::D),
            'E' => Some(OptionLabel::E),
            'F' => Some(OptionLabel::F),
            _ => None,
        }
    }

    /// 从字符串解析标签，只接受单个字母
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// 选项 A-F
///
/// 六个槽位始终存在，缺失的选项为空字符串
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOptions {
    #[serde(rename = "A", default, deserialize_with = "deserialize_lenient_string")]
    pub a: String,
    #[serde(rename = "B", default, deserialize_with = "deserialize_lenient_string")]
    pub b: String,
    #[serde(rename = "C", default, deserialize_with = "deserialize_lenient_string")]
    pub c: String,
    #[serde(rename = "D", default, deserialize_with = "deserialize_lenient_string")]
    pub d: String,
    #[serde(rename = "E", default, deserialize_with = "deserialize_lenient_string")]
    pub e: String,
    #[serde(rename = "F", default, deserialize_with = "deserialize_lenient_string")]
    pub f: String,
}

impl QuizOptions {
    /// 按 A、B、C… 顺序构造，多余的值被忽略
    pub fn from_slice(values: &[&str]) -> Self {
        let mut options = Self::default();
        for (label, value) in OptionLabel::ALL.iter().zip(values) {
            options.set(*label, *value);
        }
        options
    }

    pub fn get(&self, label: OptionLabel) -> &str {
        match label {
            OptionLabel::A => &self.a,
            OptionLabel::B => &self.b,
            OptionLabel::C => &self.c,
            OptionLabel::D => &self.d,
            OptionLabel::E => &self.e,
            OptionLabel::F => &self.f,
        }
    }

    pub fn get_mut(&mut self, label: OptionLabel) -> &mut String {
        match label {
            OptionLabel::A => &mut self.a,
            OptionLabel::B => &mut self.b,
            OptionLabel::C => &mut self.c,
            OptionLabel::D => &mut self.d,
            OptionLabel::E => &mut self.e,
            OptionLabel::F => &mut self.f,
        }
    }

    pub fn set(&mut self, label: OptionLabel, value: impl Into<String>) {
        *self.get_mut(label) = value.into();
    }

    /// 按标签顺序遍历所有槽位（包括空槽位）
    pub fn iter(&self) -> impl Iterator<Item = (OptionLabel, &str)> + '_ {
        OptionLabel::ALL.iter().map(move |label| (*label, self.get(*label)))
    }

    /// 是否存在任何非空选项
    pub fn has_any_text(&self) -> bool {
        self.iter().any(|(_, text)| !text.trim().is_empty())
    }

    /// 非空选项文本（已去除首尾空白）
    pub fn non_empty_texts(&self) -> Vec<&str> {
        self.iter()
            .map(|(_, text)| text.trim())
            .filter(|text| !text.is_empty())
            .collect()
    }

    /// 对每个槽位应用同一个变换
    pub fn map(&self, mut f: impl FnMut(&str) -> String) -> Self {
        let mut out = Self::default();
        for (label, text) in self.iter() {
            out.set(label, f(text));
        }
        out
    }
}

/// 干扰项解析
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distractor {
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub option: String,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub reason: String,
}

/// 题目解析
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub domain: String,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub rationale: String,
    #[serde(default, deserialize_with = "deserialize_lenient_strings")]
    pub key_points: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub distractors: Vec<Distractor>,
}

/// 单道题目（由 LLM 解析或从文件加载）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    #[serde(default, alias = "type")]
    pub qtype: QuestionType,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub stem: String,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub stem_translation: String,
    #[serde(default, deserialize_with = "deserialize_lenient_strings")]
    pub steps: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_strings")]
    pub steps_translation: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub options: QuizOptions,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub options_translation: QuizOptions,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub answer: String,
    #[serde(default, deserialize_with = "deserialize_lenient_strings")]
    pub cloze_answers: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_strings")]
    pub cloze_answers_translation: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
}

impl QuizItem {
    /// 创建选择题
    pub fn mcq(stem: impl Into<String>, options: QuizOptions, answer: impl Into<String>) -> Self {
        Self {
            qtype: QuestionType::Mcq,
            stem: stem.into(),
            options,
            answer: answer.into(),
            ..Default::default()
        }
    }

    /// 创建填空题
    pub fn cloze(stem: impl Into<String>, cloze_answers: Vec<String>) -> Self {
        Self {
            qtype: QuestionType::Cloze,
            stem: stem.into(),
            cloze_answers,
            ..Default::default()
        }
    }

    /// 创建排序题
    pub fn order(
        stem: impl Into<String>,
        steps: Vec<String>,
        options: QuizOptions,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            qtype: QuestionType::Order,
            stem: stem.into(),
            steps,
            options,
            answer: answer.into(),
            ..Default::default()
        }
    }

    /// 规范化 LLM 输出
    ///
    /// - 答案去空白并转大写
    /// - 选项文本去首尾空白
    /// - 解析中去掉空的知识点和空的干扰项
    pub fn normalized(mut self) -> Self {
        self.answer = self.answer.trim().to_uppercase();
        self.options = self.options.map(|text| text.trim().to_string());
        self.options_translation = self.options_translation.map(|text| text.trim().to_string());

        if let Some(analysis) = self.analysis.as_mut() {
            analysis.domain = analysis.domain.trim().to_string();
            analysis.rationale = analysis.rationale.trim().to_string();
            analysis.key_points = analysis
                .key_points
                .iter()
                .map(|point| point.trim().to_string())
                .filter(|point| !point.is_empty())
                .collect();
            analysis.distractors = analysis
                .distractors
                .iter()
                .map(|dist| Distractor {
                    option: dist.option.trim().to_uppercase(),
                    reason: dist.reason.trim().to_string(),
                })
                .filter(|dist| !dist.option.is_empty() || !dist.reason.is_empty())
                .collect();
        }

        self
    }

    /// 检查题目是否完整
    pub fn is_valid(&self) -> bool {
        if self.stem.trim().is_empty() {
            return false;
        }

        match self.qtype {
            QuestionType::Mcq => self.options.has_any_text() && !self.answer.trim().is_empty(),
            QuestionType::Cloze => !self.cloze_answers.is_empty(),
            QuestionType::Order => !self.steps.is_empty() && !self.answer.trim().is_empty(),
        }
    }

    /// 翻译数组是否与原文等长（空翻译视为对齐）
    pub fn translations_aligned(&self) -> bool {
        let aligned = |primary: usize, translated: usize| translated == 0 || translated == primary;
        aligned(self.steps.len(), self.steps_translation.len())
            && aligned(self.cloze_answers.len(), self.cloze_answers_translation.len())
    }
}

/// 一份完整的题目文档（预解析的 JSON / TOML 文件）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizDocument {
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub title_main: String,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub title_sub: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub items: Vec<QuizItem>,
}

/// 按题型统计题目数量
pub fn count_by_type(items: &[QuizItem]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(item.qtype.as_str()).or_insert(0) += 1;
    }
    counts
}

// 将字符串、数字、布尔值或 null 统一读成字符串
fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;

    struct LenientVisitor;

    impl<'de> Visitor<'de> for LenientVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number, boolean or null")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(String::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(LenientVisitor)
}

/// 宽松字符串，数组元素使用
struct LenientString(String);

impl<'de> Deserialize<'de> for LenientString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserialize_lenient_string(deserializer).map(LenientString)
    }
}

// 字符串数组：null 视为空数组，元素按宽松字符串读取（null 元素保留为空串以维持下标对齐）
fn deserialize_lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Option<Vec<LenientString>> = Option::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .into_iter()
        .map(|LenientString(value)| value)
        .collect())
}

// null 视为默认值
fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
