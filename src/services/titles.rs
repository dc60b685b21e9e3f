//! 标题与题号起点推断
//!
//! 优先读取 Markdown 的一级标题，缺失时退回文件名

use std::path::Path;

/// 从 Markdown 第一个一级标题推断 `(主标题, 副标题)`
///
/// `# Concept Clip: Anxiety` -> `("Concept Clip", "Anxiety")`；
/// 标题中没有冒号时，副标题取下一行非标题文本。找不到时返回两个空串。
pub fn infer_titles_from_markdown(markdown: &str) -> (String, String) {
    let lines: Vec<&str> = markdown.lines().map(str::trim).collect();

    for (idx, line) in lines.iter().enumerate() {
        let Some(content) = line.strip_prefix("# ") else {
            continue;
        };
        let content = content.trim().replace('：', ":");
        if content.is_empty() {
            continue;
        }

        let (main, mut sub) = match content.split_once(':') {
            Some((left, right)) => {
                let left = left.trim();
                let main = if left.is_empty() {
                    content.trim_end_matches(':').trim().to_string()
                } else {
                    left.to_string()
                };
                (main, right.trim().to_string())
            }
            None => (content.trim_end_matches(':').trim().to_string(), String::new()),
        };

        if sub.is_empty() {
            sub = lines[idx + 1..]
                .iter()
                .filter(|follow| !follow.is_empty())
                .take_while(|follow| !follow.starts_with('#'))
                .next()
                .map(|follow| follow.to_string())
                .unwrap_or_default();
        }

        if !main.is_empty() {
            return (main, sub);
        }
    }

    (String::new(), String::new())
}

/// 从文件名推断 `(主标题, 副标题)`
///
/// `Chapter 3 Quiz- Mental Disorders.md` -> `("Chapter 3 Quiz", "Mental Disorders")`，
/// 不含 `Quiz` 时整个文件名作为主标题
pub fn infer_titles_from_filename(path: &Path) -> (String, String) {
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();

    if let Some((left, right)) = name.split_once("Quiz") {
        let main = format!("{left}Quiz").trim().to_string();
        let sub = match right.split_once('-') {
            Some((_, sub)) => sub.trim().to_string(),
            None => right
                .trim()
                .trim_start_matches([':', '：', '-'])
                .trim()
                .to_string(),
        };
        return (main, sub);
    }

    (name.trim().to_string(), String::new())
}

/// 合并两种来源：Markdown 标题优先，缺失部分用文件名补齐
pub fn resolve_titles(markdown: Option<&str>, path: &Path) -> (String, String) {
    let (main, sub) = markdown.map(infer_titles_from_markdown).unwrap_or_default();
    if main.is_empty() {
        return infer_titles_from_filename(path);
    }
    if sub.is_empty() {
        let (_, fallback_sub) = infer_titles_from_filename(path);
        return (main, fallback_sub);
    }
    (main, sub)
}

/// 从文件名开头的数字推断题号起点：`205.md` -> `Some(205)`
pub fn infer_question_seed(path: &Path) -> Option<u32> {
    let stem = path.file_stem()?.to_string_lossy();
    let digits: String = stem
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
