//! 填空渲染

use regex::Regex;

use super::rules::{CURLY_RE, RESTORED_BLANK, UNDERSCORE_RE};

/// 按顺序把填空标记替换为 `{{答案}}`
///
/// 优先替换 `{{...}}`，不存在时再替换 3 个及以上的下划线。
/// 标记多于答案时多出的标记填空值，答案多于标记时多出的答案被忽略；
/// 没有答案时原样返回。
pub fn fill_cloze(stem: &str, fills: &[String]) -> String {
    if fills.is_empty() {
        return stem.to_string();
    }

    if CURLY_RE.is_match(stem) {
        return replace_in_order(&CURLY_RE, stem, fills);
    }
    if UNDERSCORE_RE.is_match(stem) {
        return replace_in_order(&UNDERSCORE_RE, stem, fills);
    }

    stem.to_string()
}

/// 误判 CLOZE 的兜底：把所有 `{{...}}` 还原为 `_______`
pub fn restore_underscores(stem: &str) -> String {
    CURLY_RE.replace_all(stem, RESTORED_BLANK).into_owned()
}

/// 题干中的填空标记数量
pub fn count_markers(stem: &str) -> usize {
    match CURLY_RE.find_iter(stem).count() {
        0 => UNDERSCORE_RE.find_iter(stem).count(),
        n => n,
    }
}

fn replace_in_order(re: &Regex, stem: &str, fills: &[String]) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut last = 0;

    for (i, marker) in re.find_iter(stem).enumerate() {
        out.push_str(&stem[last..marker.start()]);
        let value = fills.get(i).map(String::as_str).unwrap_or("");
        out.push_str("{{");
        out.push_str(value);
        out.push_str("}}");
        last = marker.end();
    }
    out.push_str(&stem[last..]);

    out
}
