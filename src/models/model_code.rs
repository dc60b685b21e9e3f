//! 模型代码映射（4 位简写）
//!
//! 用于输出文件命名：OpenAI 模型以 `o` 开头，Claude 模型以 `c` 开头

use phf::phf_map;

use crate::error::{AppResult, ConfigError};

/// 完整模型名 -> 4 位代码（含别名）
static MODEL_TO_CODE: phf::Map<&'static str, &'static str> = phf_map! {
    "gpt-5-mini" => "o50m",
    "gpt-5" => "o50o",
    "gpt-4o" => "o4oo",
    "gpt-4o-mini" => "o4om",
    "o3" => "oo3o",
    "o4-mini" => "oo4m",
    "claude-opus-4-1" => "co41",
    "claude-opus-4-0" => "co40",
    "claude-opus-4" => "co40",
    "claude-sonnet-4-5" => "cs45",
    "claude-3-7-sonnet-latest" => "cs37",
    "claude-3-5-haiku-latest" => "ch35",
    "claude-haiku-4" => "ch35",
};

/// 4 位代码 -> 完整模型名
static CODE_TO_MODEL: phf::Map<&'static str, &'static str> = phf_map! {
    "o50m" => "gpt-5-mini",
    "o50o" => "gpt-5",
    "o4oo" => "gpt-4o",
    "o4om" => "gpt-4o-mini",
    "oo3o" => "o3",
    "oo4m" => "o4-mini",
    "co41" => "claude-opus-4-1",
    "co40" => "claude-opus-4-0",
    "cs45" => "claude-sonnet-4-5",
    "cs37" => "claude-3-7-sonnet-latest",
    "ch35" => "claude-3-5-haiku-latest",
};

/// 从完整模型名获取 4 位代码
pub fn code_from_model(model: &str) -> Option<&'static str> {
    MODEL_TO_CODE.get(model.trim().to_lowercase().as_str()).copied()
}

/// 从 4 位代码获取完整模型名
pub fn model_from_code(code: &str) -> Option<&'static str> {
    CODE_TO_MODEL.get(code.trim().to_lowercase().as_str()).copied()
}

/// 统一解析用户输入（完整模型名或 4 位代码）
///
/// # 返回
/// 返回 `(模型名, 代码)`
pub fn resolve_model_input(input: &str) -> AppResult<(String, String)> {
    let input = input.trim().to_lowercase();

    if let Some(model) = model_from_code(&input) {
        return Ok((model.to_string(), input));
    }

    if let Some(code) = code_from_model(&input) {
        return Ok((input, code.to_string()));
    }

    let mut supported: Vec<&str> = MODEL_TO_CODE.keys().copied().collect();
    supported.sort_unstable();
    Err(ConfigError::UnknownModel {
        model: input,
        supported: supported.join(", "),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_by_code_and_name() {
        assert_eq!(
            resolve_model_input("o4oo").unwrap(),
            ("gpt-4o".to_string(), "o4oo".to_string())
        );
        assert_eq!(
            resolve_model_input("Claude-Sonnet-4-5").unwrap(),
            ("claude-sonnet-4-5".to_string(), "cs45".to_string())
        );
    }

    #[test]
    fn test_alias_maps_to_shared_code() {
        assert_eq!(code_from_model("claude-haiku-4"), Some("ch35"));
        assert_eq!(model_from_code("ch35"), Some("claude-3-5-haiku-latest"));
    }

    #[test]
    fn test_unknown_model_is_config_error() {
        assert!(resolve_model_input("llama-70b").is_err());
    }
}
