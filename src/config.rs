use chrono_tz::Tz;

use crate::error::{AppResult, ConfigError};

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时处理的文档数量
    pub max_concurrent_documents: usize,
    /// 待处理文档目录（.md / .json / .toml）
    pub input_folder: String,
    /// 输出目录
    pub output_folder: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 运行日志文件
    pub output_log_file: String,
    /// 题号前缀
    pub question_prefix: String,
    /// 批次 ID 日期所用的 IANA 时区
    pub batch_timezone: String,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// LLM 调用失败时的最大尝试次数
    pub llm_max_retries: usize,
    /// 输出文件名中的模型代码（为空时根据模型名推断）
    pub model_code: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_documents: 4,
            input_folder: "data/input".to_string(),
            output_folder: "data/output".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            question_prefix: "L".to_string(),
            batch_timezone: "America/New_York".to_string(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_max_retries: 3,
            model_code: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_concurrent_documents: std::env::var("MAX_CONCURRENT_DOCUMENTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_documents),
            input_folder: std::env::var("INPUT_FOLDER").unwrap_or(default.input_folder),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            question_prefix: std::env::var("QUESTION_PREFIX").unwrap_or(default.question_prefix),
            batch_timezone: std::env::var("BATCH_TIMEZONE").ok().filter(|v| !v.trim().is_empty()).unwrap_or(default.batch_timezone),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_max_retries: std::env::var("LLM_MAX_RETRIES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_max_retries),
            model_code: std::env::var("MODEL_CODE").ok().filter(|v| !v.trim().is_empty()),
        }
    }

    /// 校验配置
    pub fn validate(&self) -> AppResult<()> {
        if self.max_concurrent_documents == 0 {
            return Err(ConfigError::InvalidValue {
                name: "MAX_CONCURRENT_DOCUMENTS".to_string(),
                reason: "必须大于 0".to_string(),
            }
            .into());
        }
        if self.llm_max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                name: "LLM_MAX_RETRIES".to_string(),
                reason: "必须大于 0".to_string(),
            }
            .into());
        }
        self.batch_tz()?;
        Ok(())
    }

    /// 解析批次时区
    pub fn batch_tz(&self) -> AppResult<Tz> {
        self.batch_timezone.trim().parse::<Tz>().map_err(|e| {
            ConfigError::InvalidValue {
                name: "BATCH_TIMEZONE".to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = Config {
            max_concurrent_documents: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_batch_timezone() {
        assert_eq!(Config::default().batch_tz().unwrap(), chrono_tz::America::New_York);

        let config = Config {
            batch_timezone: "Asia/Shanghai".to_string(),
            ..Default::default()
        };
        assert_eq!(config.batch_tz().unwrap(), chrono_tz::Asia::Shanghai);

        let config = Config {
            batch_timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
