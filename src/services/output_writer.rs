//! 输出写入服务 - 业务能力层
//!
//! 只负责"给结果取名并写入文件"，不关心格式化
//!
//! 输出文件名：`{批次ID}-{短文件名?}-{模型代码}.{扩展名}`

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::Utc;
use chrono_tz::Tz;
use tracing::debug;

use crate::error::{AppError, AppResult, OutputError};

/// 每日最多批次数（A-Z）
pub const MAX_RUNS_PER_DAY: usize = 26;

/// 批次日期的默认时区
pub const DEFAULT_BATCH_TIMEZONE: Tz = chrono_tz::America::New_York;

/// 短文件名最大长度
pub const SHORT_FILENAME_MAX: usize = 15;

/// 批次 ID 生成器
///
/// 格式：`YYMMDD` + 当日批次字母 + 3 位题目数量，例如 `251007A015`。
/// 批次字母取输出目录中当日尚未使用的第一个字母。
/// 日期按配置的时区计算，默认 `America/New_York`。
#[derive(Debug, Clone)]
pub struct BatchIdGenerator {
    output_dir: PathBuf,
    max_runs_per_day: usize,
    timezone: Tz,
}

/// 解析后的批次 ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchIdParts {
    pub date: String,
    pub run_letter: char,
    pub count: String,
}

impl BatchIdGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            max_runs_per_day: MAX_RUNS_PER_DAY,
            timezone: DEFAULT_BATCH_TIMEZONE,
        }
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_max_runs(mut self, max_runs_per_day: usize) -> Self {
        self.max_runs_per_day = max_runs_per_day.min(MAX_RUNS_PER_DAY);
        self
    }

    /// 使用配置时区的当前日期生成批次 ID
    pub fn generate(&self, item_count: usize) -> AppResult<String> {
        self.generate_for_date(&self.today(), item_count)
    }

    /// 配置时区的当前日期（`YYMMDD`）
    pub fn today(&self) -> String {
        Utc::now()
            .with_timezone(&self.timezone)
            .format("%y%m%d")
            .to_string()
    }

    /// 为指定日期（`YYMMDD`）生成批次 ID
    pub fn generate_for_date(&self, yymmdd: &str, item_count: usize) -> AppResult<String> {
        let run_letter = self.next_run_letter(yymmdd)?;
        Ok(format!("{yymmdd}{run_letter}{item_count:03}"))
    }

    fn next_run_letter(&self, yymmdd: &str) -> AppResult<char> {
        let used = self.scan_used_letters(yymmdd);

        ('A'..='Z')
            .take(self.max_runs_per_day)
            .find(|letter| !used.contains(letter))
            .ok_or_else(|| {
                OutputError::BatchLettersExhausted {
                    date: yymmdd.to_string(),
                    max_runs: self.max_runs_per_day,
                }
                .into()
            })
    }

    // 只统计文件名以合法批次 ID 开头且日期为当日的文件
    fn scan_used_letters(&self, yymmdd: &str) -> HashSet<char> {
        let Ok(entries) = std::fs::read_dir(&self.output_dir) else {
            return HashSet::new();
        };

        entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                let parts = Self::parse_batch_id(name.get(..10)?).ok()?;
                (parts.date == yymmdd).then_some(parts.run_letter)
            })
            .collect()
    }

    /// 解析批次 ID
    pub fn parse_batch_id(batch_id: &str) -> AppResult<BatchIdParts> {
        let invalid = || -> AppError {
            OutputError::InvalidBatchId {
                batch_id: batch_id.to_string(),
            }
            .into()
        };

        if batch_id.len() != 10 || !batch_id.is_ascii() {
            return Err(invalid());
        }

        let date = &batch_id[..6];
        let run_letter = batch_id[6..7].chars().next().ok_or_else(invalid)?;
        let count = &batch_id[7..];

        let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if !digits(date) || !digits(count) || !run_letter.is_ascii_uppercase() {
            return Err(invalid());
        }

        Ok(BatchIdParts {
            date: date.to_string(),
            run_letter,
            count: count.to_string(),
        })
    }
}

/// 提取简短文件名
///
/// 原始文件名（不含扩展名）超过 15 个字符时返回空串；
/// 只保留字母、数字、`-`、`_`，`_` 转为 `-`，去掉首尾的 `-`
pub fn extract_short_filename(path: &Path) -> String {
    let Some(name) = path.file_stem().map(|stem| stem.to_string_lossy()) else {
        return String::new();
    };

    if name.chars().count() > SHORT_FILENAME_MAX {
        return String::new();
    }

    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .map(|c| if c == '_' { '-' } else { c })
        .collect::<String>()
        .trim_matches('-')
        .to_string()
}

/// 生成输出文件名
pub fn generate_output_filename(
    batch_id: &str,
    model_code: &str,
    input_path: Option<&Path>,
    ext: &str,
) -> String {
    let short_name = input_path.map(extract_short_filename).unwrap_or_default();
    let ext = ext.trim_start_matches('.');

    if short_name.is_empty() {
        format!("{batch_id}-{model_code}.{ext}")
    } else {
        format!("{batch_id}-{short_name}-{model_code}.{ext}")
    }
}

/// 防覆盖：路径已存在时依次尝试 `name_2.ext`、`name_3.ext`…
pub fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (2..)
        .map(|n| path.with_file_name(format!("{stem}_{n}{ext}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// 写入输出文件（自动创建父目录）
pub async fn write_output(path: &Path, content: &str) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::file_write_failed(parent.display().to_string(), e))?;
    }

    tokio::fs::write(path, content)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

    debug!("写入输出: {} ({} 字节)", path.display(), content.len());
    Ok(())
}
