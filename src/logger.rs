//! 日志初始化
//!
//! 默认级别为 `info`，可通过 `RUST_LOG` 覆盖

use tracing_subscriber::EnvFilter;

/// 初始化全局日志订阅器（重复调用无副作用）
pub fn init() {
    init_with_verbose(false);
}

/// 初始化日志，`verbose` 为真时默认级别为 `debug`
pub fn init_with_verbose(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
