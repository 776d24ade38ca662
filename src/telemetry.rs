//! 日志与追踪系统

use crate::config::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// 依赖库的默认日志级别，避免 SQL 语句和每个连接事件刷屏
const NOISY_TARGETS: [(&str, &str); 3] = [("sqlx", "warn"), ("hyper", "warn"), ("tower_http", "info")];

/// 构建默认过滤指令：应用使用配置级别，依赖库使用各自的级别
pub fn default_filter_directives(level: &str) -> String {
    let level = level.to_lowercase();
    let mut directives = vec![level.clone(), format!("wms_service={}", level)];
    directives.extend(
        NOISY_TARGETS
            .iter()
            .map(|(target, target_level)| format!("{}={}", target, target_level)),
    );
    directives.join(",")
}

/// 初始化日志与追踪系统
///
/// `RUST_LOG` 存在时完全接管过滤规则。
pub fn init_telemetry(config: &AppConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter_directives(&config.logging.level)));

    let log_layer = if config.logging.format.eq_ignore_ascii_case("pretty") {
        tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(false)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(log_layer)
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.logging.level,
        format = %config.logging.format,
        "Telemetry initialized"
    );
}
