//! 日志模块：基于 env_logger 0.11（控制台彩色输出 + 文件镜像 + 按大小轮转）
use env_logger::fmt::Formatter;
use env_logger::{Builder, Target, WriteStyle};
use log::{Level, LevelFilter, Record};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::Once;

// ==================== 配置常量 ====================
const LOG_DIR: &str = "LOG_DIR";
const DEFAULT_LOG_DIR: &str = "logs";
const LOG_LEVEL: &str = "LOG_LEVEL";
const DEFAULT_LOG_LEVEL: &str = "INFO";
const LOG_FILE_NAME: &str = "safe-deployer.log";
const LOG_MAX_SIZE_MB: u64 = 10;
const LOG_MAX_ROTATIONS: usize = 5;

static INIT_LOGGER: Once = Once::new();
// 全局文件写入器，格式化闭包与轮转共用
static FILE_WRITER: Mutex<Option<File>> = Mutex::new(None);

/// 日志级别映射，未知值返回 None
pub fn parse_level(raw: &str) -> Option<LevelFilter> {
    match raw.trim().to_uppercase().as_str() {
        "TRACE" => Some(LevelFilter::Trace),
        "DEBUG" => Some(LevelFilter::Debug),
        "INFO" => Some(LevelFilter::Info),
        "WARN" | "WARNING" => Some(LevelFilter::Warn),
        "ERROR" => Some(LevelFilter::Error),
        "OFF" => Some(LevelFilter::Off),
        _ => None,
    }
}

// ==================== 初始化日志系统 ====================
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        let log_dir = std::env::var(LOG_DIR).unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());
        let log_level =
            std::env::var(LOG_LEVEL).unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

        let level_filter = parse_level(&log_level).unwrap_or_else(|| {
            eprintln!("⚠️ 无效日志级别「{}」，使用默认 INFO", log_level);
            LevelFilter::Info
        });

        let file_enabled = open_log_file(&log_dir);
        let log_file_path = Path::new(&log_dir).join(LOG_FILE_NAME);

        let mut console_builder = Builder::from_default_env();
        console_builder
            .filter(None, level_filter)
            .filter(Some("ethers_providers"), LevelFilter::Warn)
            .filter(Some("ethers_signers"), LevelFilter::Warn)
            .write_style(WriteStyle::Always)
            .format(move |f: &mut Formatter, record: &Record| {
                let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S.%3f");
                let module = record.module_path().unwrap_or("unknown");

                let console_log = writeln!(
                    f,
                    "[{}] [{}{:>5}\x1b[0m] [\x1b[31m{}\x1b[0m] - {}",
                    now,
                    level_color(record.level()),
                    record.level(),
                    module,
                    record.args()
                );

                if file_enabled {
                    let file_log = format!(
                        "[{}] [线程: {}] [模块: {}] [级别: {}] - {}\n",
                        now,
                        std::thread::current().name().unwrap_or("unknown"),
                        module,
                        record.level(),
                        record.args()
                    );
                    // 文件写入失败不影响控制台输出
                    if let Ok(mut guard) = FILE_WRITER.lock() {
                        if let Some(file) = guard.as_mut() {
                            let _ = file.write_all(file_log.as_bytes());
                        }
                    }
                }

                console_log
            })
            .target(Target::Stdout);

        if let Err(e) = console_builder.try_init() {
            eprintln!("❌ 控制台日志初始化失败: {}", e);
        } else {
            log::info!(
                "✅ 日志系统初始化完成 | 级别: {} | 日志文件: {}",
                level_filter,
                log_file_path.display()
            );
        }
    });
}

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1b[91m",
        Level::Warn => "\x1b[93m",
        Level::Info => "\x1b[92m",
        Level::Debug => "\x1b[96m",
        Level::Trace => "\x1b[95m",
    }
}

/// 创建日志目录、执行轮转并打开日志文件，返回文件镜像是否可用
fn open_log_file(log_dir: &str) -> bool {
    if let Err(e) = fs::create_dir_all(log_dir) {
        eprintln!("❌ 创建日志目录失败: {}", e);
        return false;
    }

    if let Err(e) = rotate_logs(log_dir, LOG_FILE_NAME) {
        eprintln!("⚠️ 日志轮转失败: {}", e);
    }

    let path = Path::new(log_dir).join(LOG_FILE_NAME);
    match File::options().create(true).append(true).open(&path) {
        Ok(f) => match FILE_WRITER.lock() {
            Ok(mut guard) => {
                *guard = Some(f);
                true
            }
            Err(_) => false,
        },
        Err(e) => {
            eprintln!("❌ 创建日志文件失败: {}", e);
            false
        }
    }
}

fn rotated_path(log_dir: &str, log_file: &str, index: usize) -> PathBuf {
    Path::new(log_dir).join(format!("{}.{}", log_file, index))
}

// ==================== 日志轮转 ====================
fn rotate_logs(log_dir: &str, log_file: &str) -> io::Result<()> {
    let log_path = Path::new(log_dir).join(log_file);

    if !log_path.exists() {
        return Ok(());
    }

    let file_size_mb = fs::metadata(&log_path)?.len() / (1024 * 1024);
    if file_size_mb < LOG_MAX_SIZE_MB {
        return Ok(());
    }

    for i in (1..LOG_MAX_ROTATIONS).rev() {
        let src = rotated_path(log_dir, log_file, i);
        if src.exists() {
            fs::rename(&src, rotated_path(log_dir, log_file, i + 1))?;
        }
    }

    fs::rename(&log_path, rotated_path(log_dir, log_file, 1))?;
    File::create(&log_path)?;
    Ok(())
}

// ==================== 便捷日志宏 ====================
#[macro_export]
macro_rules! log_trace { ($($arg:tt)*) => { log::trace!($($arg)*) }; }
#[macro_export]
macro_rules! log_debug { ($($arg:tt)*) => { log::debug!($($arg)*) }; }
#[macro_export]
macro_rules! log_info  { ($($arg:tt)*) => { log::info!($($arg)*) }; }
#[macro_export]
macro_rules! log_warn  { ($($arg:tt)*) => { log::warn!($($arg)*) }; }
#[macro_export]
macro_rules! log_error { ($($arg:tt)*) => { log::error!($($arg)*) }; }
