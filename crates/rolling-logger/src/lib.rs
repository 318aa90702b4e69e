//! Rolling Logger
//!
//! Installs a global `tracing` subscriber that writes to
//! `<log_dir>/<app_name>.log`, rotating the file once it exceeds a size
//! limit, and keeps the most recent lines in memory for in-app display.
//! Records emitted through the `log` facade are forwarded as well.

mod file;

use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};

use chrono::Local;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;

use file::{RingBuffer, RollingFile};

/// Rotate the log file after this many bytes
pub const DEFAULT_MAX_FILE_BYTES: u64 = 1024 * 1024;

/// Lines retained for `recent_lines`
pub const DEFAULT_BUFFER_LINES: usize = 500;

static SINK: OnceLock<LogSink> = OnceLock::new();

/// Logger tuning knobs
#[derive(Debug, Clone)]
pub struct LoggerOptions {
    pub max_file_bytes: u64,
    pub buffer_lines: usize,
    pub level: tracing::Level,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            buffer_lines: DEFAULT_BUFFER_LINES,
            level: tracing::Level::DEBUG,
        }
    }
}

struct SinkState {
    file: RollingFile,
    ring: RingBuffer,
}

/// Shared writer handed to the fmt layer; every event is one `write` call.
#[derive(Clone)]
struct LogSink {
    state: Arc<Mutex<SinkState>>,
}

impl LogSink {
    fn recent(&self) -> Vec<String> {
        match self.state.lock() {
            Ok(state) => state.ring.snapshot(),
            Err(poisoned) => poisoned.into_inner().ring.snapshot(),
        }
    }
}

impl io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log sink poisoned"))?;
        state.ring.push_chunk(buf);
        state.file.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log sink poisoned"))?;
        state.file.flush()
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Initialize the global logger with default options
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), String> {
    init_logger_with(log_dir, app_name, LoggerOptions::default())
}

/// Initialize the global logger
///
/// Only the first successful call installs a subscriber; later calls fail
/// and leave the existing one untouched.
pub fn init_logger_with(
    log_dir: impl AsRef<Path>,
    app_name: &str,
    options: LoggerOptions,
) -> Result<(), String> {
    if SINK.get().is_some() {
        return Err("Logger already initialized".to_string());
    }

    let file = RollingFile::open(log_dir.as_ref(), app_name, options.max_file_bytes)
        .map_err(|e| format!("Failed to open log file: {}", e))?;
    let sink = LogSink {
        state: Arc::new(Mutex::new(SinkState {
            file,
            ring: RingBuffer::new(options.buffer_lines),
        })),
    };
    SINK.set(sink.clone())
        .map_err(|_| "Logger already initialized".to_string())?;

    let builder = tracing_subscriber::fmt()
        .with_writer(sink)
        .with_timer(LocalTimer)
        .with_ansi(false)
        .with_target(true)
        .with_max_level(options.level);

    // `log` goes to logcat on Android; tracing events still reach the file.
    #[cfg(target_os = "android")]
    {
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(log::LevelFilter::Debug)
                .with_tag(app_name.to_string()),
        );
        tracing::subscriber::set_global_default(builder.finish())
            .map_err(|e| format!("Failed to install subscriber: {}", e))
    }

    #[cfg(not(target_os = "android"))]
    {
        builder
            .try_init()
            .map_err(|e| format!("Failed to install subscriber: {}", e))
    }
}

/// Log an info line through the installed logger
pub fn info(msg: &str) -> Result<(), String> {
    if SINK.get().is_none() {
        return Err("Logger not initialized".to_string());
    }
    tracing::info!("{}", msg);
    Ok(())
}

/// Log an error line through the installed logger
pub fn error(msg: &str) -> Result<(), String> {
    if SINK.get().is_none() {
        return Err("Logger not initialized".to_string());
    }
    tracing::error!("{}", msg);
    Ok(())
}

/// Most recent formatted log lines, oldest first
pub fn recent_lines() -> Vec<String> {
    SINK.get().map(LogSink::recent).unwrap_or_default()
}
