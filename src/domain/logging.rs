use derive_more::Display;
use once_cell::sync::OnceCell;

/// Severity of a log line; `Debug` output only exists in debug builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display)]
pub enum LogLevel {
    #[display(fmt = "DEBUG")]
    Debug,
    #[display(fmt = " INFO")]
    Info,
    #[display(fmt = " WARN")]
    Warn,
    #[display(fmt = "ERROR")]
    Error,
}

/// Layer and type that produced a log line
#[derive(Debug, Clone, Display)]
pub enum LogComponent {
    #[display(fmt = "DOM:{}", _0)]
    Domain(&'static str),
    #[display(fmt = "APP:{}", _0)]
    Application(&'static str),
    #[display(fmt = "INF:{}", _0)]
    Infrastructure(&'static str),
    #[display(fmt = "PRE:{}", _0)]
    Presentation(&'static str),
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: u64,
    pub level: LogLevel,
    pub component: LogComponent,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, component: LogComponent, message: &str) -> Self {
        Self { timestamp: get_time_provider().current_timestamp(), level, component, message: message.to_string() }
    }

    /// `[time] LEVEL LAYER:Type | message`
    pub fn format_line(&self, clock: &dyn TimeProvider) -> String {
        format!("[{}] {} {} | {}", clock.format_timestamp(self.timestamp), self.level, self.component, self.message)
    }
}

pub trait TimeProvider: Send + Sync {
    fn current_timestamp(&self) -> u64;
    fn format_timestamp(&self, timestamp: u64) -> String;
}

/// Sink for log entries. Only `log` is required.
pub trait Logger: Send + Sync {
    fn log(&self, entry: LogEntry);

    fn debug(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Debug, component, message));
    }

    fn info(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Info, component, message));
    }

    fn warn(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Warn, component, message));
    }

    fn error(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Error, component, message));
    }
}

static LOGGER: OnceCell<Box<dyn Logger + Send + Sync>> = OnceCell::new();
static CLOCK: OnceCell<Box<dyn TimeProvider + Send + Sync>> = OnceCell::new();

/// Install the process-wide logger. Only the first call takes effect.
pub fn init_logger(logger: Box<dyn Logger + Send + Sync>) {
    let _ = LOGGER.set(logger);
}

/// Install the process-wide clock. Only the first call takes effect.
pub fn init_time_provider(clock: Box<dyn TimeProvider + Send + Sync>) {
    let _ = CLOCK.set(clock);
}

/// Installed logger, or a sink that drops everything
pub fn get_logger() -> &'static dyn Logger {
    LOGGER.get().map(|logger| logger.as_ref()).unwrap_or(&Silent)
}

pub fn get_time_provider() -> &'static dyn TimeProvider {
    CLOCK.get().map(|clock| clock.as_ref()).unwrap_or(&SequenceClock)
}

struct Silent;

impl Logger for Silent {
    fn log(&self, _entry: LogEntry) {}
}

/// Counts calls until a wall clock is installed
struct SequenceClock;

impl TimeProvider for SequenceClock {
    fn current_timestamp(&self) -> u64 {
        use std::sync::atomic::{AtomicU64, Ordering};
        static NEXT: AtomicU64 = AtomicU64::new(0);
        NEXT.fetch_add(1, Ordering::Relaxed)
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        format!("#{timestamp:06}")
    }
}

#[macro_export]
macro_rules! log_debug {
    ($component:expr, $($arg:tt)*) => {
        #[cfg(debug_assertions)]
        {
            $crate::domain::logging::get_logger().debug($component, &format!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($component:expr, $($arg:tt)*) => {
        $crate::domain::logging::get_logger().info($component, &format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_warn {
    ($component:expr, $($arg:tt)*) => {
        $crate::domain::logging::get_logger().warn($component, &format!($($arg)*));
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClock;
    impl TimeProvider for FixedClock {
        fn current_timestamp(&self) -> u64 {
            0
        }
        fn format_timestamp(&self, timestamp: u64) -> String {
            format!("t{}", timestamp)
        }
    }

    #[test]
    fn format_line_includes_level_and_component() {
        let mut entry = LogEntry::new(LogLevel::Warn, LogComponent::Domain("Aligner"), "dropped record");
        entry.timestamp = 7;
        assert_eq!(entry.format_line(&FixedClock), "[t7]  WARN DOM:Aligner | dropped record");
    }

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn fallback_clock_advances() {
        let clock = SequenceClock;
        assert!(clock.current_timestamp() < clock.current_timestamp());
    }
}
