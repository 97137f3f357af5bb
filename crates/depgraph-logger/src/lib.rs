use crossterm::{ExecutableCommand, cursor, terminal};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    Normal,
    /// Everything, including resolver internals.
    Debug,
}

impl Verbosity {
    #[must_use]
    pub const fn from_flags(quiet: bool, debug: bool) -> Self {
        match (quiet, debug) {
            (true, _) => Self::Quiet,
            (false, true) => Self::Debug,
            (false, false) => Self::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
    Debug,
}

impl LogLevel {
    /// Least verbose setting at which this level is still printed.
    const fn threshold(self) -> Verbosity {
        match self {
            Self::Error => Verbosity::Quiet,
            Self::Info | Self::Success | Self::Warning => Verbosity::Normal,
            Self::Debug => Verbosity::Debug,
        }
    }

    fn render(self, message: &str) -> String {
        match self {
            Self::Info => format!("{} {}", "depgraph".bright_cyan().bold(), message.white()),
            Self::Success => format!("{} {}", "✓".bright_green().bold(), message.bright_green()),
            Self::Warning => format!("{} {}", "⚠".bright_yellow().bold(), message.bright_yellow()),
            Self::Error => format!("{} {}", "✗".bright_red().bold(), message.bright_red()),
            Self::Debug => format!("{} {}", "•".bright_black().bold(), message.bright_black()),
        }
    }
}

/// Terminal logger with a single rewritable status line. Everything goes to
/// stderr so reports printed on stdout can be piped into other tools.
pub struct Logger {
    started: Instant,
    verbosity: Verbosity,
    status_line: Mutex<bool>,
}

impl Logger {
    #[must_use]
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            started: Instant::now(),
            verbosity,
            status_line: Mutex::new(false),
        }
    }

    #[must_use]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.verbosity >= level.threshold()
    }

    fn clear_status(&self) {
        let Ok(mut active) = self.status_line.lock() else {
            return;
        };
        if *active {
            let mut stderr = io::stderr();
            let _ = stderr.execute(cursor::MoveToColumn(0));
            let _ = stderr.execute(terminal::Clear(terminal::ClearType::CurrentLine));
            let _ = stderr.flush();
            *active = false;
        }
    }

    /// Replaces the transient status line.
    pub fn status(&self, message: &str) {
        if self.verbosity == Verbosity::Quiet {
            return;
        }

        self.clear_status();
        eprint!("{} {}", "◦".bright_cyan(), message.bright_white());
        let _ = io::stderr().flush();
        if let Ok(mut active) = self.status_line.lock() {
            *active = true;
        }
    }

    /// Status line with a spinner and a running counter.
    pub fn progress(&self, message: &str, count: usize) {
        const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

        if self.verbosity == Verbosity::Quiet {
            return;
        }

        let frame = SPINNER.get(count % SPINNER.len()).unwrap_or(&"◐");
        self.clear_status();
        eprint!(
            "{} {} ({})",
            frame.bright_cyan(),
            message.bright_white(),
            count.to_string().bright_cyan().bold()
        );
        let _ = io::stderr().flush();
        if let Ok(mut active) = self.status_line.lock() {
            *active = true;
        }
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        if !self.enabled(level) {
            return;
        }

        self.clear_status();
        eprintln!("{}", level.render(message));
    }

    /// Final success line stamped with the time since the logger was created.
    pub fn finish(&self, message: &str) {
        if !self.enabled(LogLevel::Success) {
            return;
        }

        self.clear_status();
        eprintln!(
            "{} {} {}",
            "✓".bright_green().bold(),
            message.bright_green(),
            format!("[{}]", format_elapsed(self.started.elapsed())).bright_black()
        );
    }
}

#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    if elapsed.as_millis() < 1000 {
        format!("{}ms", elapsed.as_millis())
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Installs the process-wide logger. Only the first call has an effect.
pub fn init_logger(quiet: bool, debug: bool) {
    let _ = LOGGER.set(Logger::new(Verbosity::from_flags(quiet, debug)));
}

// Library callers that never initialize the logger only see errors.
fn get_logger() -> &'static Logger {
    LOGGER.get_or_init(|| Logger::new(Verbosity::Quiet))
}

pub fn status(message: &str) {
    get_logger().status(message);
}

pub fn progress(message: &str, count: usize) {
    get_logger().progress(message, count);
}

pub fn info(message: &str) {
    get_logger().log(LogLevel::Info, message);
}

pub fn success(message: &str) {
    get_logger().log(LogLevel::Success, message);
}

pub fn warn(message: &str) {
    get_logger().log(LogLevel::Warning, message);
}

pub fn error(message: &str) {
    get_logger().log(LogLevel::Error, message);
}

pub fn debug(message: &str) {
    get_logger().log(LogLevel::Debug, message);
}

pub fn finish(message: &str) {
    get_logger().finish(message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn test_level_filtering() {
        let quiet = Logger::new(Verbosity::Quiet);
        assert!(quiet.enabled(LogLevel::Error));
        assert!(!quiet.enabled(LogLevel::Warning));

        let normal = Logger::new(Verbosity::Normal);
        assert!(normal.enabled(LogLevel::Warning));
        assert!(!normal.enabled(LogLevel::Debug));

        assert!(Logger::new(Verbosity::Debug).enabled(LogLevel::Debug));
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(42)), "42ms");
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "1.50s");
    }
}
