use std::collections::BTreeMap;
use std::error::Error;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Local;

use crate::error::{LogError, LogResult};
use crate::level::Level;

/// Target name meaning stdout/stderr instead of a file.
pub const STD_TARGET: &str = "std";

/// Timestamp layout, e.g. `Sun, 18.10.26 14:03:59`.
const TIME_FORMAT: &str = "%a, %d.%m.%y %H:%M:%S";

enum Sink {
    Console,
    File(BufWriter<File>),
}

/// One destination with its own level.
///
/// File targets own their handle; dropping the target flushes and closes it.
pub struct LogTarget {
    name: String,
    level: Level,
    sink: Sink,
}

impl LogTarget {
    /// Open a target. [`STD_TARGET`] is the console; any other name is a file
    /// path opened for appending, with parent directories created.
    pub fn open(name: impl Into<String>, level: Level) -> LogResult<Self> {
        let name = name.into();
        let sink = if name == STD_TARGET {
            Sink::Console
        } else {
            Sink::File(BufWriter::new(open_append(Path::new(&name))?))
        };
        Ok(Self { name, level, sink })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn is_console(&self) -> bool {
        matches!(self.sink, Sink::Console)
    }

    fn accepts(&self, level: Level) -> bool {
        level <= self.level
    }
}

impl std::fmt::Debug for LogTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogTarget")
            .field("name", &self.name)
            .field("level", &self.level)
            .finish()
    }
}

/// Leveled logger writing each message to every target whose level admits it.
///
/// Lines look like `[WARN]<Sun, 18.10.26 14:03:59> disk almost full`.
/// Targets sit behind a mutex so a shared `Logger` can be fed from a
/// [`LogLayer`](crate::LogLayer).
pub struct Logger {
    targets: Mutex<BTreeMap<String, LogTarget>>,
    stderr_threshold: Option<Level>,
}

impl Logger {
    /// A logger writing to every name in `targets` at `level`.
    ///
    /// Console output goes to stdout only; see
    /// [`with_stderr_threshold`](Self::with_stderr_threshold).
    pub fn new<I, S>(targets: I, level: Level) -> LogResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut map = BTreeMap::new();
        for name in targets {
            let target = LogTarget::open(name, level)?;
            map.insert(target.name.clone(), target);
        }
        Ok(Self {
            targets: Mutex::new(map),
            stderr_threshold: None,
        })
    }

    /// On the console target, send messages at `threshold` severity or worse
    /// to stderr and the rest to stdout. `None` sends everything to stdout.
    pub fn with_stderr_threshold(mut self, threshold: Option<Level>) -> Self {
        self.stderr_threshold = threshold;
        self
    }

    pub fn stderr_threshold(&self) -> Option<Level> {
        self.stderr_threshold
    }

    /// Add a target, replacing any target with the same name.
    pub fn add_target(&self, name: impl Into<String>, level: Level) -> LogResult<()> {
        let target = LogTarget::open(name, level)?;
        self.lock().insert(target.name.clone(), target);
        Ok(())
    }

    /// Remove a target, closing its file. Returns whether it existed.
    pub fn remove_target(&self, name: &str) -> bool {
        self.lock().remove(name).is_some()
    }

    /// Change one target's level. Returns whether the target exists.
    pub fn set_level(&self, name: &str, level: Level) -> bool {
        match self.lock().get_mut(name) {
            Some(target) => {
                target.level = level;
                true
            }
            None => false,
        }
    }

    /// Change the level of every target currently at `current`.
    pub fn set_level_where(&self, current: Level, level: Level) {
        for target in self.lock().values_mut() {
            if target.level == current {
                target.level = level;
            }
        }
    }

    /// Change the level of every target.
    pub fn set_level_all(&self, level: Level) {
        for target in self.lock().values_mut() {
            target.level = level;
        }
    }

    pub fn level_of(&self, name: &str) -> Option<Level> {
        self.lock().get(name).map(LogTarget::level)
    }

    /// Names of all targets, sorted.
    pub fn target_names(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    /// Log a message at `level`.
    pub fn log(&self, message: &str, level: Level) {
        self.emit(level, message);
    }

    /// Log an error and its chain of causes at `level`.
    pub fn log_error(&self, err: &dyn Error, level: Level) {
        self.emit(level, &error_report(err, false));
    }

    /// Log an error at `Error` level and terminate the process with status 1.
    pub fn fatal(&self, err: &dyn Error) -> ! {
        self.emit(Level::Error, &error_report(err, true));
        std::process::exit(1)
    }

    fn emit(&self, level: Level, body: &str) {
        let line = format_line(level, &Local::now().format(TIME_FORMAT).to_string(), body);
        let mut targets = self.lock();
        for target in targets.values_mut() {
            if !target.accepts(level) {
                continue;
            }
            match &mut target.sink {
                Sink::Console => {
                    if self.stderr_threshold.is_some_and(|t| level <= t) {
                        eprint!("{line}");
                    } else {
                        print!("{line}");
                    }
                }
                Sink::File(writer) => {
                    if let Err(e) = write_line(writer, &line) {
                        eprintln!("failed to write log file {}: {e}", target.name);
                    }
                }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, LogTarget>> {
        self.targets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("targets", &self.target_names())
            .field("stderr_threshold", &self.stderr_threshold)
            .finish()
    }
}

fn format_line(level: Level, stamp: &str, body: &str) -> String {
    format!("[{}]<{stamp}> {body}\n", level.label())
}

/// The error message followed by one indented line per cause.
fn error_report(err: &dyn Error, fatal: bool) -> String {
    let mut report = err.to_string();
    let mut cause = err.source();
    while let Some(e) = cause {
        report.push_str("\n   caused by: ");
        report.push_str(&e.to_string());
        cause = e.source();
    }
    if fatal {
        report.push_str("\n This is fatal. Exiting!");
    }
    report
}

fn write_line(writer: &mut BufWriter<File>, line: &str) -> io::Result<()> {
    writer.write_all(line.as_bytes())?;
    writer.flush()
}

fn open_append(path: &Path) -> LogResult<File> {
    let open_err = |source| LogError::Open {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(open_err)?;
        }
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(open_err)
}
