//! Set up logging to the terminal and, for batch runs, to files in the output folder.
use anyhow::{Context, Result, anyhow, ensure};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{Level, LevelFilter, Record};
use std::fmt::{Arguments, Display};
use std::fs::File;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::OnceLock;

/// Set once the global logger has been installed
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// The level used when neither the environment nor `settings.toml` gives one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable which takes precedence over the `log_level` setting
pub const LOG_LEVEL_ENV_VAR: &str = "ENERGY_MIX_LOG_LEVEL";

/// Receives debug and info messages during a batch run
const INFO_LOG_FILE_NAME: &str = "energy_mix_info.log";

/// Receives warnings and errors during a batch run
const ERROR_LOG_FILE_NAME: &str = "energy_mix_error.log";

/// Whether [`init`] has already succeeded in this process
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Install the global logger.
///
/// Warnings and errors are written to stderr and everything else to stdout, coloured by level when
/// the stream is a terminal. If `log_file_dir` is given, `energy_mix_info.log` and
/// `energy_mix_error.log` are (re)created there as well.
///
/// # Arguments
///
/// * `settings_level` - Level name from `settings.toml`, overridden by [`LOG_LEVEL_ENV_VAR`]
/// * `log_file_dir` - Folder for log files, if any
pub fn init(settings_level: &str, log_file_dir: Option<&Path>) -> Result<()> {
    ensure!(!is_logger_initialised(), "Logger already initialised");

    let level = match std::env::var(LOG_LEVEL_ENV_VAR) {
        Ok(env_level) => parse_level_filter(&env_level),
        Err(_) => parse_level_filter(settings_level),
    }?;

    let mut dispatch = Dispatch::new()
        .chain(terminal_chain(std::io::stdout(), level, is_info_or_below))
        .chain(terminal_chain(
            std::io::stderr(),
            level.min(LevelFilter::Warn),
            |_| true,
        ));

    if let Some(dir) = log_file_dir {
        dispatch = dispatch
            .chain(
                file_chain(dir, INFO_LOG_FILE_NAME)?
                    .filter(|metadata| is_info_or_below(metadata.level()))
                    .level(level.max(LevelFilter::Info)),
            )
            .chain(file_chain(dir, ERROR_LOG_FILE_NAME)?.level(LevelFilter::Warn));
    }

    dispatch.apply()?;
    LOGGER_INIT
        .set(())
        .map_err(|()| anyhow!("Logger already initialised"))
}

/// Parse a level name such as `warn` or `DEBUG`
fn parse_level_filter(name: &str) -> Result<LevelFilter> {
    name.parse()
        .map_err(|_| anyhow!("Unknown log level: {name}"))
}

fn is_info_or_below(level: Level) -> bool {
    level > Level::Warn
}

/// A chain writing to a terminal stream, with colour only if the stream is a terminal
fn terminal_chain<W>(stream: W, level: LevelFilter, accept: fn(Level) -> bool) -> Dispatch
where
    W: IsTerminal + std::io::Write + Send + 'static,
{
    let colours = stream.is_terminal().then(|| {
        ColoredLevelConfig::new()
            .error(Color::Red)
            .warn(Color::Yellow)
            .info(Color::Green)
            .debug(Color::Blue)
            .trace(Color::Magenta)
    });

    Dispatch::new()
        .filter(move |metadata| accept(metadata.level()))
        .format(move |out, message, record| match &colours {
            Some(colours) => write_line(out, colours.color(record.level()), record, message),
            None => write_line(out, record.level(), record, message),
        })
        .level(level)
        .chain(Box::new(stream) as Box<dyn std::io::Write + Send>)
}

/// A chain writing uncoloured lines to a freshly truncated file
fn file_chain(dir: &Path, file_name: &str) -> Result<Dispatch> {
    let path = dir.join(file_name);
    let file = File::create(&path)
        .with_context(|| format!("Could not create log file {}", path.display()))?;

    Ok(Dispatch::new()
        .format(|out, message, record| write_line(out, record.level(), record, message))
        .chain(file))
}

/// Format a line as `[HH:MM:SS LEVEL target] message`
fn write_line(out: FormatCallback, level: impl Display, record: &Record, message: &Arguments) {
    let time = Local::now().format("%H:%M:%S");
    out.finish(format_args!("[{time} {level} {}] {message}", record.target()));
}
