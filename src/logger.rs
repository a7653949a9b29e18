use std::io::Write as _;

use chrono::Local;
use env_logger::fmt::{Color, Formatter};
use env_logger::{Builder, Target};
use log::{Level, LevelFilter, Record};

/// Installs the global logger. Log lines go to stderr so stdout only carries the result.
pub(crate) fn init(debug: bool) -> Result<(), log::SetLoggerError> {
    let logger = Builder::new()
        .target(Target::Stderr)
        .filter_level(if debug { LevelFilter::Trace } else { LevelFilter::Warn })
        .parse_default_env()
        .format(format_record)
        .build();

    log::set_max_level(logger.filter());
    log::set_boxed_logger(Box::new(logger))
}

fn format_record(f: &mut Formatter, record: &Record) -> std::io::Result<()> {
    if !is_own_target(record.target()) {
        return Ok(());
    }

    let color = match record.level() {
        Level::Trace => Color::Magenta,
        Level::Debug => Color::Blue,
        Level::Info => Color::Green,
        Level::Warn => Color::Yellow,
        Level::Error => Color::Red,
    };
    let mut style = f.style();
    let level = style.set_color(color).value(format!("{:<5}", record.level()));

    writeln!(
        f,
        "{} {} > {}",
        Local::now().format("%H:%M:%S.%3f"),
        level,
        record.args()
    )
}

/// Only this crate's messages, not the http stack's.
fn is_own_target(target: &str) -> bool {
    target.split("::").next() == Some(clap::crate_name!())
}
