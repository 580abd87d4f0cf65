use log::{Level, LevelFilter};
use owo_colors::{OwoColorize, Stream};
use std::io::Write;

pub fn configure(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .format(|buf, record| match record.level() {
            Level::Error => writeln!(
                buf,
                "{}: {}",
                "error".if_supports_color(Stream::Stderr, |text| text.red()),
                record.args()
            ),
            Level::Warn => writeln!(
                buf,
                "{}: {}",
                "warning".if_supports_color(Stream::Stderr, |text| text.yellow()),
                record.args()
            ),
            Level::Debug | Level::Trace => writeln!(
                buf,
                "{}: {}",
                "debug".if_supports_color(Stream::Stderr, |text| text.blue()),
                record.args()
            ),
            Level::Info => writeln!(buf, "{}", record.args()),
        })
        .init();
}
