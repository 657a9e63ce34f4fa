use colored::{ColoredString, Colorize};
use env_logger::Builder;
use log::Level;
use std::io::Write;

/// Status labels shared by the reporter and the run summary.
pub struct Colors;

impl Colors {
    pub const INSTALLED: &'static str = "installed";
    pub const SKIPPED: &'static str = "skipped";
    pub const EMPTY: &'static str = "empty";

    pub fn colorize(label: &str, text: &str) -> ColoredString {
        match label {
            Self::INSTALLED => text.green(),
            Self::SKIPPED => text.yellow(),
            Self::EMPTY => text.dimmed(),
            _ => text.normal(),
        }
    }
}

/// Install the global logger. Safe to call more than once; later calls are ignored.
pub fn setup_logging(verbose: bool) {
    use log::LevelFilter;

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn) // Default: only warnings from dependencies
        .filter_module(env!("CARGO_PKG_NAME"), level) // Our crate: use requested level
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME");
            let line = match record.level() {
                Level::Error | Level::Warn => {
                    let level_str = match record.level() {
                        Level::Warn => "WARN".yellow(),
                        Level::Error => "ERROR".red(),
                        _ => unreachable!(),
                    };
                    let path = record.target().to_string().white();
                    format!("[{} {} {}] {}", name.cyan(), level_str, path, record.args())
                }
                _ => format!("[{}] {}", name.cyan(), record.args()),
            };
            writeln!(buf, "{}", line)
        })
        .try_init();
}
