use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Log verbosity; repeat for more detail (-v warn, -vv info, -vvv debug, -vvvv trace).
    #[arg(short = 'v', long = None, env = "CHRONOSYNC_VERBOSITY", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Where to write logs. Logging is off without it since the terminal is in use.
    #[arg(short, long, env = "CHRONOSYNC_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Minimum milliseconds between redraws while the stopwatch runs.
    #[arg(short, long, env = "CHRONOSYNC_FRAME_MS", default_value_t = 33)]
    pub frame_ms: u64,

    /// Clock text shown in the status bar.
    #[arg(short, long, env = "CHRONOSYNC_CLOCK", default_value = "9:41")]
    pub clock: String,

    /// Label under the time display.
    #[arg(short, long, env = "CHRONOSYNC_TITLE", default_value = "ChronoSync")]
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_help_documents_every_flag() {
        let help = Arguments::command().render_help().to_string();
        assert!(help.contains("Log verbosity"));
        assert!(help.contains("Where to write logs"));
        assert!(help.contains("Clock text"));
    }

    #[test]
    fn test_defaults() {
        let args = Arguments::try_parse_from(["chronosync"]).unwrap();
        assert_eq!(args.verbosity, 0);
        assert_eq!(args.frame_ms, 33);
        assert_eq!(args.clock, "9:41");
        assert_eq!(args.title, "ChronoSync");
        assert!(args.log_file.is_none());
    }

    #[test]
    fn test_flags() {
        let args = Arguments::try_parse_from([
            "chronosync", "-vv", "--log-file", "/tmp/chrono.log", "--frame-ms", "50",
        ])
        .unwrap();
        assert_eq!(args.verbosity, 2);
        assert_eq!(args.frame_ms, 50);
        assert_eq!(args.log_file, Some(PathBuf::from("/tmp/chrono.log")));
    }
}
