#![forbid(unsafe_code)]

//! Command-line argument parsing for the kiosk demo.
//!
//! Parses args manually. Supports environment variable overrides via the
//! `KIOSK_DEMO_*` prefix; explicit flags win over the environment.

use std::env;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Kiosk Demo - scripted session through the interaction engines

USAGE:
    kiosk-demo [OPTIONS]

OPTIONS:
    --duration=SECS      Countdown length in seconds (default: 10)
    --panels=N           Number of result panels to browse (default: 3)
    --items=N            Number of selectable items, at least 1 (default: 4)
    --realtime           Use real worker-thread timers instead of virtual time
    --json               Print one JSON object per event
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT VARIABLES:
    KIOSK_DEMO_DURATION  Override --duration
    KIOSK_DEMO_PANELS    Override --panels
    KIOSK_DEMO_ITEMS     Override --items
    KIOSK_DEMO_REALTIME  Set to 1 to enable --realtime
    KIOSK_DEMO_JSON      Set to 1 to enable --json
    KIOSK_LOG            Log filter (falls back to RUST_LOG, default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Countdown length in seconds.
    pub duration: i64,
    /// Number of slide panels.
    pub panels: usize,
    /// Number of selectable items.
    pub items: usize,
    /// Real timers instead of virtual time.
    pub realtime: bool,
    /// JSON-lines output.
    pub json: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            duration: 10,
            panels: 3,
            items: 4,
            realtime: false,
            json: false,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run a session with these options.
    Run(Opts),
    /// Print the help text.
    Help,
    /// Print the version.
    Version,
}

impl Opts {
    /// Parse command-line arguments and environment variables, exiting the
    /// process for `--help`, `--version` and invalid input.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match parse_from(args, |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("kiosk-demo {VERSION}");
                process::exit(0);
            }
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }
}

/// Parses `args` (without the program name) on top of environment values
/// looked up through `var`.
pub fn parse_from<I, F>(args: I, var: F) -> Result<Command, String>
where
    I: IntoIterator<Item = String>,
    F: Fn(&str) -> Option<String>,
{
    let mut opts = Opts::default();

    // Environment defaults first; unparseable values are ignored.
    if let Some(val) = var("KIOSK_DEMO_DURATION")
        && let Ok(n) = val.parse()
    {
        opts.duration = n;
    }
    if let Some(val) = var("KIOSK_DEMO_PANELS")
        && let Ok(n) = val.parse()
    {
        opts.panels = n;
    }
    if let Some(val) = var("KIOSK_DEMO_ITEMS")
        && let Ok(n) = val.parse()
    {
        opts.items = n;
    }
    if let Some(val) = var("KIOSK_DEMO_REALTIME") {
        opts.realtime = is_truthy(&val);
    }
    if let Some(val) = var("KIOSK_DEMO_JSON") {
        opts.json = is_truthy(&val);
    }

    for arg in args {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            "--realtime" => opts.realtime = true,
            "--json" => opts.json = true,
            other => {
                if let Some(val) = other.strip_prefix("--duration=") {
                    opts.duration = parse_value("--duration", val)?;
                } else if let Some(val) = other.strip_prefix("--panels=") {
                    opts.panels = parse_value("--panels", val)?;
                } else if let Some(val) = other.strip_prefix("--items=") {
                    opts.items = parse_value("--items", val)?;
                } else {
                    return Err(format!("Unknown argument: {other}"));
                }
            }
        }
    }

    if opts.duration <= 0 {
        return Err(format!("--duration must be positive, got {}", opts.duration));
    }
    if opts.items == 0 {
        return Err("--items must be at least 1".to_string());
    }
    Ok(Command::Run(opts))
}

fn parse_value<T: std::str::FromStr>(flag: &str, val: &str) -> Result<T, String> {
    val.parse()
        .map_err(|_| format!("Invalid {flag} value: {val}"))
}

fn is_truthy(val: &str) -> bool {
    matches!(
        val.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(args: &[&str], env: &[(&str, &str)]) -> Result<Command, String> {
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        parse_from(args.iter().map(|s| s.to_string()), |key| {
            env.get(key).cloned()
        })
    }

    #[test]
    fn default_opts() {
        assert_eq!(parse(&[], &[]), Ok(Command::Run(Opts::default())));
    }

    #[test]
    fn flags_override_env() {
        let cmd = parse(
            &["--duration=30", "--json"],
            &[("KIOSK_DEMO_DURATION", "5"), ("KIOSK_DEMO_PANELS", "7")],
        )
        .unwrap();
        let Command::Run(opts) = cmd else {
            panic!("expected run, got {cmd:?}");
        };
        assert_eq!(opts.duration, 30);
        assert_eq!(opts.panels, 7);
        assert!(opts.json);
        assert!(!opts.realtime);
    }

    #[test]
    fn env_toggles() {
        let cmd = parse(&[], &[("KIOSK_DEMO_REALTIME", "true"), ("KIOSK_DEMO_JSON", "0")]).unwrap();
        assert_eq!(
            cmd,
            Command::Run(Opts {
                realtime: true,
                ..Opts::default()
            })
        );
    }

    #[test]
    fn bad_env_value_ignored() {
        assert_eq!(
            parse(&[], &[("KIOSK_DEMO_ITEMS", "many")]),
            Ok(Command::Run(Opts::default()))
        );
    }

    #[test]
    fn help_and_version() {
        assert_eq!(parse(&["--help"], &[]), Ok(Command::Help));
        assert_eq!(parse(&["-V", "--bogus"], &[]), Ok(Command::Version));
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(parse(&["--bogus"], &[]).is_err());
        assert!(parse(&["--panels=x"], &[]).is_err());
        assert!(parse(&["--duration=0"], &[]).is_err());
        assert!(parse(&["--duration=-3"], &[]).is_err());
        assert!(parse(&["--items=0"], &[]).is_err());
    }

    #[test]
    fn version_string_nonempty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn help_text_lists_options() {
        for flag in ["--duration", "--panels", "--items", "--realtime", "--json"] {
            assert!(HELP_TEXT.contains(flag), "missing {flag}");
        }
    }
}
