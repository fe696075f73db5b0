//! SVG Overlays CLI
//!
//! Usage:
//!   svg-overlays [--config <FILE>] <INPUT> <TEMPLATE> [OPTIONS]
//!
//! Options (also accepted in layer labels starting with `-`):
//!   -e PDF|EPS|PNG   Export format (default PDF)
//!   -r <DPI>         Export resolution (default 90, PNG only)
//!   -h, -?, --help   Print usage

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use svg_overlays::{
    exit_status, run, usage, ExporterSettings, InkscapeExporter, OverlayError, Request,
    RunOutcome,
};

#[derive(Parser)]
#[command(name = "svg-overlays")]
#[command(about = "Render one file per overlay from a layered SVG drawing")]
#[command(disable_help_flag = true)]
struct Cli {
    /// Exporter settings file (TOML format)
    #[arg(long, env = "SVG_OVERLAYS_CONFIG")]
    config: Option<PathBuf>,

    /// Input drawing
    #[arg(allow_hyphen_values = true)]
    input: Option<String>,

    /// Output template; the first run of # becomes the overlay number
    #[arg(allow_hyphen_values = true)]
    template: Option<String>,

    /// Options: -e PDF|EPS|PNG, -r <dpi>, -h
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    options: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "svg-overlays".to_string());

    let result = Cli::try_parse()
        .map_err(usage_error)
        .and_then(execute);
    match &result {
        Ok(RunOutcome::Rendered(_)) => {}
        Ok(RunOutcome::HelpRequested) => println!("{}", usage(&program)),
        Err(e) => report(&program, e),
    }
    ExitCode::from(exit_status(&result))
}

fn execute(cli: Cli) -> Result<RunOutcome, OverlayError> {
    let invocation = match Request::from_args(cli.input, cli.template, cli.options)? {
        Request::Render(invocation) => invocation,
        Request::Help => return Ok(RunOutcome::HelpRequested),
    };
    let settings = match &cli.config {
        Some(path) => ExporterSettings::from_file(path)?,
        None => ExporterSettings::default(),
    };
    let exporter = InkscapeExporter::new(settings);
    let stdout = io::stdout();
    run(&invocation, &exporter, &mut stdout.lock())
}

/// Turn a command line clap rejects into a usage error
fn usage_error(error: clap::Error) -> OverlayError {
    let rendered = error.to_string();
    let message = rendered.lines().next().unwrap_or_default();
    OverlayError::Usage(message.trim_start_matches("error: ").to_string())
}

fn report(program: &str, error: &OverlayError) {
    match error {
        OverlayError::Options(e) => eprint!("{}", e.format()),
        _ => eprintln!("error: {}", error),
    }
    eprintln!("for usage information try  -h");
    if error.prints_usage() {
        eprintln!();
        eprintln!("{}", usage(program));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<RunOutcome, OverlayError> {
        Cli::try_parse_from(args).map_err(usage_error).and_then(|cli| {
            match Request::from_args(cli.input, cli.template, cli.options)? {
                Request::Help => Ok(RunOutcome::HelpRequested),
                Request::Render(_) => Ok(RunOutcome::Rendered(Default::default())),
            }
        })
    }

    #[test]
    fn test_config_without_value_is_usage_error() {
        let result = parse(&["svg-overlays", "--config"]);
        let Err(OverlayError::Usage(message)) = &result else {
            panic!("expected a usage error, got {:?}", result);
        };
        assert!(message.contains("--config"), "message {:?}", message);
        assert!(!message.starts_with("error:"));
        assert_eq!(exit_status(&result), 1);
    }

    #[test]
    fn test_help_positional_exits_with_failure() {
        for args in [&["svg-overlays", "-h"][..], &["svg-overlays", "in.svg", "--help"][..]] {
            let result = parse(args);
            assert_eq!(result.as_ref().ok(), Some(&RunOutcome::HelpRequested));
            assert_eq!(exit_status(&result), 1);
        }
    }

    #[test]
    fn test_missing_template_is_usage_error() {
        let result = parse(&["svg-overlays", "in.svg"]);
        assert!(matches!(result, Err(OverlayError::Usage(_))));
        assert_eq!(exit_status(&result), 1);
    }

    #[test]
    fn test_trailing_options_are_collected() {
        let cli = Cli::try_parse_from(["svg-overlays", "in.svg", "out-#.png", "-e", "PNG", "-r", "150"])
            .unwrap();
        assert_eq!(cli.input.as_deref(), Some("in.svg"));
        assert_eq!(cli.template.as_deref(), Some("out-#.png"));
        assert_eq!(cli.options, vec!["-e", "PNG", "-r", "150"]);
    }
}
