//! Standalone serving for berlin engines: a long-running HTTP server or a
//! single turn read from a file.

use std::convert::Infallible;
use std::str::FromStr;

use berlin::Engine;
use clap::Parser;

pub mod config;
pub mod file;
pub mod http;

/// What argument 1 asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Serve HTTP on this port. Not range checked.
    Port(String),
    /// Play one turn from this file, `-` for stdin.
    File(String),
}

impl FromStr for Target {
    type Err = Infallible;

    // Anything that reads as an integer is a port, so a file named `8080`
    // can only be passed through stdin.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<i64>() {
            Ok(_) => Ok(Target::Port(s.to_owned())),
            Err(_) => Ok(Target::File(s.to_owned())),
        }
    }
}

/// Only argument 1 is read. There are no flags, so `--help` is a filename
/// like any other, and anything after argument 1 is ignored.
#[derive(Parser, Debug)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Port to serve HTTP on, or a turn file to play once (`-` for stdin)
    #[arg(default_value = file::STDIN, allow_hyphen_values = true)]
    pub port_or_filename: Target,
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub ignored: Vec<String>,
}

/// Reads the command line and serves `engine` accordingly.
pub async fn serve<E: Engine>(engine: E) {
    let cli = Cli::parse();
    serve_target(engine, cli.port_or_filename).await
}

pub async fn serve_target<E: Engine>(engine: E, target: Target) {
    match target {
        Target::Port(port) => http::serve_http(engine, &port).await,
        Target::File(filename) => {
            let run = tokio::task::spawn_blocking(move || file::serve_file(&engine, &filename));
            if let Err(e) = run.await {
                tracing::error!(error = %e, "file turn failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Target {
        Cli::try_parse_from(args).unwrap().port_or_filename
    }

    #[test]
    fn integers_are_ports() {
        assert_eq!(parse(&["berlin", "8080"]), Target::Port("8080".to_owned()));
        assert_eq!(parse(&["berlin", "+80"]), Target::Port("+80".to_owned()));
        assert_eq!(parse(&["berlin", "-1"]), Target::Port("-1".to_owned()));
        assert_eq!(parse(&["berlin", "99999"]), Target::Port("99999".to_owned()));
    }

    #[test]
    fn everything_else_is_a_file() {
        assert_eq!(
            parse(&["berlin", "request.json"]),
            Target::File("request.json".to_owned())
        );
        assert_eq!(parse(&["berlin", "-"]), Target::File("-".to_owned()));
        assert_eq!(parse(&["berlin", "80a"]), Target::File("80a".to_owned()));
        assert_eq!(
            parse(&["berlin", "99999999999999999999"]),
            Target::File("99999999999999999999".to_owned())
        );
    }

    #[test]
    fn arguments_after_the_first_are_ignored() {
        assert_eq!(
            parse(&["berlin", "8080", "ignored"]),
            Target::Port("8080".to_owned())
        );
        assert_eq!(
            parse(&["berlin", "request.json", "--verbose", "-x"]),
            Target::File("request.json".to_owned())
        );
    }

    #[test]
    fn there_are_no_flags() {
        assert_eq!(parse(&["berlin", "--help"]), Target::File("--help".to_owned()));
        assert_eq!(
            parse(&["berlin", "--version"]),
            Target::File("--version".to_owned())
        );
        assert_eq!(parse(&["berlin", "-h"]), Target::File("-h".to_owned()));
    }

    #[test]
    fn stdin_is_the_default() {
        assert_eq!(parse(&["berlin"]), Target::File("-".to_owned()));
    }
}
