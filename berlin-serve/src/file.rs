use std::fs::File;
use std::io::{self, Read, Write};

use berlin::{run_turn, Engine, ExecutionEnvironment, Logger, TurnError};
use thiserror::Error;

/// Filename that stands for standard input.
pub const STDIN: &str = "-";

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Error opening {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Error processing request: {0}")]
    Turn(#[from] TurnError),
    #[error("Error writing response: {0}")]
    Write(#[source] io::Error),
}

/// Plays a single turn read from `filename` (or stdin for `-`) and writes
/// the response to stdout. Errors are logged and nothing is written.
pub fn serve_file<E: Engine>(engine: &E, filename: &str) {
    let logger = Logger::select(ExecutionEnvironment::Standalone, None);
    if let Err(e) = serve_file_with(
        engine,
        filename,
        &mut io::stdin(),
        &mut io::stdout(),
        logger.clone(),
    ) {
        logger.log(e);
    }
}

pub fn serve_file_with<E: Engine>(
    engine: &E,
    filename: &str,
    stdin: &mut dyn Read,
    out: &mut dyn Write,
    logger: Logger,
) -> Result<(), ServeError> {
    let response = if filename == STDIN {
        run_turn(engine, stdin, logger)?
    } else {
        let mut file = File::open(filename).map_err(|source| ServeError::Open {
            path: filename.to_owned(),
            source,
        })?;
        run_turn(engine, &mut file, logger)?
    };

    out.write_all(&response).map_err(ServeError::Write)?;
    out.flush().map_err(ServeError::Write)
}
