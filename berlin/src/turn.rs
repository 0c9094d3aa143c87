use std::error::Error;
use std::io::Read;

use thiserror::Error;

use crate::engine::{Engine, Game};
use crate::logger::Logger;

#[derive(Error, Debug)]
pub enum TurnError {
    #[error("Could not start the game: {0}")]
    Construct(#[source] Box<dyn Error + Send + Sync>),
    #[error("Could not serialize the response: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Plays one turn: build the game from `input`, advance it once and return
/// the response as JSON.
pub fn run_turn<E: Engine>(
    engine: &E,
    input: &mut dyn Read,
    logger: Logger,
) -> Result<Vec<u8>, TurnError> {
    let mut game = engine
        .new_game(input, logger)
        .map_err(|e| TurnError::Construct(Box::new(e)))?;

    game.do_action();

    Ok(serde_json::to_vec(game.response())?)
}
