pub mod echo;

use std::error::Error;
use std::io::Read;

use serde::Serialize;

use crate::logger::Logger;

pub use echo::Echo;

/// The AI behind the shell. Builds one game per turn from the request body.
pub trait Engine: Send + Sync + 'static {
    type Game: Game;
    type Error: Error + Send + Sync + 'static;

    /// Construct the game for this turn. The logger is the one selected for
    /// the current request (or invocation) and may be kept by the game.
    fn new_game(&self, input: &mut dyn Read, logger: Logger) -> Result<Self::Game, Self::Error>;
}

pub trait Game {
    type Response: Serialize;

    /// Advance one turn. Mutates the game's response.
    fn do_action(&mut self);
    fn response(&self) -> &Self::Response;
}
