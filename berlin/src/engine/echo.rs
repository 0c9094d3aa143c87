use std::io::{self, Read};

use serde_json::value::RawValue;
use thiserror::Error;

use crate::engine::{Engine, Game};
use crate::logger::Logger;
use crate::request::TurnRequest;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not read the turn request: {0}")]
    Read(#[from] io::Error),
    #[error("Turn request is not valid: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Answers every turn with the request it was given, byte for byte. Logs
/// nothing, so a file run leaves only the response on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct Echo;

#[derive(Debug)]
pub struct EchoGame {
    request: TurnRequest,
    input: Box<RawValue>,
    response: Option<Box<RawValue>>,
}

impl EchoGame {
    pub fn request(&self) -> &TurnRequest {
        &self.request
    }
}

impl Engine for Echo {
    type Game = EchoGame;
    type Error = Error;

    fn new_game(&self, input: &mut dyn Read, _logger: Logger) -> Result<EchoGame, Error> {
        let mut text = String::new();
        input.read_to_string(&mut text)?;
        let request: TurnRequest = serde_json::from_str(&text)?;
        let input = RawValue::from_string(text)?;
        Ok(EchoGame {
            request,
            input,
            response: None,
        })
    }
}

impl Game for EchoGame {
    type Response = Option<Box<RawValue>>;

    fn do_action(&mut self) {
        self.response = Some(self.input.clone());
    }

    fn response(&self) -> &Self::Response {
        &self.response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echoes_the_raw_document() {
        let body = r#"{"action":"move","infos":{"b":1,"a":2},"map":{},"state":{}}"#;
        let mut game = Echo.new_game(&mut body.as_bytes(), Logger::Stdout).unwrap();
        assert!(game.response().is_none());

        game.do_action();
        assert_eq!(serde_json::to_string(game.response()).unwrap(), body);
        assert_eq!(game.request().action, "move");
    }

    #[test]
    fn rejects_documents_that_are_not_turns() {
        let err = Echo
            .new_game(&mut &b"[1, 2, 3]"[..], Logger::Stdout)
            .unwrap_err();
        assert!(matches!(err, Error::Malformed(_)));
    }
}
