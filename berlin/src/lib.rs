//! Serving shell for berlin-ai.com turn-based AIs.
//!
//! One turn is one JSON document in and one JSON document out. Everything
//! in here is transport glue around an [`Engine`], which interprets the
//! turn and picks the moves.

pub mod engine;
pub mod logger;
pub mod reply;
pub mod request;
pub mod turn;

pub use engine::{Engine, Game};
pub use logger::{ExecutionEnvironment, Logger, RequestContext};
pub use reply::{reply, unreadable, Reply, RequestInfo, Status};
pub use request::{adapt, check, InvalidRequest, TurnRequest};
pub use turn::{run_turn, TurnError};
