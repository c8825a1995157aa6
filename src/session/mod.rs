//! Per-session chat history
//!
//! A session is an ordered list of turns persisted as one JSON file per
//! session id. The controller threads the session id across calls.

mod controller;
mod store;
mod types;

pub(crate) use controller::{ChatState, SessionController};
pub(crate) use store::{SessionStore, SessionSummary, validate_session_id};
pub(crate) use types::{Role, Session, Turn};
