use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::consts::SESSION_ID_FORMAT;
use crate::responder::{Reply, Responder};

use super::store::SessionStore;
use super::types::{Role, Turn};

/// State token the caller carries between turns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ChatState {
    pub(crate) session_id: Option<String>,
}

impl ChatState {
    pub(crate) fn for_session(session_id: &str) -> Self {
        Self {
            session_id: Some(session_id.to_string()),
        }
    }
}

/// Session id derived from the clock at second resolution
pub(crate) fn new_session_id(now: DateTime<Local>) -> String {
    now.format(SESSION_ID_FORMAT).to_string()
}

/// Binds one inbound message to a session: load, respond, append, persist.
pub(crate) struct SessionController<'a> {
    responder: &'a Responder<'a>,
    store: &'a SessionStore,
}

impl<'a> SessionController<'a> {
    pub(crate) fn new(responder: &'a Responder<'a>, store: &'a SessionStore) -> Self {
        Self { responder, store }
    }

    /// Handle one message. A missing state or session id starts a new
    /// session. Persist failures are reported on stderr; the reply is still
    /// returned.
    pub(crate) fn handle(&self, message: &str, state: Option<ChatState>) -> (Reply, ChatState) {
        let now = Local::now();
        let session_id = state
            .and_then(|s| s.session_id)
            .unwrap_or_else(|| new_session_id(now));

        let mut session = self.store.load(&session_id);
        let reply = self.responder.respond(message, &session.history);

        session.push(Turn::at(Role::User, message, now));
        session.push(Turn::at(Role::Bot, &reply.text, Local::now()));

        if let Err(err) = self.store.save(&session_id, &session) {
            eprintln!("Warning: {err}");
        }

        (reply, ChatState::for_session(&session_id))
    }
}
