use crate::output::format::to_pretty_json;
use crate::responder::Reply;
use crate::session::ChatState;

pub(crate) fn output_reply_json(reply: &Reply, state: &ChatState) -> String {
    let output = serde_json::json!({
        "reply": reply.text,
        "rule": reply.rule,
        "session_id": state.session_id,
    });
    to_pretty_json(&output, "{}")
}
