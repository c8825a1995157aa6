use comfy_table::{Cell, Color};

use crate::output::format::{
    create_styled_table, header_cell, styled_cell, to_pretty_json, truncate_message,
};
use crate::session::{Role, Session};
use crate::utils::Timezone;

const MESSAGE_WIDTH: usize = 80;

#[derive(Debug, Clone, Copy)]
pub(crate) struct HistoryTableOptions {
    pub(crate) use_color: bool,
    pub(crate) timezone: Timezone,
}

pub(crate) fn print_history_table(
    session_id: &str,
    session: &Session,
    options: HistoryTableOptions,
) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("#", options.use_color),
        header_cell("Time", options.use_color),
        header_cell("Role", options.use_color),
        header_cell("Message", options.use_color),
    ]);

    for (i, turn) in session.history.iter().enumerate() {
        let role_color = match (options.use_color, turn.role) {
            (false, _) => None,
            (true, Role::User) => Some(Color::Yellow),
            (true, Role::Bot) => Some(Color::Green),
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(options.timezone.format_timestamp(&turn.timestamp)),
            styled_cell(turn.role.as_str(), role_color, false),
            Cell::new(truncate_message(&turn.message, MESSAGE_WIDTH)),
        ]);
    }

    println!("\n  Session {session_id}\n");
    println!("{table}");
    println!("\n  {} turns\n", session.len());
}

pub(crate) fn output_history_json(session_id: &str, session: &Session) -> String {
    let output = serde_json::json!({
        "session_id": session_id,
        "history": session.history,
    });
    to_pretty_json(&output, "{}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Turn;
    use chrono::Local;

    #[test]
    fn history_json_keeps_turn_order() {
        let now = Local::now();
        let mut session = Session::default();
        session.push(Turn::at(Role::User, "hello", now));
        session.push(Turn::at(Role::Bot, "Hello! How can I assist you today?", now));

        let json: serde_json::Value =
            serde_json::from_str(&output_history_json("s1", &session)).unwrap();
        assert_eq!(json["session_id"], "s1");
        let history = json["history"].as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["role"], "user");
        assert_eq!(history[1]["message"], "Hello! How can I assist you today?");
    }
}
