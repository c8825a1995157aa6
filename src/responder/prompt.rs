//! Prompt construction and clean-up of generated text for the fallback rule

use crate::session::Turn;

/// Turns of history included in a prompt (three exchanges)
pub(crate) const PROMPT_HISTORY_TURNS: usize = 6;

/// Replies shorter than this are treated as degenerate
pub(crate) const MIN_REPLY_CHARS: usize = 5;

const BOT_LABEL: &str = "bot:";

/// Flatten the last few turns and the new message into `role: message` lines.
pub(crate) fn build_prompt(history: &[Turn], message: &str) -> String {
    let start = history.len().saturating_sub(PROMPT_HISTORY_TURNS);
    let mut lines: Vec<String> = history[start..]
        .iter()
        .map(|turn| format!("{}: {}", turn.role.as_str(), turn.message))
        .collect();
    lines.push(format!("user: {message}"));
    lines.join("\n")
}

/// Strip the echoed prompt and a leading bot label from generated text.
pub(crate) fn strip_echo(generated: &str, prompt: &str) -> String {
    let reply = generated.strip_prefix(prompt).unwrap_or(generated).trim();
    reply
        .strip_prefix(BOT_LABEL)
        .unwrap_or(reply)
        .trim()
        .to_string()
}

/// Empty, an echo of the user's message, or too short to be useful.
pub(crate) fn is_degenerate(reply: &str, message: &str) -> bool {
    reply.is_empty() || reply == message.trim() || reply.chars().count() < MIN_REPLY_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;
    use chrono::Local;

    fn turns(count: usize) -> Vec<Turn> {
        let now = Local::now();
        (0..count)
            .map(|i| {
                let role = if i % 2 == 0 { Role::User } else { Role::Bot };
                Turn::at(role, &format!("m{i}"), now)
            })
            .collect()
    }

    #[test]
    fn prompt_without_history_is_just_the_message() {
        assert_eq!(build_prompt(&[], "tell me a joke"), "user: tell me a joke");
    }

    #[test]
    fn prompt_keeps_last_six_turns() {
        let history = turns(9);
        let prompt = build_prompt(&history, "next");
        assert_eq!(
            prompt,
            "bot: m3\nuser: m4\nbot: m5\nuser: m6\nbot: m7\nuser: m8\nuser: next"
        );
    }

    #[test]
    fn strip_echo_removes_prompt_and_label() {
        let prompt = "user: hi";
        assert_eq!(
            strip_echo("user: hi\nbot: nice to meet you", prompt),
            "nice to meet you"
        );
        assert_eq!(strip_echo("  plain answer ", prompt), "plain answer");
    }

    #[test]
    fn degenerate_replies() {
        assert!(is_degenerate("", "hi there"));
        assert!(is_degenerate("tell me more", "tell me more"));
        assert!(is_degenerate("ok", "tell me more"));
        assert!(!is_degenerate("Sure, here it is.", "tell me more"));
    }
}
