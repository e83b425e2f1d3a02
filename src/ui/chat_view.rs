use std::fmt::Write;

use crate::config::APP_NAME;
use crate::models::{Conversation, Message, Role};
use crate::services::MessageState;

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "Assistant",
        Role::System => "System",
    }
}

fn write_message(out: &mut String, msg: &Message) {
    let label = role_label(msg.role);
    let mut lines = msg.content.lines();
    let first = lines.next().unwrap_or_default();
    let _ = writeln!(out, "{label}: {first}");
    let indent = " ".repeat(label.len() + 2);
    for line in lines {
        let _ = writeln!(out, "{indent}{line}");
    }
}

/// Render the thread of the active conversation, or a welcome banner when
/// nothing is selected.
pub fn render(state: &MessageState, conversation: Option<&Conversation>) -> String {
    let mut out = String::new();

    if state.active.is_none() {
        let _ = writeln!(out, "{APP_NAME}");
        let _ = writeln!(
            out,
            "Start a new conversation with /new, or just type a message."
        );
        return out;
    }

    if let Some(conv) = conversation {
        let _ = writeln!(out, "── {} ──", conv.title.replace('\n', " "));
    }

    if state.loading {
        let _ = writeln!(out, "Loading messages...");
        return out;
    }

    for msg in &state.messages {
        write_message(&mut out, msg);
    }

    if state.is_typing {
        let _ = writeln!(out, "Assistant: Thinking...");
    }

    if let Some(error) = &state.error {
        let _ = writeln!(out, "! {error}");
    }

    out
}
