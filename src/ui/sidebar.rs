use std::fmt::Write;

use chrono::{DateTime, Datelike, Utc};

use crate::models::Conversation;
use crate::services::ConversationState;

// --- SidebarItem: discriminated union for date headers vs conversation rows ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarItem {
    Header(&'static str), // "Today", "Yesterday", etc.
    Conversation {
        position: usize, // 1-based, what `/select <n>` refers to
        conversation: Conversation,
    },
}

const GROUPS: [&str; 4] = ["Today", "Yesterday", "This Week", "Older"];

/// One header per date group, newest group first. Rows keep their list
/// position, so a row moved out of list order by a rename still resolves
/// through `id_at`.
pub fn build_items(conversations: &[Conversation], now: DateTime<Utc>) -> Vec<SidebarItem> {
    let mut items = Vec::with_capacity(conversations.len() + GROUPS.len());

    for group in GROUPS {
        let mut rows = conversations
            .iter()
            .enumerate()
            .filter(|(_, conv)| date_group(&conv.updated_at, now) == group)
            .peekable();
        if rows.peek().is_none() {
            continue;
        }

        items.push(SidebarItem::Header(group));
        items.extend(rows.map(|(index, conv)| SidebarItem::Conversation {
            position: index + 1,
            conversation: conv.clone(),
        }));
    }

    items
}

pub fn render(state: &ConversationState, active: Option<i64>, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    if state.loading {
        out.push_str("  Loading conversations...\n");
    } else if state.conversations.is_empty() && state.error.is_none() {
        out.push_str("  (no conversations yet: /new to start one)\n");
    }

    for item in build_items(&state.conversations, now) {
        match item {
            SidebarItem::Header(label) => {
                let _ = writeln!(out, "{label}");
            }
            SidebarItem::Conversation {
                position,
                conversation,
            } => {
                let marker = if active == Some(conversation.id) { '>' } else { ' ' };
                let title = conversation.title.replace('\n', " ");
                let _ = writeln!(out, "{marker} {position:>2}. {title}");
            }
        }
    }

    if let Some(error) = &state.error {
        let _ = writeln!(out, "! {error}");
    }
    out
}

/// Resolve a 1-based sidebar position to a conversation id.
pub fn id_at(conversations: &[Conversation], position: usize) -> Option<i64> {
    position
        .checked_sub(1)
        .and_then(|index| conversations.get(index))
        .map(|c| c.id)
}

/// Classify a timestamp into a date group label.
fn date_group(dt: &DateTime<Utc>, now: DateTime<Utc>) -> &'static str {
    let today = now.date_naive();
    let date = dt.date_naive();

    if date == today {
        "Today"
    } else if date == today.pred_opt().unwrap_or(today) {
        "Yesterday"
    } else if date.iso_week() == today.iso_week() && date.year() == today.year() {
        "This Week"
    } else {
        "Older"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        // A Thursday.
        Utc.with_ymd_and_hms(2024, 5, 2, 15, 0, 0).unwrap()
    }

    fn conv(id: i64, title: &str, updated_at: DateTime<Utc>) -> Conversation {
        Conversation {
            id,
            title: title.to_string(),
            created_at: updated_at,
            updated_at,
        }
    }

    #[test]
    fn test_date_groups() {
        let now = now();
        assert_eq!(date_group(&(now - Duration::hours(2)), now), "Today");
        assert_eq!(date_group(&(now - Duration::days(1)), now), "Yesterday");
        assert_eq!(date_group(&(now - Duration::days(3)), now), "This Week");
        assert_eq!(date_group(&(now - Duration::days(30)), now), "Older");
    }

    fn state(conversations: Vec<Conversation>) -> ConversationState {
        ConversationState {
            conversations,
            ..ConversationState::default()
        }
    }

    #[test]
    fn test_build_items_groups_rows_under_date_headers() {
        let now = now();
        let list = vec![
            conv(3, "c", now - Duration::hours(1)),
            conv(2, "b", now - Duration::hours(2)),
            conv(1, "a", now - Duration::days(40)),
        ];
        let items = build_items(&list, now);
        assert_eq!(items.len(), 5);
        assert_eq!(items[0], SidebarItem::Header("Today"));
        assert_eq!(items[3], SidebarItem::Header("Older"));
        assert!(matches!(items[4], SidebarItem::Conversation { position: 3, .. }));
    }

    #[test]
    fn test_renamed_row_out_of_order_does_not_repeat_header() {
        // Renaming "c" bumped its updated_at without moving it in the list.
        let now = now();
        let list = vec![
            conv(1, "a", now - Duration::hours(1)),
            conv(2, "b", now - Duration::days(40)),
            conv(3, "c", now),
        ];
        let items = build_items(&list, now);
        assert_eq!(
            items
                .iter()
                .filter(|item| matches!(item, SidebarItem::Header(_)))
                .count(),
            2
        );

        let layout: Vec<String> = items
            .iter()
            .map(|item| match item {
                SidebarItem::Header(label) => label.to_string(),
                SidebarItem::Conversation { position, .. } => position.to_string(),
            })
            .collect();
        assert_eq!(layout, ["Today", "1", "3", "Older", "2"]);
        assert_eq!(id_at(&list, 3), Some(3));
    }

    #[test]
    fn test_render_marks_active_conversation() {
        let now = now();
        let list = vec![conv(7, "Trip", now), conv(4, "Taxes", now)];
        let out = render(&state(list), Some(4), now);
        assert!(out.contains(">  2. Taxes"));
        assert!(out.contains("   1. Trip"));
    }

    #[test]
    fn test_render_shows_load_error_and_keeps_rows() {
        let now = now();
        let mut state = state(vec![conv(7, "Trip", now)]);
        state.error = Some("Failed to load conversations: connection refused".to_string());
        let out = render(&state, None, now);
        assert!(out.contains("   1. Trip"));
        assert!(out.ends_with("! Failed to load conversations: connection refused\n"));
        assert!(!out.contains("no conversations yet"));
    }

    #[test]
    fn test_render_empty_and_loading() {
        let now = now();
        assert!(render(&state(Vec::new()), None, now).contains("/new to start one"));

        let loading = ConversationState {
            loading: true,
            ..ConversationState::default()
        };
        assert_eq!(render(&loading, None, now), "  Loading conversations...\n");
    }

    #[test]
    fn test_id_at() {
        let now = now();
        let list = vec![conv(7, "Trip", now), conv(4, "Taxes", now)];
        assert_eq!(id_at(&list, 1), Some(7));
        assert_eq!(id_at(&list, 2), Some(4));
        assert_eq!(id_at(&list, 0), None);
        assert_eq!(id_at(&list, 3), None);
    }
}
