mod app;
mod config;
mod models;
mod providers;
mod remote;
mod services;
#[cfg(test)]
mod test_support;
mod ui;

use std::io::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use app::{App, AppMsg};
use config::{ClientConfig, ReplyBackend, APP_NAME};
use providers::{CannedReplyProvider, LocalProvider, ReplyProvider};
use remote::{HttpRemoteStore, RemoteStore};
use services::{ConversationStore, MessageStore};
use ui::input_area::{parse_command, Command, HELP};
use ui::{chat_view, sidebar};

fn print_sidebar(app: &App) {
    let state = app.conversations().snapshot();
    print!(
        "{}",
        sidebar::render(&state, app.active_conversation(), Utc::now())
    );
}

fn print_thread(app: &App) {
    let state = app.messages().snapshot();
    let conversation = app
        .active_conversation()
        .and_then(|id| app.conversations().get(id));
    print!("{}", chat_view::render(&state, conversation.as_ref()));
}

/// Translate a sidebar position into a message for the app, or explain why
/// there is nothing at that position.
fn at_position(app: &App, position: usize, to_msg: impl FnOnce(i64) -> AppMsg) -> Option<AppMsg> {
    let conversations = app.conversations().conversations();
    match sidebar::id_at(&conversations, position) {
        Some(id) => Some(to_msg(id)),
        None => {
            println!("No conversation at position {position} (see /list)");
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env().context("Invalid configuration")?;
    tracing::info!(
        api = %config.remote.base_url,
        conversations = %config.remote.conversations_resource,
        messages = %config.remote.messages_resource,
        "starting {}",
        APP_NAME
    );

    let remote: Arc<dyn RemoteStore> = Arc::new(HttpRemoteStore::new(&config.remote));
    let replies: Arc<dyn ReplyProvider> = match config.reply {
        ReplyBackend::Canned { delay } => Arc::new(CannedReplyProvider::new(delay)),
        ReplyBackend::Local(local) => Arc::new(LocalProvider::new(local)),
    };
    tracing::info!(provider = replies.name(), "reply provider ready");

    let mut app = App::new(
        ConversationStore::new(remote.clone()),
        MessageStore::new(remote, replies),
    );

    // Show the typing indicator while a reply is being generated.
    let mut typing = app.messages().subscribe();
    tokio::spawn(async move {
        let mut was_typing = false;
        while typing.changed().await.is_ok() {
            let is_typing = typing.borrow_and_update().is_typing;
            if is_typing && !was_typing {
                println!("Assistant: Thinking...");
            }
            was_typing = is_typing;
        }
    });

    if let Some(notice) = app.init().await {
        println!("{notice}");
    }
    print_sidebar(&app);
    print_thread(&app);
    println!("Type /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        let msg = match command {
            Command::Empty => continue,
            Command::Quit => break,
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::List => {
                print_sidebar(&app);
                continue;
            }
            Command::New => Some(AppMsg::NewChat),
            Command::Refresh => Some(AppMsg::Refresh),
            Command::Send(text) => Some(AppMsg::SendMessage(text)),
            Command::Select(n) => at_position(&app, n, AppMsg::ConversationSelected),
            Command::Delete(n) => at_position(&app, n, AppMsg::DeleteConversation),
            Command::Rename(n, title) => {
                at_position(&app, n, |id| AppMsg::RenameConversation(id, title))
            }
        };
        let Some(msg) = msg else {
            continue;
        };

        let show_sidebar = matches!(
            msg,
            AppMsg::NewChat
                | AppMsg::DeleteConversation(_)
                | AppMsg::RenameConversation(..)
                | AppMsg::Refresh
        );

        if let Some(notice) = app.update(msg).await {
            println!("{notice}");
        }
        if show_sidebar {
            print_sidebar(&app);
        }
        print_thread(&app);
    }

    tracing::info!("exiting");
    Ok(())
}
