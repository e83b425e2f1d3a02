use thiserror::Error;

/// A line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New,
    List,
    Select(usize),
    Rename(usize, String),
    Delete(usize),
    Refresh,
    Help,
    Quit,
    Send(String),
    Empty,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: /{0} (try /help)")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

pub const HELP: &str = "\
Commands:
  /new                 start a new conversation
  /list                show conversations
  /select <n>          open conversation n
  /rename <n> <title>  rename conversation n
  /delete <n>          delete conversation n
  /refresh             reload conversations and messages
  /help                show this help
  /quit                exit
Anything else is sent as a message.";

fn position(arg: Option<&str>, usage: &'static str) -> Result<usize, CommandError> {
    arg.and_then(|a| a.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .ok_or(CommandError::Usage(usage))
}

/// Parse one input line. Message text is passed through untouched so that
/// leading whitespace and inner newlines survive.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(Command::Empty);
    }

    let Some(rest) = trimmed.strip_prefix('/') else {
        return Ok(Command::Send(line.trim_end_matches(['\r', '\n']).to_string()));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };
    let mut words = args.split_whitespace();

    match name {
        "new" => Ok(Command::New),
        "list" | "ls" => Ok(Command::List),
        "select" | "open" => Ok(Command::Select(position(words.next(), "/select <n>")?)),
        "delete" | "rm" => Ok(Command::Delete(position(words.next(), "/delete <n>")?)),
        "rename" => {
            let usage = "/rename <n> <title>";
            let (n, title) = args.split_once(char::is_whitespace).ok_or(CommandError::Usage(usage))?;
            Ok(Command::Rename(position(Some(n), usage)?, title.trim().to_string()))
        }
        "refresh" => Ok(Command::Refresh),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}
