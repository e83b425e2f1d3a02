use std::time::Duration;

use anyhow::{bail, Context, Result};
use url::Url;

pub const APP_NAME: &str = "chatline";

const DEFAULT_API_URL: &str = "http://localhost:8080/api";
const DEFAULT_CONVERSATIONS_RESOURCE: &str = "conversations";
const DEFAULT_MESSAGES_RESOURCE: &str = "messages";
const DEFAULT_REPLY_DELAY_MS: u64 = 1000;
const DEFAULT_LOCAL_URL: &str = "http://localhost:11434";
const DEFAULT_LOCAL_MODEL: &str = "llama3.2";

/// Where the remote store lives. Resource names are fixed per deployment.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: Url,
    pub conversations_resource: String,
    pub messages_resource: String,
}

#[derive(Clone)]
pub struct LocalConfig {
    pub base_url: Url,
    pub model: String,
    pub api_key: Option<String>,
    pub system_prompt: Option<String>,
}

impl std::fmt::Debug for LocalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalConfig")
            .field("base_url", &self.base_url.as_str())
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("system_prompt", &self.system_prompt)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum ReplyBackend {
    Canned { delay: Duration },
    Local(LocalConfig),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub remote: RemoteConfig,
    pub reply: ReplyBackend,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = var("CHATLINE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let remote = RemoteConfig {
            base_url: parse_base_url("CHATLINE_API_URL", &api_url)?,
            conversations_resource: var("CHATLINE_CONVERSATIONS_RESOURCE")
                .unwrap_or_else(|| DEFAULT_CONVERSATIONS_RESOURCE.to_string()),
            messages_resource: var("CHATLINE_MESSAGES_RESOURCE")
                .unwrap_or_else(|| DEFAULT_MESSAGES_RESOURCE.to_string()),
        };

        let backend = var("CHATLINE_REPLY_BACKEND").unwrap_or_else(|| "canned".to_string());
        let reply = match backend.trim().to_ascii_lowercase().as_str() {
            "canned" => {
                let delay_ms = match var("CHATLINE_REPLY_DELAY_MS") {
                    Some(raw) => raw
                        .trim()
                        .parse::<u64>()
                        .with_context(|| format!("CHATLINE_REPLY_DELAY_MS is not a number: {raw}"))?,
                    None => DEFAULT_REPLY_DELAY_MS,
                };
                ReplyBackend::Canned {
                    delay: Duration::from_millis(delay_ms),
                }
            }
            "local" => {
                let base =
                    var("CHATLINE_LOCAL_BASE_URL").unwrap_or_else(|| DEFAULT_LOCAL_URL.to_string());
                ReplyBackend::Local(LocalConfig {
                    base_url: parse_base_url("CHATLINE_LOCAL_BASE_URL", &base)?,
                    model: var("CHATLINE_LOCAL_MODEL")
                        .unwrap_or_else(|| DEFAULT_LOCAL_MODEL.to_string()),
                    api_key: var("CHATLINE_LOCAL_API_KEY"),
                    system_prompt: var("CHATLINE_SYSTEM_PROMPT"),
                })
            }
            other => bail!("Unknown CHATLINE_REPLY_BACKEND '{other}' (expected 'canned' or 'local')"),
        };

        Ok(Self { remote, reply })
    }
}

fn parse_base_url(key: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("{key} is not a valid URL: {raw}"))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        bail!("{key} must be an http(s) URL: {raw}");
    }
    Ok(url)
}
