use crate::domain::Team;
use crate::use_cases::GameEvent;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

// Chat message relayed by the bot socket. Frames without `irc_username` are
// bot events, not chat.
#[derive(Debug, Deserialize)]
pub struct IrcMessage {
    #[serde(default)]
    pub irc_username: Option<String>,
    #[serde(default)]
    pub data: Option<IrcData>,
}

#[derive(Debug, Deserialize)]
pub struct IrcData {
    #[serde(rename = "message-text", default)]
    pub message_text: String,
    #[serde(default)]
    pub tags: IrcTags,
}

#[derive(Debug, Default, Deserialize)]
pub struct IrcTags {
    #[serde(rename = "display-name", default)]
    pub display_name: Option<String>,
    #[serde(rename = "badge-info", default)]
    pub badge_info: Option<String>,
}

/// Maps a chat message to a match event. Only `!boom` and `!me` count.
pub fn parse_command(msg: &IrcMessage) -> Option<GameEvent> {
    msg.irc_username.as_ref()?;
    let data = msg.data.as_ref()?;
    let text = data.message_text.as_str();
    if !text.starts_with('!') {
        return None;
    }

    let name = data.tags.display_name.as_deref()?.trim();
    if name.is_empty() {
        return None;
    }

    if text.starts_with("!boom") {
        Some(GameEvent::BoomTriggered {
            name: name.to_string(),
        })
    } else if text.starts_with("!me") {
        Some(GameEvent::PlayerJoined {
            name: name.to_string(),
            team_hint: data.tags.badge_info.as_deref().and_then(team_hint),
        })
    } else {
        None
    }
}

/// Team named by the `predictions/<team>` pair of a badge-info tag.
pub fn team_hint(badge_info: &str) -> Option<Team> {
    badge_info
        .split(',')
        .filter_map(|pair| pair.split_once('/'))
        .find(|(key, _)| *key == "predictions")
        .and_then(|(_, value)| Team::from_title(value))
}

#[derive(Debug)]
pub enum ChatClientError {
    Transport(tokio_tungstenite::tungstenite::Error),
    Closed,
    EventsClosed,
}

impl fmt::Display for ChatClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatClientError::Transport(err) => write!(f, "chat transport error: {err}"),
            ChatClientError::Closed => write!(f, "chat socket closed"),
            ChatClientError::EventsClosed => write!(f, "match event queue closed"),
        }
    }
}

impl std::error::Error for ChatClientError {}

// Reconnecting WebSocket client for the chat bot relay.
#[derive(Debug, Clone)]
pub struct ChatBotClient {
    endpoint: String,
    token: String,
    reconnect_delay: Duration,
}

impl ChatBotClient {
    pub fn new(
        base_url: &str,
        bot_name: &str,
        token: impl Into<String>,
        reconnect_delay: Duration,
    ) -> Self {
        Self {
            endpoint: chat_endpoint(base_url, bot_name),
            token: token.into(),
            reconnect_delay,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Forwards chat commands into `events_tx`, reconnecting after every
    /// disconnect, until the match stops accepting events.
    pub async fn run(self, events_tx: mpsc::Sender<GameEvent>) {
        loop {
            match self.session(&events_tx).await {
                Err(ChatClientError::EventsClosed) => {
                    info!("match event queue closed; chat bot stopping");
                    return;
                }
                Err(e) => {
                    warn!(error = %e, "chat bot disconnected; attempting reconnection shortly");
                }
                Ok(()) => {
                    warn!("chat bot session ended; attempting reconnection shortly");
                }
            }
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }

    async fn session(&self, events_tx: &mpsc::Sender<GameEvent>) -> Result<(), ChatClientError> {
        let (mut ws, _response) = connect_async(self.endpoint.as_str())
            .await
            .map_err(ChatClientError::Transport)?;
        info!(endpoint = %self.endpoint, "connected to chat bot");

        let hello = serde_json::json!({ "token": self.token }).to_string();
        ws.send(Message::Text(hello.into()))
            .await
            .map_err(ChatClientError::Transport)?;

        while let Some(frame) = ws.next().await {
            let text = match frame.map_err(ChatClientError::Transport)? {
                Message::Text(text) => text,
                Message::Close(_) => return Ok(()),
                _ => continue,
            };

            let msg = match serde_json::from_str::<IrcMessage>(text.as_str()) {
                Ok(msg) => msg,
                Err(e) => {
                    debug!(error = %e, "skipping unrecognized chat frame");
                    continue;
                }
            };

            if let Some(ev) = parse_command(&msg) {
                debug!(event = ?ev, "chat command");
                events_tx
                    .send(ev)
                    .await
                    .map_err(|_| ChatClientError::EventsClosed)?;
            }
        }

        Err(ChatClientError::Closed)
    }
}

fn chat_endpoint(base_url: &str, bot_name: &str) -> String {
    // http -> ws, https -> wss.
    let base = match base_url.strip_prefix("http") {
        Some(rest) => format!("ws{rest}"),
        None => base_url.to_string(),
    };
    format!("{}/ws/chat-bots/{}/", base.trim_end_matches('/'), bot_name)
}
