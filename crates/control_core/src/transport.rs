use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use shared::protocol::{parse_line, split_frame, WriteCommand};
use tokio::{
    net::TcpStream,
    sync::{watch, Mutex},
    task::JoinHandle,
};
use tokio_tungstenite::{
    connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, info, trace, warn};
use url::Url;

use crate::{cache::ParameterCache, CommandSender};

type TciStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Syncing,
    Ready,
    Closed,
}

pub struct TciClient {
    writer: Mutex<SplitSink<TciStream, Message>>,
    state: watch::Receiver<ConnectionState>,
    reader: JoinHandle<()>,
}

impl TciClient {
    pub async fn connect(endpoint: &str, cache: Arc<ParameterCache>) -> Result<Self> {
        let url = Url::parse(endpoint).with_context(|| format!("invalid TCI url: {endpoint}"))?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(anyhow!("TCI url must start with ws:// or wss://"));
        }
        let (ws_stream, _) = connect_async(url.as_str())
            .await
            .with_context(|| format!("failed to connect to TCI server: {url}"))?;
        info!(%url, "tci: connected");

        let (writer, reader) = ws_stream.split();
        let (state_tx, state) = watch::channel(ConnectionState::Syncing);
        let reader = tokio::spawn(read_notifications(reader, cache, state_tx));

        Ok(Self {
            writer: Mutex::new(writer),
            state,
            reader,
        })
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub async fn ready(&self) -> Result<()> {
        let mut state = self.state.clone();
        let reached = state
            .wait_for(|s| *s != ConnectionState::Syncing)
            .await
            .map(|s| *s)
            .unwrap_or(ConnectionState::Closed);
        match reached {
            ConnectionState::Ready => Ok(()),
            _ => Err(anyhow!("TCI connection closed before the server was ready")),
        }
    }

    pub async fn closed(&self) {
        let mut state = self.state.clone();
        let _ = state.wait_for(|s| *s == ConnectionState::Closed).await;
    }

    pub async fn close(&self) -> Result<()> {
        self.writer
            .lock()
            .await
            .close()
            .await
            .context("failed to close TCI websocket")
    }
}

impl Drop for TciClient {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

#[async_trait]
impl CommandSender for TciClient {
    async fn send(&self, command: &WriteCommand) -> Result<()> {
        self.writer
            .lock()
            .await
            .send(Message::Text(command.to_wire()))
            .await
            .context("TCI websocket send failed")
    }
}

async fn read_notifications(
    mut reader: SplitStream<TciStream>,
    cache: Arc<ParameterCache>,
    state: watch::Sender<ConnectionState>,
) {
    while let Some(msg) = reader.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                for line in split_frame(&text) {
                    if line.eq_ignore_ascii_case("ready") {
                        info!(entries = cache.len(), "tci: server ready");
                        state.send_replace(ConnectionState::Ready);
                        continue;
                    }
                    match parse_line(line) {
                        Ok(Some(notification)) => cache.apply(notification),
                        Ok(None) => trace!(line, "tci: ignoring unhandled command"),
                        Err(err) => debug!(line, %err, "tci: malformed command"),
                    }
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                warn!(%err, "tci: websocket receive failed");
                break;
            }
        }
    }
    info!("tci: connection closed");
    state.send_replace(ConnectionState::Closed);
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
