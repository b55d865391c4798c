//! Live chat ingestion: an unbounded, cancellable poll loop over a broadcast's chat feed.

use crate::config::ChatPollerConfig;
use crate::error::{Result, require};
use crate::youtube_api::chat::{LiveChatMessage, LiveChatMessageListResponse};
use crate::youtube_api::{AccessToken, YouTubeClient};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::instrument;

/// One chat message as handed to a [`ChatSink`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChatMessage {
    /// Display name of the message author.
    pub author: String,
    /// The message as it should be displayed. Empty for messages that are being deleted.
    pub text: String,
}

impl From<LiveChatMessage> for ChatMessage {
    fn from(message: LiveChatMessage) -> Self {
        Self {
            author: message.author_details.display_name,
            text: message.snippet.display_message.unwrap_or_default(),
        }
    }
}

/// The sink can no longer accept messages, e.g. because its receiving end was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("chat sink is closed")]
pub struct SinkClosed;

/// Receives chat messages in the order the feed returned them.
///
/// Sinks only ever append; the poller never redelivers a message it has already handed over.
/// Once a sink reports [`SinkClosed`], the poller delivers nothing further and stops.
pub trait ChatSink: Send {
    fn deliver(&mut self, message: ChatMessage) -> std::result::Result<(), SinkClosed>;
}

impl ChatSink for Vec<ChatMessage> {
    fn deliver(&mut self, message: ChatMessage) -> std::result::Result<(), SinkClosed> {
        self.push(message);
        Ok(())
    }
}

impl ChatSink for Arc<Mutex<Vec<ChatMessage>>> {
    fn deliver(&mut self, message: ChatMessage) -> std::result::Result<(), SinkClosed> {
        // A poisoned lock still holds every message delivered so far.
        let mut messages = self.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        messages.push(message);
        Ok(())
    }
}

impl ChatSink for mpsc::UnboundedSender<ChatMessage> {
    fn deliver(&mut self, message: ChatMessage) -> std::result::Result<(), SinkClosed> {
        self.send(message).map_err(|_| SinkClosed)
    }
}

impl<S: ChatSink + ?Sized> ChatSink for &mut S {
    fn deliver(&mut self, message: ChatMessage) -> std::result::Result<(), SinkClosed> {
        (**self).deliver(message)
    }
}

/// Where the poll loop is in a chat feed.
///
/// A cursor is never edited in place: each fetched page yields a fresh cursor via
/// [`ChatCursor::after_page`], and the next fetch must use exactly that cursor's page token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCursor {
    page_token: Option<String>,
    polling_interval: Duration,
}

impl ChatCursor {
    /// The cursor before the first fetch: no page token.
    pub fn start(default_polling_interval: Duration) -> Self {
        Self {
            page_token: None,
            polling_interval: default_polling_interval,
        }
    }

    /// The cursor that follows `page`, falling back to `default_polling_interval` when the
    /// server gave no interval hint.
    pub fn after_page(
        page: &LiveChatMessageListResponse,
        default_polling_interval: Duration,
    ) -> Self {
        Self {
            page_token: page.next_page_token.clone(),
            polling_interval: page
                .polling_interval_millis
                .map(Duration::from_millis)
                .unwrap_or(default_polling_interval),
        }
    }

    /// Token to send with the next fetch, if any.
    pub fn page_token(&self) -> Option<&str> {
        self.page_token.as_deref()
    }

    /// How long to wait before the next fetch.
    pub fn polling_interval(&self) -> Duration {
        self.polling_interval
    }
}

/// Looks up the ID of a broadcast's live chat.
///
/// Fails with [`crate::Error::NotFound`] if the broadcast does not exist or has no live chat.
#[instrument(skip(yt, token), ret, err)]
pub async fn resolve_live_chat_id(
    yt: &YouTubeClient,
    token: &AccessToken,
    broadcast_id: &str,
) -> Result<String> {
    let broadcast = yt.get_live_broadcast(token, broadcast_id).await?;
    require(
        broadcast.snippet.and_then(|snippet| snippet.live_chat_id),
        "snippet.liveChatId",
    )
}

/// Polls the live chat of `broadcast_id` until cancelled, until the sink closes, or until a
/// fetch fails.
///
/// Each page of messages is delivered to `sink` in full and in order before the loop sleeps for
/// the server's polling interval. Setting `cancel` to `true`, or dropping its sender, ends the
/// loop at the next suspension point: immediately if it is sleeping, or right after the page
/// currently being fetched has been delivered. Cancellation returns `Ok(())`, and so does a sink
/// that reports [`SinkClosed`]; the loop stops without fetching again.
///
/// A failed fetch is not retried; the error ends the loop and is returned.
///
/// At most one poller may run per broadcast at a time.
#[instrument(skip(yt, token, sink, config, cancel), err)]
pub async fn poll_live_chat<S: ChatSink>(
    yt: &YouTubeClient,
    token: &AccessToken,
    broadcast_id: &str,
    mut sink: S,
    config: &ChatPollerConfig,
    mut cancel: watch::Receiver<bool>,
) -> Result<()> {
    tracing::info!("chat poll start");
    let live_chat_id = resolve_live_chat_id(yt, token, broadcast_id).await?;

    let mut cursor = ChatCursor::start(config.default_polling_interval);
    loop {
        if is_cancelled(&cancel) {
            break;
        }

        let page = yt
            .list_live_chat_messages(token, &live_chat_id, cursor.page_token(), config.page_size)
            .await?;

        let next = ChatCursor::after_page(&page, config.default_polling_interval);
        for message in page.items {
            let message = ChatMessage::from(message);
            tracing::info!("[{}] {}", message.author, message.text);
            if sink.deliver(message).is_err() {
                tracing::info!("chat sink closed, stopping chat poll");
                return Ok(());
            }
        }
        cursor = next;

        tracing::trace!(
            page_token = ?cursor.page_token(),
            interval_ms = cursor.polling_interval().as_millis() as u64,
            "waiting for next chat poll"
        );
        tokio::select! {
            _ = tokio::time::sleep(cursor.polling_interval()) => {}
            _ = cancelled(&mut cancel) => break,
        }
    }

    tracing::info!("chat poll cancelled");
    Ok(())
}

fn is_cancelled(cancel: &watch::Receiver<bool>) -> bool {
    *cancel.borrow() || cancel.has_changed().is_err()
}

/// Resolves once cancellation is requested or the sender is dropped.
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    let _ = cancel.wait_for(|cancelled| *cancelled).await;
}

/// A chat poll loop running on its own tokio task.
///
/// Dropping the handle cancels the loop.
#[derive(Debug)]
pub struct ChatPoller {
    broadcast_id: String,
    cancel: watch::Sender<bool>,
    task: JoinHandle<Result<()>>,
}

impl ChatPoller {
    /// Starts polling the live chat of `broadcast_id` in the background.
    ///
    /// Must be called from within a tokio runtime. Returns immediately.
    pub fn spawn<S>(
        yt: YouTubeClient,
        token: AccessToken,
        broadcast_id: impl Into<String>,
        sink: S,
        config: ChatPollerConfig,
    ) -> Self
    where
        S: ChatSink + 'static,
    {
        let broadcast_id = broadcast_id.into();
        let (cancel, cancel_rx) = watch::channel(false);
        let task = tokio::spawn({
            let broadcast_id = broadcast_id.clone();
            async move {
                poll_live_chat(&yt, &token, &broadcast_id, sink, &config, cancel_rx).await
            }
        });

        Self {
            broadcast_id,
            cancel,
            task,
        }
    }

    pub fn broadcast_id(&self) -> &str {
        &self.broadcast_id
    }

    /// Asks the loop to stop. Does not wait for it to do so.
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    /// Whether the loop has ended, through cancellation or failure.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the loop to end and returns its outcome.
    ///
    /// # Panics
    ///
    /// Resumes the panic if the poll task panicked.
    pub async fn join(self) -> Result<()> {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            // The task is only aborted by the runtime shutting down.
            Err(_) => Ok(()),
        }
    }

    /// Cancels the loop and waits for it to end.
    pub async fn shutdown(self) -> Result<()> {
        self.cancel();
        self.join().await
    }
}
