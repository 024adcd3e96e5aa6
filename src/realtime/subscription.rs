//! Match notification subscription.
//!
//! One subscription per identity. It connects to the Socket.IO server with
//! `user=<identity>` in the handshake query and reports `match` events
//! through a callback. The first connection is retried here with capped
//! backoff, for as long as the subscription lives; later drops are
//! reconnected by the client itself. Dropping the subscription disconnects
//! the client, so a new identity never leaves the previous socket behind.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use reqwest::Url;
use rust_socketio::asynchronous::{Client, ClientBuilder};
use rust_socketio::{Event, Payload, TransportType};
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::error::{RealtimeError, Result};
use crate::api::Dev;
use crate::config::Config;

/// Name of the event carrying a mutual match.
pub const MATCH_EVENT: &str = "match";

/// Base delay between reconnection attempts in milliseconds.
const RECONNECT_DELAY_MS: u64 = 1000;

/// What the subscription reports to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum RealtimeEvent {
    /// The namespace connection was confirmed.
    Connected,
    /// A match was pushed.
    Match(Dev),
    /// Not connected right now; a reconnect follows.
    Disconnected(String),
    /// The server reported an error on the channel.
    Error(String),
    /// The subscription could not be started.
    GaveUp(String),
}

/// Connection tuning.
#[derive(Debug, Clone)]
pub struct SubscriptionOptions {
    /// Time allowed for each connection attempt.
    pub connect_timeout: Duration,
    /// Cap for the exponential backoff between attempts.
    pub max_reconnect_delay: Duration,
}

impl Default for SubscriptionOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            max_reconnect_delay: Duration::from_secs(30),
        }
    }
}

impl SubscriptionOptions {
    /// Build options from the application configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            connect_timeout: Duration::from_secs(config.settings.request_timeout_secs.max(1)),
            max_reconnect_delay: Duration::from_secs(
                config.settings.max_reconnect_delay_secs.max(1),
            ),
        }
    }
}

type EventSink = Arc<dyn Fn(RealtimeEvent) + Send + Sync>;

/// A live subscription to match events for one identity.
pub struct MatchSubscription {
    user: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl std::fmt::Debug for MatchSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchSubscription")
            .field("user", &self.user)
            .field("finished", &self.handle.is_finished())
            .finish()
    }
}

impl MatchSubscription {
    /// Start a subscription on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `RealtimeError::InvalidUrl` if `realtime_url` is not http(s) or
    /// ws(s). Connection failures are reported through `on_event` instead.
    pub fn spawn<F>(
        realtime_url: &str,
        user: &str,
        options: SubscriptionOptions,
        on_event: F,
    ) -> Result<Self>
    where
        F: Fn(RealtimeEvent) + Send + Sync + 'static,
    {
        let url = socket_url(realtime_url, user)?;
        let sink: EventSink = Arc::new(on_event);
        let (shutdown, stop) = oneshot::channel();
        info!(user, "Subscribing to match events");
        let handle = tokio::spawn(run(url, options, sink, stop));

        Ok(Self {
            user: user.to_string(),
            shutdown: Some(shutdown),
            handle,
        })
    }

    /// The identity this subscription is keyed by.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Whether the socket task has stopped.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop listening.
    pub fn unsubscribe(self) {
        // Drop does the work.
    }
}

impl Drop for MatchSubscription {
    fn drop(&mut self) {
        debug!(user = %self.user, "Unsubscribing from match events");
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// Build the Socket.IO endpoint for a user.
///
/// `ws://host:3333` becomes `http://host:3333/socket.io/?user=<user>`. The
/// client adds the Engine.IO query parameters itself.
pub fn socket_url(base: &str, user: &str) -> Result<Url> {
    let mut url = Url::parse(base.trim())
        .map_err(|e| RealtimeError::InvalidUrl(format!("{}: {}", base, e)))?;

    let scheme = match url.scheme() {
        "http" | "ws" => "http",
        "https" | "wss" => "https",
        other => {
            return Err(RealtimeError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                other
            )))
        }
    };
    url.set_scheme(scheme)
        .map_err(|_| RealtimeError::InvalidUrl(base.to_string()))?;

    let path = format!("{}/socket.io/", url.path().trim_end_matches('/'));
    url.set_path(&path);
    url.query_pairs_mut().clear().append_pair("user", user);

    Ok(url)
}

/// Connect, then hold the client until the owner lets go.
async fn run(
    url: Url,
    options: SubscriptionOptions,
    on_event: EventSink,
    mut stop: oneshot::Receiver<()>,
) {
    let client = tokio::select! {
        client = connect_with_retry(&url, &options, &on_event) => client,
        _ = &mut stop => return,
    };
    let Some(client) = client else {
        return;
    };

    // A dropped sender resolves this as well.
    let _ = stop.await;
    if let Err(e) = client.disconnect().await {
        debug!(error = %e, "Realtime disconnect failed");
    }
}

/// Keep trying until a connection is made or the error is permanent.
async fn connect_with_retry(
    url: &Url,
    options: &SubscriptionOptions,
    on_event: &EventSink,
) -> Option<Client> {
    let mut attempt: u32 = 0;
    loop {
        match connect(url, options, on_event).await {
            Ok(client) => return Some(client),
            Err(e) if !e.is_retryable() => {
                warn!(error = %e, "Realtime subscription stopped");
                on_event(RealtimeEvent::GaveUp(e.to_string()));
                return None;
            }
            Err(e) => {
                attempt = attempt.saturating_add(1);
                warn!(error = %e, attempt, "Realtime connection failed");
                on_event(RealtimeEvent::Disconnected(e.to_string()));

                let delay = reconnect_delay(attempt, options.max_reconnect_delay);
                debug!("Reconnecting in {}ms", delay.as_millis());
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[instrument(skip_all, fields(url = %url))]
async fn connect(url: &Url, options: &SubscriptionOptions, on_event: &EventSink) -> Result<Client> {
    let max_delay_ms = u64::try_from(options.max_reconnect_delay.as_millis()).unwrap_or(u64::MAX);
    let builder = ClientBuilder::new(url.as_str())
        .transport_type(TransportType::Websocket)
        .reconnect(true)
        .reconnect_on_disconnect(true)
        .reconnect_delay(RECONNECT_DELAY_MS, max_delay_ms.max(RECONNECT_DELAY_MS))
        .on(Event::Connect, forward(on_event, |_| Some(RealtimeEvent::Connected)))
        .on(
            Event::Close,
            forward(on_event, |_| {
                Some(RealtimeEvent::Disconnected("connection closed".to_string()))
            }),
        )
        .on(
            Event::Error,
            forward(on_event, |payload| Some(RealtimeEvent::Error(payload_text(payload)))),
        )
        .on(MATCH_EVENT, forward(on_event, match_from_payload));

    let client = tokio::time::timeout(options.connect_timeout, builder.connect())
        .await
        .map_err(|_| RealtimeError::ConnectTimeout)??;
    debug!("Socket.IO client connected");
    Ok(client)
}

/// Adapt a payload mapping into a client callback reporting to `on_event`.
fn forward(
    on_event: &EventSink,
    map: fn(Payload) -> Option<RealtimeEvent>,
) -> impl FnMut(Payload, Client) -> BoxFuture<'static, ()> + Send + Sync + 'static {
    let on_event = Arc::clone(on_event);
    move |payload: Payload, _socket: Client| {
        if let Some(event) = map(payload) {
            on_event(event);
        }
        async {}.boxed()
    }
}

/// Decode the first argument of a `match` event.
fn match_from_payload(payload: Payload) -> Option<RealtimeEvent> {
    let Payload::Text(args) = payload else {
        warn!("Match event without a JSON payload");
        return None;
    };
    let first = args.into_iter().next().unwrap_or(Value::Null);
    match serde_json::from_value::<Dev>(first) {
        Ok(dev) => Some(RealtimeEvent::Match(dev)),
        Err(e) => {
            warn!(error = %e, "Match event with an invalid payload");
            None
        }
    }
}

fn payload_text(payload: Payload) -> String {
    match payload {
        Payload::Text(values) => values
            .iter()
            .map(|value| match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" "),
        other => format!("{:?}", other),
    }
}

/// Exponential backoff, capped.
fn reconnect_delay(attempt: u32, max: Duration) -> Duration {
    let millis = RECONNECT_DELAY_MS.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
    Duration::from_millis(millis).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_socket_url_from_http() {
        let url = socket_url("http://localhost:3333", "u1").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3333/socket.io/?user=u1");
    }

    #[test]
    fn test_socket_url_from_wss_with_path() {
        let url = socket_url("wss://example.com/api/", "u 1").unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/socket.io/?user=u+1");
    }

    #[test]
    fn test_socket_url_rejects_other_schemes() {
        assert!(matches!(
            socket_url("ftp://example.com", "u1"),
            Err(RealtimeError::InvalidUrl(_))
        ));
        assert!(socket_url("not a url", "u1").is_err());
    }

    #[test]
    fn test_reconnect_delay_backoff() {
        let max = Duration::from_secs(30);
        assert_eq!(reconnect_delay(1, max), Duration::from_secs(1));
        assert_eq!(reconnect_delay(2, max), Duration::from_secs(2));
        assert_eq!(reconnect_delay(3, max), Duration::from_secs(4));
        assert_eq!(reconnect_delay(10, max), max);
        assert_eq!(reconnect_delay(u32::MAX, max), max);
    }

    #[test]
    fn test_match_payload_decoding() {
        assert_eq!(
            match_from_payload(Payload::Text(vec![json!({"_id": "b", "name": "B"})])),
            Some(RealtimeEvent::Match(Dev::new("b", "B")))
        );
        assert_eq!(match_from_payload(Payload::Text(vec![json!("garbage")])), None);
        assert_eq!(match_from_payload(Payload::Text(Vec::new())), None);
    }

    #[test]
    fn test_payload_text() {
        assert_eq!(
            payload_text(Payload::Text(vec![json!("Not authorized")])),
            "Not authorized"
        );
        assert_eq!(
            payload_text(Payload::Text(vec![json!({"message": "no"})])),
            r#"{"message":"no"}"#
        );
    }
}
