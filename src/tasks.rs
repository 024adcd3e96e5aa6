//! Async task management for non-blocking network operations.
//!
//! The UI never awaits. It records what it needs as `Request`s; the main loop
//! hands them to a `TaskRunner`, which spawns tokio tasks that report back
//! through an unbounded channel of `ApiMessage`s. The main loop drains that
//! channel with `try_recv()` between frames.
//!
//! # Adding New Task Types
//!
//! 1. Add a `Request` variant describing the work
//! 2. Add an `ApiMessage` variant for the result
//! 3. Add a spawn method to `TaskSpawner` and route it in `TaskRunner::dispatch`
//! 4. Handle the message in `App::handle_message`

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{ApiError, Decision, Dev, DevsClient};
use crate::config::Config;
use crate::error::AppError;
use crate::realtime::{MatchSubscription, RealtimeEvent, SubscriptionOptions};

/// Work the UI asks the background to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Fetch the candidate queue for a user.
    LoadDevs { user: String },
    /// Send a like or dislike. Nobody waits for the outcome.
    Decide {
        user: String,
        dev_id: String,
        decision: Decision,
    },
    /// Sign in with a GitHub username.
    Register { username: String },
    /// Open the match channel for a user, replacing any open one.
    Subscribe { user: String },
    /// Close the match channel.
    Unsubscribe,
    /// Open a URL in the system browser.
    OpenUrl { url: String },
}

/// Messages sent from background tasks to the main event loop.
#[derive(Debug)]
pub enum ApiMessage {
    /// Candidate queue fetched.
    DevsLoaded {
        user: String,
        result: Result<Vec<Dev>, ApiError>,
    },

    /// A like/dislike request finished.
    DecisionRecorded {
        dev_id: String,
        decision: Decision,
        result: Result<(), ApiError>,
    },

    /// Sign-in finished.
    Registered(Result<Dev, ApiError>),

    /// Something happened on the match channel.
    Realtime { user: String, event: RealtimeEvent },
}

/// Spawns background tasks that report through the channel.
#[derive(Clone)]
pub struct TaskSpawner {
    tx: mpsc::UnboundedSender<ApiMessage>,
}

impl TaskSpawner {
    /// Create a new TaskSpawner with the given channel sender.
    pub fn new(tx: mpsc::UnboundedSender<ApiMessage>) -> Self {
        Self { tx }
    }

    /// Spawn a task to fetch the candidate queue.
    pub fn spawn_load_devs(&self, client: &DevsClient, user: String) {
        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let result = client.list_devs(&user).await;
            let _ = tx.send(ApiMessage::DevsLoaded { user, result });
        });
    }

    /// Spawn a fire-and-forget like/dislike.
    pub fn spawn_decide(
        &self,
        client: &DevsClient,
        user: String,
        dev_id: String,
        decision: Decision,
    ) {
        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let result = client.decide(&user, &dev_id, decision).await;
            if let Err(e) = &result {
                warn!(dev_id = %dev_id, %decision, error = %e, "Decision request failed");
            }
            let _ = tx.send(ApiMessage::DecisionRecorded {
                dev_id,
                decision,
                result,
            });
        });
    }

    /// Spawn a sign-in.
    pub fn spawn_register(&self, client: &DevsClient, username: String) {
        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let result = client.register(&username).await;
            let _ = tx.send(ApiMessage::Registered(result));
        });
    }

    /// Open a URL with the platform opener off the UI thread.
    pub fn spawn_open_url(&self, url: String) {
        tokio::task::spawn_blocking(move || {
            if let Err(e) = open::that(&url) {
                warn!(%url, error = %e, "Could not open URL");
            }
        });
    }

    /// Open a match subscription whose events are forwarded to the channel.
    pub fn subscribe(
        &self,
        realtime_url: &str,
        user: String,
        options: SubscriptionOptions,
    ) -> Option<MatchSubscription> {
        let tx = self.tx.clone();
        let tagged_user = user.clone();
        let forward = move |event: RealtimeEvent| {
            let _ = tx.send(ApiMessage::Realtime {
                user: tagged_user.clone(),
                event,
            });
        };

        match MatchSubscription::spawn(realtime_url, &user, options, forward) {
            Ok(subscription) => Some(subscription),
            Err(e) => {
                warn!(error = %e, "Could not start match subscription");
                let _ = self.tx.send(ApiMessage::Realtime {
                    user,
                    event: RealtimeEvent::GaveUp(AppError::from(e).user_message()),
                });
                None
            }
        }
    }
}

/// Executes `Request`s and owns the long-lived match subscription.
pub struct TaskRunner {
    spawner: TaskSpawner,
    client: DevsClient,
    realtime_url: String,
    options: SubscriptionOptions,
    subscription: Option<MatchSubscription>,
}

impl TaskRunner {
    /// Create a runner for the configured endpoints.
    pub fn new(spawner: TaskSpawner, client: DevsClient, config: &Config) -> Self {
        Self {
            spawner,
            client,
            realtime_url: config.server.realtime_url.clone(),
            options: SubscriptionOptions::from_config(config),
            subscription: None,
        }
    }

    /// Start the work a request describes.
    pub fn dispatch(&mut self, request: Request) {
        debug!(?request, "Dispatching request");
        match request {
            Request::LoadDevs { user } => self.spawner.spawn_load_devs(&self.client, user),
            Request::Decide {
                user,
                dev_id,
                decision,
            } => self
                .spawner
                .spawn_decide(&self.client, user, dev_id, decision),
            Request::Register { username } => self.spawner.spawn_register(&self.client, username),
            Request::Subscribe { user } => {
                // Drop the previous identity's socket before opening a new one.
                self.subscription = None;
                self.subscription =
                    self.spawner
                        .subscribe(&self.realtime_url, user, self.options.clone());
            }
            Request::Unsubscribe => {
                if let Some(subscription) = self.subscription.take() {
                    subscription.unsubscribe();
                }
            }
            Request::OpenUrl { url } => self.spawner.spawn_open_url(url),
        }
    }

    /// The identity of the open subscription, if any.
    pub fn subscribed_user(&self) -> Option<&str> {
        self.subscription.as_ref().map(MatchSubscription::user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn create_test_runner() -> (TaskRunner, mpsc::UnboundedReceiver<ApiMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut config = Config::default();
        // Nothing listens here; connections fail fast and are retried.
        config.server.api_url = "http://127.0.0.1:9".to_string();
        config.server.realtime_url = "http://127.0.0.1:9".to_string();
        let client = DevsClient::from_config(&config).unwrap();
        (TaskRunner::new(TaskSpawner::new(tx), client, &config), rx)
    }

    #[tokio::test]
    async fn test_subscribe_replaces_previous_identity() {
        let (mut runner, _rx) = create_test_runner();

        runner.dispatch(Request::Subscribe {
            user: "u1".to_string(),
        });
        assert_eq!(runner.subscribed_user(), Some("u1"));

        runner.dispatch(Request::Subscribe {
            user: "u2".to_string(),
        });
        assert_eq!(runner.subscribed_user(), Some("u2"));

        runner.dispatch(Request::Unsubscribe);
        assert_eq!(runner.subscribed_user(), None);
    }

    #[tokio::test]
    async fn test_invalid_realtime_url_reports_gave_up() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let spawner = TaskSpawner::new(tx);

        let subscription = spawner.subscribe(
            "ftp://example.com",
            "u1".to_string(),
            SubscriptionOptions::default(),
        );
        assert!(subscription.is_none());

        match rx.recv().await {
            Some(ApiMessage::Realtime {
                user,
                event: RealtimeEvent::GaveUp(reason),
            }) => {
                assert_eq!(user, "u1");
                assert_eq!(reason, "The realtime URL in the configuration is invalid.");
            }
            other => panic!("Expected GaveUp, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_decision_is_reported() {
        let (mut runner, mut rx) = create_test_runner();

        runner.dispatch(Request::Decide {
            user: "u1".to_string(),
            dev_id: "a".to_string(),
            decision: Decision::Like,
        });

        let message = tokio::time::timeout(Duration::from_secs(10), rx.recv())
            .await
            .expect("decision result in time");
        match message {
            Some(ApiMessage::DecisionRecorded {
                dev_id,
                decision,
                result,
            }) => {
                assert_eq!(dev_id, "a");
                assert_eq!(decision, Decision::Like);
                assert!(result.is_err());
            }
            other => panic!("Expected DecisionRecorded, got {:?}", other),
        }
    }
}
