// Action requests
//
// Some device commands (disconnect / connect the WAN link) are triggered by
// a GET that the device answers with a pending marker until the action has
// actually started. The executor re-requests the URL until the body changes.
// Fire-and-forget actions run on tracked background tasks, bounded by a
// semaphore, and report failures to an injected error sink.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio_util::task::TaskTracker;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::Error;
use crate::transport::Transport;

/// Delay before each poll of an action URL.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Body the device returns while an action is still pending.
pub const PENDING_SENTINEL: &str = "done:0";

/// Default cap on concurrently running fire-and-forget actions.
pub const DEFAULT_MAX_BACKGROUND: usize = 8;

/// How the caller waits for an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionMode {
    /// Poll on the caller's task and return once the device moves on.
    Blocking,
    /// Poll on a background task; the caller gets `Ok(())` immediately.
    FireAndForget,
}

/// One device action to trigger and poll.
#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub url: Url,
    pub poll_interval: Duration,
    pub pending_sentinel: String,
    pub mode: ActionMode,
}

impl ActionRequest {
    /// A blocking request with the default poll interval and sentinel.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            poll_interval: DEFAULT_POLL_INTERVAL,
            pending_sentinel: PENDING_SENTINEL.into(),
            mode: ActionMode::Blocking,
        }
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn pending_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.pending_sentinel = sentinel.into();
        self
    }

    pub fn fire_and_forget(mut self) -> Self {
        self.mode = ActionMode::FireAndForget;
        self
    }
}

/// Receives errors from fire-and-forget actions, which have no caller
/// left to return them to.
pub type ErrorSink = Arc<dyn Fn(&ActionRequest, &Error) + Send + Sync>;

/// The default sink: log and drop.
pub fn log_error_sink() -> ErrorSink {
    Arc::new(|request: &ActionRequest, err: &Error| {
        warn!(path = request.url.path(), error = %err, "background action failed");
    })
}

/// Executes [`ActionRequest`]s against a [`Transport`].
///
/// Cheaply cloneable; clones share the background task set and its limit.
#[derive(Clone)]
pub struct ActionExecutor {
    transport: Arc<dyn Transport>,
    tracker: TaskTracker,
    permits: Arc<Semaphore>,
    sink: ErrorSink,
}

impl ActionExecutor {
    pub fn new(transport: Arc<dyn Transport>, max_background: usize) -> Self {
        Self {
            transport,
            tracker: TaskTracker::new(),
            permits: Arc::new(Semaphore::new(max_background.max(1))),
            sink: log_error_sink(),
        }
    }

    /// Replace the sink that receives fire-and-forget failures.
    pub fn with_error_sink(mut self, sink: ErrorSink) -> Self {
        self.sink = sink;
        self
    }

    /// Run an action in the request's mode.
    ///
    /// In blocking mode transport errors are returned. In fire-and-forget
    /// mode this returns `Ok(())` right away and any error goes to the sink.
    pub async fn execute(&self, request: ActionRequest) -> Result<(), Error> {
        match request.mode {
            ActionMode::Blocking => {
                poll_until_changed(self.transport.as_ref(), &request).await?;
                Ok(())
            }
            ActionMode::FireAndForget => {
                self.spawn(request);
                Ok(())
            }
        }
    }

    /// Wait until every background action spawned so far has finished.
    pub async fn wait_idle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Number of background actions still running or waiting for a permit.
    pub fn background_len(&self) -> usize {
        self.tracker.len()
    }

    fn spawn(&self, request: ActionRequest) {
        let transport = Arc::clone(&self.transport);
        let permits = Arc::clone(&self.permits);
        let sink = Arc::clone(&self.sink);

        debug!(path = request.url.path(), "spawning background action");
        self.tracker.spawn(async move {
            // The semaphore is never closed.
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            if let Err(err) = poll_until_changed(transport.as_ref(), &request).await {
                sink(&request, &err);
            }
        });
    }
}

impl std::fmt::Debug for ActionExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionExecutor")
            .field("background", &self.tracker.len())
            .field("available_permits", &self.permits.available_permits())
            .finish_non_exhaustive()
    }
}

/// GET, compare; sleep and repeat while the body equals the pending sentinel.
///
/// The trigger request goes out immediately. Returns the number of polls
/// made. Each poll's response is dropped before the next sleep.
async fn poll_until_changed(transport: &dyn Transport, request: &ActionRequest) -> Result<u32, Error> {
    let mut polls: u32 = 0;
    loop {
        if polls > 0 {
            tokio::time::sleep(request.poll_interval).await;
        }

        let body = transport.get(&request.url).await?;
        polls += 1;

        if joined_lines(&body) != request.pending_sentinel {
            debug!(path = request.url.path(), polls, "action progressed");
            return Ok(polls);
        }
        trace!(path = request.url.path(), polls, "action pending");
    }
}

/// The body with line terminators removed.
fn joined_lines(body: &str) -> String {
    body.lines().collect()
}
