//! Playhead monitor
//!
//! One long-lived host call per session. The host answers only once the
//! playhead reaches the stop position; the answer itself carries nothing the
//! core uses. Completion (success or failure) is posted back to the
//! controller task tagged with the session it was started for.

use cueplay_common::api::MonitorRequest;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::host::{HostError, PlaybackHost};
use crate::session::SessionId;

/// Monitor call finished for `session`
#[derive(Debug)]
pub struct MonitorCompletion {
    pub session: SessionId,
    pub outcome: Result<(), HostError>,
}

pub struct PlayheadMonitor {
    host: Arc<dyn PlaybackHost>,
    completions: mpsc::UnboundedSender<MonitorCompletion>,
}

impl PlayheadMonitor {
    pub fn new(
        host: Arc<dyn PlaybackHost>,
        completions: mpsc::UnboundedSender<MonitorCompletion>,
    ) -> Self {
        Self { host, completions }
    }

    /// Single monitor round-trip
    pub async fn watch(host: &dyn PlaybackHost, stop_pos: f64) -> Result<(), HostError> {
        host.monitor_playhead(&MonitorRequest { stop_pos }).await
    }

    /// Run [`watch`](Self::watch) in the background and report completion
    ///
    /// The task is never cancelled; an explicit stop simply makes its
    /// completion stale.
    pub fn spawn(&self, session: SessionId, stop_pos: f64) -> JoinHandle<()> {
        let host = Arc::clone(&self.host);
        let completions = self.completions.clone();

        info!("Monitoring session {} until position {}", session, stop_pos);
        tokio::spawn(async move {
            let outcome = Self::watch(host.as_ref(), stop_pos).await;
            match &outcome {
                Ok(()) => debug!("Monitor for session {} completed", session),
                Err(e) => warn!("Monitor for session {} failed: {}", session, e),
            }
            if completions
                .send(MonitorCompletion { session, outcome })
                .is_err()
            {
                debug!("Controller gone, dropping monitor completion for {}", session);
            }
        })
    }
}
