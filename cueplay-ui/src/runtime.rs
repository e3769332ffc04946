//! Controller task
//!
//! A single tokio task owns the [`SessionController`]. HTTP handlers reach it
//! through a cloneable [`ControllerHandle`] (mpsc command + oneshot reply);
//! monitor completions arrive on their own channel. Both are handled one at a
//! time, so an explicit stop is always fully applied before any later monitor
//! completion is looked at.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::controller::{SessionController, SessionSnapshot};
use crate::error::{ControllerError, Result};
use crate::monitor::MonitorCompletion;
use crate::session::SessionId;

const COMMAND_CAPACITY: usize = 32;

enum Command {
    Load(oneshot::Sender<Result<usize>>),
    Select(usize, oneshot::Sender<Result<()>>),
    Play(oneshot::Sender<Result<SessionId>>),
    Stop(oneshot::Sender<Result<Option<SessionId>>>),
    Snapshot(oneshot::Sender<SessionSnapshot>),
}

/// Front door to the controller task
#[derive(Clone)]
pub struct ControllerHandle {
    tx: mpsc::Sender<Command>,
}

impl ControllerHandle {
    pub async fn load(&self) -> Result<usize> {
        self.request(Command::Load).await?
    }

    pub async fn select(&self, index: usize) -> Result<()> {
        self.request(|reply| Command::Select(index, reply)).await?
    }

    pub async fn play(&self) -> Result<SessionId> {
        self.request(Command::Play).await?
    }

    pub async fn stop(&self) -> Result<Option<SessionId>> {
        self.request(Command::Stop).await?
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        self.request(Command::Snapshot).await
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| ControllerError::Shutdown)?;
        reply_rx.await.map_err(|_| ControllerError::Shutdown)
    }
}

/// Start the controller task
///
/// The task ends once every [`ControllerHandle`] has been dropped.
pub fn spawn_controller(
    controller: SessionController,
    completions: mpsc::UnboundedReceiver<MonitorCompletion>,
) -> (ControllerHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(COMMAND_CAPACITY);
    let task = tokio::spawn(run(controller, rx, completions));
    (ControllerHandle { tx }, task)
}

async fn run(
    mut controller: SessionController,
    mut commands: mpsc::Receiver<Command>,
    mut completions: mpsc::UnboundedReceiver<MonitorCompletion>,
) {
    info!("Session controller started");

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => handle_command(&mut controller, command).await,
                None => break,
            },
            Some(completion) = completions.recv() => {
                if let Err(e) = controller.on_monitor_complete(completion) {
                    warn!("Session ended with error: {}", e);
                }
            }
        }
    }

    info!("Session controller stopped");
}

async fn handle_command(controller: &mut SessionController, command: Command) {
    // A dropped reply receiver means the HTTP client went away; the state
    // change has still happened.
    match command {
        Command::Load(reply) => {
            let _ = reply.send(controller.load().await);
        }
        Command::Select(index, reply) => {
            let _ = reply.send(controller.select(index));
        }
        Command::Play(reply) => {
            let _ = reply.send(controller.play().await);
        }
        Command::Stop(reply) => {
            let _ = reply.send(controller.stop().await);
        }
        Command::Snapshot(reply) => {
            if reply.send(controller.snapshot()).is_err() {
                debug!("Snapshot requester went away");
            }
        }
    }
}
