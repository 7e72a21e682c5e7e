use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{recommended_watcher, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;

use boxprofile_core::paths;
use boxprofile_sync::{targets_for_query, SyncError, TargetOutcome};

use crate::error::{io_err, DaemonError};
use crate::journal::{self, ContainerEvent, JOURNALCTL, PODMAN};

/// Quiet period after the last event before a pass is requested.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Longest a steady stream of events can hold back a pass.
pub const DEBOUNCE_MAX_DELAY: Duration = Duration::from_millis(5_000);

/// One synchronization pass, run on the blocking pool.
pub type PassFn = Arc<dyn Fn() -> Result<Vec<TargetOutcome>, SyncError> + Send + Sync>;

/// Why a pass was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Startup,
    Container(ContainerEvent),
    Settings,
}

/// Start the watch loop and block the current thread until it exits.
pub fn start_blocking(home: &Path, query: Vec<String>) -> Result<(), DaemonError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    runtime.block_on(run(home.to_path_buf(), query))
}

/// Run the watch loop until ctrl-c or until the journal stream ends.
pub async fn run(home: PathBuf, query: Vec<String>) -> Result<(), DaemonError> {
    let podman = journal::resolve(JOURNALCTL, PODMAN)?;
    // Reject unknown target names before anything is spawned.
    targets_for_query(&home, &query)?;

    let pass: PassFn = {
        let home = home.clone();
        Arc::new(move || boxprofile_sync::run_at(&home, &query, false))
    };

    let (event_tx, event_rx) = mpsc::unbounded_channel::<Trigger>();
    let (request_tx, request_rx) = mpsc::channel::<Trigger>(1);
    let (shutdown_tx, _) = broadcast::channel::<()>(16);

    request_pass(&request_tx, Trigger::Startup);

    let journal_handle = {
        let shutdown = shutdown_tx.clone();
        let event_tx = event_tx.clone();
        tokio::spawn(async move {
            let result = journal_task(podman, event_tx, shutdown.subscribe()).await;
            let _ = shutdown.send(());
            result
        })
    };

    let settings_handle = {
        let shutdown = shutdown_tx.clone();
        let rc_file = paths::konsolerc_path(&home);
        tokio::spawn(async move {
            let result = settings_task(rc_file, event_tx, shutdown.subscribe()).await;
            let _ = shutdown.send(());
            result
        })
    };

    let debounce_handle = {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            let result = debounce_task(
                event_rx,
                request_tx,
                DEBOUNCE_WINDOW,
                DEBOUNCE_MAX_DELAY,
                shutdown.subscribe(),
            )
            .await;
            let _ = shutdown.send(());
            result
        })
    };

    let processor_handle = {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            let result = processor_task(pass, request_rx, shutdown.subscribe()).await;
            let _ = shutdown.send(());
            result
        })
    };

    let signal_handle = {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            let mut shutdown_rx = shutdown.subscribe();
            tokio::select! {
                _ = shutdown_rx.recv() => Ok(()),
                signal = tokio::signal::ctrl_c() => {
                    match signal {
                        Ok(()) => {
                            tracing::info!("received ctrl-c, shutting down");
                            let _ = shutdown.send(());
                            Ok(())
                        }
                        Err(err) => Err(io_err("ctrl-c handler", err)),
                    }
                }
            }
        })
    };

    let (journal_result, settings_result, debounce_result, processor_result, signal_result) = tokio::join!(
        journal_handle,
        settings_handle,
        debounce_handle,
        processor_handle,
        signal_handle
    );

    handle_join("journal", journal_result)?;
    handle_join("settings_watcher", settings_result)?;
    handle_join("debounce", debounce_result)?;
    handle_join("pass_processor", processor_result)?;
    handle_join("signal_handler", signal_result)?;
    Ok(())
}

async fn journal_task(
    podman: PathBuf,
    event_tx: mpsc::UnboundedSender<Trigger>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DaemonError> {
    let mut child = journal::spawn_follow(JOURNALCTL, &podman)?;
    let stdout = child
        .stdout
        .take()
        .ok_or(DaemonError::ChannelClosed("journalctl stdout"))?;
    let mut lines = BufReader::new(stdout).lines();
    tracing::info!(podman = %podman.display(), "following podman journal");

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            line = lines.next_line() => {
                let Some(line) = line.map_err(|e| io_err("journalctl stdout", e))? else {
                    tracing::warn!("journalctl stream ended");
                    break;
                };
                let Some(event) = journal::classify(&line) else { continue };
                match event {
                    ContainerEvent::Created => tracing::info!("podman event: a container was created"),
                    ContainerEvent::Removed => tracing::info!("podman event: a container was removed"),
                    ContainerEvent::Other => tracing::debug!(line = %line, "podman container event"),
                }
                if event_tx.send(Trigger::Container(event)).is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}

async fn settings_task(
    rc_file: PathBuf,
    event_tx: mpsc::UnboundedSender<Trigger>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DaemonError> {
    let Some(dir) = rc_file.parent().filter(|d| d.is_dir()).map(Path::to_path_buf) else {
        tracing::warn!(file = %rc_file.display(), "settings directory missing, not watching it");
        let _ = shutdown_rx.recv().await;
        return Ok(());
    };

    let (notify_tx, mut notify_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();
    let mut _watcher: RecommendedWatcher = recommended_watcher(move |event| {
        let _ = notify_tx.send(event);
    })?;
    _watcher.watch(&dir, RecursiveMode::NonRecursive)?;

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            event = notify_rx.recv() => {
                let Some(event) = event else { break };
                let event = match event {
                    Ok(event) => event,
                    Err(err) => {
                        tracing::warn!(error = %err, "settings watcher error");
                        continue;
                    }
                };
                if !is_relevant_event_kind(&event.kind) || !touches_file(&event, &rc_file) {
                    continue;
                }
                tracing::info!(file = %rc_file.display(), "settings file changed");
                if event_tx.send(Trigger::Settings).is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Forward a pass request once `window` has passed without further events,
/// or once `max_delay` has passed since the first event of the burst.
async fn debounce_task(
    mut event_rx: mpsc::UnboundedReceiver<Trigger>,
    request_tx: mpsc::Sender<Trigger>,
    window: Duration,
    max_delay: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DaemonError> {
    let mut pending: Option<PendingBurst> = None;
    loop {
        let deadline = pending.as_ref().map(PendingBurst::deadline);
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            event = event_rx.recv() => {
                let Some(trigger) = event else { break };
                let now = Instant::now();
                pending = Some(match pending {
                    Some(burst) => PendingBurst {
                        trigger,
                        quiet_until: now + window,
                        ..burst
                    },
                    None => PendingBurst {
                        trigger,
                        quiet_until: now + window,
                        give_up_at: now + max_delay,
                    },
                });
            }
            _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some(burst) = pending.take() {
                    request_pass(&request_tx, burst.trigger);
                }
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct PendingBurst {
    trigger: Trigger,
    quiet_until: Instant,
    give_up_at: Instant,
}

impl PendingBurst {
    fn deadline(&self) -> Instant {
        self.quiet_until.min(self.give_up_at)
    }
}

/// Queue a pass unless one is already waiting.
fn request_pass(request_tx: &mpsc::Sender<Trigger>, trigger: Trigger) {
    match request_tx.try_send(trigger) {
        Ok(()) => tracing::debug!(?trigger, "pass requested"),
        Err(mpsc::error::TrySendError::Full(_)) => {
            tracing::debug!(?trigger, "pass already pending, request coalesced");
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            tracing::warn!(?trigger, "pass processor stopped, request dropped");
        }
    }
}

async fn processor_task(
    pass: PassFn,
    mut request_rx: mpsc::Receiver<Trigger>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DaemonError> {
    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            request = request_rx.recv() => {
                let Some(trigger) = request else { break };
                let started = Instant::now();
                let pass = pass.clone();
                let result = tokio::task::spawn_blocking(move || pass())
                    .await
                    .map_err(|err| DaemonError::Join {
                        task: "pass".to_string(),
                        message: err.to_string(),
                    })?;

                match result {
                    Ok(outcomes) => log_outcomes(trigger, &outcomes, started.elapsed()),
                    Err(err) => tracing::error!(?trigger, error = %err, "pass failed"),
                }
            }
        }
    }
    Ok(())
}

fn log_outcomes(trigger: Trigger, outcomes: &[TargetOutcome], elapsed: Duration) {
    for outcome in outcomes {
        match outcome {
            TargetOutcome::Synced(report) => tracing::info!(
                ?trigger,
                target = %report.target,
                written = report.reconcile.written(),
                deleted = report.reconcile.deleted.len(),
                duration_ms = elapsed.as_millis() as u64,
                "pass completed",
            ),
            TargetOutcome::Skipped { target, reason } => {
                tracing::warn!(?trigger, target = %target, reason = %reason, "target skipped")
            }
        }
    }
}

fn is_relevant_event_kind(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

fn touches_file(event: &Event, file: &Path) -> bool {
    event
        .paths
        .iter()
        .any(|p| p.file_name().is_some() && p.file_name() == file.file_name())
}

fn handle_join(
    task: &str,
    result: Result<Result<(), DaemonError>, tokio::task::JoinError>,
) -> Result<(), DaemonError> {
    match result {
        Ok(inner) => inner,
        Err(err) => Err(DaemonError::Join {
            task: task.to_string(),
            message: err.to_string(),
        }),
    }
}
