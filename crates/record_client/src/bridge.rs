//! Worker thread between the form's command queue and the record endpoint.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use crossbeam_channel::{Receiver, Sender};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{BackendCommand, BackendReply, LookupOutcome, SubmitOutcome},
};

use crate::RecordBackend;

/// Starts the bridge. Each command runs as its own task and answers with
/// exactly one reply, in completion order. A full reply queue holds the
/// reply back until the front end drains it; replies are only dropped once
/// the reply receiver is gone. The thread exits once every command sender
/// is dropped and in-flight tasks have finished.
pub fn launch(
    backend: Arc<dyn RecordBackend>,
    cmd_rx: Receiver<BackendCommand>,
    reply_tx: Sender<BackendReply>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build record bridge runtime: {err}");
                let failure = ApiError::new(
                    ErrorCode::Internal,
                    format!("backend worker startup failure: {err}"),
                );
                while let Ok(cmd) = cmd_rx.recv() {
                    if reply_tx.send(failure_reply(&cmd, failure.clone())).is_err() {
                        break;
                    }
                }
                return;
            }
        };
        tracing::info!("record bridge ready");

        let mut in_flight = Vec::new();
        while let Ok(cmd) = cmd_rx.recv() {
            tracing::debug!(command = cmd.name(), "running backend command");
            let backend = Arc::clone(&backend);
            let reply_tx = reply_tx.clone();
            in_flight.retain(|task: &tokio::task::JoinHandle<()>| !task.is_finished());
            in_flight.push(runtime.spawn(async move {
                let reply = run_command(backend.as_ref(), cmd).await;
                deliver(reply_tx, reply).await;
            }));
        }

        runtime.block_on(async move {
            for task in in_flight {
                let _ = task.await;
            }
        });
        tracing::info!("record bridge stopped");
    })
}

async fn run_command(backend: &dyn RecordBackend, cmd: BackendCommand) -> BackendReply {
    match cmd {
        BackendCommand::Search(request) => {
            let outcome = crate::lookup(backend, &request).await;
            BackendReply::LookupCompleted {
                search_type: request.search_type,
                outcome,
            }
        }
        BackendCommand::Submit(request) => {
            BackendReply::SubmitCompleted(crate::submit(backend, &request).await)
        }
    }
}

/// Reply for a command that never reached the endpoint.
pub fn failure_reply(cmd: &BackendCommand, err: ApiError) -> BackendReply {
    match cmd {
        BackendCommand::Search(request) => BackendReply::LookupCompleted {
            search_type: request.search_type.clone(),
            outcome: LookupOutcome::Failed(err),
        },
        BackendCommand::Submit(_) => BackendReply::SubmitCompleted(SubmitOutcome::Failure(err)),
    }
}

async fn deliver(reply_tx: Sender<BackendReply>, reply: BackendReply) {
    match tokio::task::spawn_blocking(move || reply_tx.send(reply)).await {
        Ok(Ok(())) => {}
        Ok(Err(_)) => tracing::debug!("reply receiver gone; dropping backend reply"),
        Err(err) => tracing::error!("reply delivery task failed: {err}"),
    }
}
