//! Hands controller commands to the backend bridge queue.

use crossbeam_channel::{Sender, TrySendError};
use record_client::bridge::failure_reply;
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{BackendCommand, BackendReply},
};

pub const QUEUE_FULL_MESSAGE: &str = "La cola de solicitudes está llena; intenta de nuevo.";
pub const BRIDGE_GONE_MESSAGE: &str =
    "El proceso de conexión con el servidor se detuvo; reinicia la aplicación.";

/// Queues `cmd` for the bridge. When it cannot be queued the returned reply
/// should be fed back to the controller so the form leaves its waiting state.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Option<BackendReply> {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued form->backend command");
            None
        }
        Err(TrySendError::Full(cmd)) => {
            tracing::warn!(command = cmd_name, "backend command queue is full");
            Some(failure_reply(
                &cmd,
                ApiError::new(ErrorCode::Internal, QUEUE_FULL_MESSAGE),
            ))
        }
        Err(TrySendError::Disconnected(cmd)) => {
            tracing::error!(command = cmd_name, "backend bridge disconnected");
            Some(failure_reply(
                &cmd,
                ApiError::new(ErrorCode::Internal, BRIDGE_GONE_MESSAGE),
            ))
        }
    }
}
