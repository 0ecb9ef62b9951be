mod commands;
mod orchestration;
mod render;

use std::{
    fs,
    io::{self, BufRead, Write},
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use enrollment_core::{load_settings, Dialog, FormController, FormEvent};
use record_client::{bridge, HttpRecordBackend, MissingRecordBackend, RecordBackend};
use shared::protocol::{BackendCommand, BackendReply};
use tracing_subscriber::EnvFilter;

use crate::commands::{ConsoleCommand, HELP};
use crate::orchestration::dispatch_backend_command;

const WAIT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser, Debug)]
#[command(about = "Student enrollment form in the terminal")]
struct Args {
    /// Record endpoint; overrides enrollment.toml and the environment.
    #[arg(long)]
    endpoint_url: Option<String>,
    /// Never contact the endpoint; lookups and submission fail locally.
    #[arg(long)]
    offline: bool,
}

struct Session {
    controller: FormController,
    cmd_tx: crossbeam_channel::Sender<BackendCommand>,
    reply_rx: Receiver<BackendReply>,
    pending: usize,
}

impl Session {
    fn apply(&mut self, event: FormEvent) {
        match self.controller.handle(event) {
            Ok(commands) => {
                for cmd in commands {
                    match dispatch_backend_command(&self.cmd_tx, cmd) {
                        None => self.pending += 1,
                        Some(reply) => self.apply(FormEvent::Backend(reply)),
                    }
                }
            }
            Err(err) => println!("rechazado: {err}"),
        }
    }

    fn apply_reply(&mut self, reply: BackendReply) {
        self.pending = self.pending.saturating_sub(1);
        self.apply(FormEvent::Backend(reply));
    }

    fn drain_replies(&mut self) {
        while let Ok(reply) = self.reply_rx.try_recv() {
            self.apply_reply(reply);
        }
    }

    fn wait_for_replies(&mut self) {
        while self.pending > 0 {
            match self.reply_rx.recv_timeout(WAIT_TIMEOUT) {
                Ok(reply) => self.apply_reply(reply),
                Err(RecvTimeoutError::Timeout) => {
                    println!("sin respuesta del servidor todavía ({} pendientes)", self.pending);
                    return;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::error!("backend bridge stopped with requests pending");
                    self.pending = 0;
                    return;
                }
            }
        }
    }

    fn close_dialog(&mut self) {
        let event = match self.controller.dialog() {
            Some(Dialog::Options) => FormEvent::ContinueOptions,
            Some(Dialog::NotFound) => FormEvent::CloseNotFound,
            Some(Dialog::Confirmation) => FormEvent::CloseConfirmation,
            Some(Dialog::DeploymentAlert(_)) => FormEvent::DismissAlert,
            None => {
                println!("no hay ningún diálogo abierto");
                return;
            }
        };
        self.apply(event);
    }

    fn attach_photo(&mut self, path: &std::path::Path) -> Result<()> {
        let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.apply(FormEvent::AttachPhoto { filename, bytes });
        Ok(())
    }

    fn show(&self) {
        print!("{}", render::render(&self.controller.view()));
        let _ = io::stdout().flush();
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(endpoint_url) = args.endpoint_url {
        settings.endpoint_url = endpoint_url;
    }
    settings.validate().context("invalid settings")?;
    tracing::info!(
        endpoint = %settings.endpoint_url,
        age_min = settings.age_min,
        age_max = settings.age_max,
        offline = args.offline,
        "starting enrollment console"
    );

    let backend: Arc<dyn RecordBackend> = if args.offline {
        Arc::new(MissingRecordBackend)
    } else {
        Arc::new(HttpRecordBackend::new(&settings.endpoint_url)?)
    };
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (reply_tx, reply_rx) = bounded::<BackendReply>(256);
    let worker = bridge::launch(backend, cmd_rx, reply_tx);

    let mut session = Session {
        controller: FormController::new(settings),
        cmd_tx,
        reply_rx,
        pending: 0,
    };
    println!("{HELP}\n");
    session.show();

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read from stdin")?;
        session.drain_replies();
        let command = match commands::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        match command {
            ConsoleCommand::Event(event) => session.apply(event),
            ConsoleCommand::CloseDialog => session.close_dialog(),
            ConsoleCommand::AttachPhoto(path) => {
                if let Err(err) = session.attach_photo(&path) {
                    println!("{err:#}");
                }
            }
            ConsoleCommand::Wait => session.wait_for_replies(),
            ConsoleCommand::Show => {}
            ConsoleCommand::Help => {
                println!("{HELP}");
                continue;
            }
            ConsoleCommand::Quit => break,
        }
        session.drain_replies();
        session.show();
    }

    drop(session);
    if worker.join().is_err() {
        tracing::error!("backend bridge panicked");
    }
    Ok(())
}
