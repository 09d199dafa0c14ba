//! Async-friendly session facade backed by a dedicated worker thread
//!
//! The worker thread owns a synchronous [`Composer`] and executes commands
//! sent from async tasks, so callers get an async interface without the
//! composer being `Send` across awaits. Commands are processed strictly in
//! order by the single owner: one in-flight operation per session, no
//! overlap.

use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread;

use tokio::sync::oneshot;

use crate::composer::{Composer, DraftSnapshot};
use crate::export::{ExportOptions, ExportedArtifact};
use crate::theme::Theme;
use crate::{ComposerConfig, Error, Result};

enum Command {
    SetRecipientName(String, oneshot::Sender<Result<()>>),
    SetIssuerName(String, oneshot::Sender<Result<()>>),
    SetIssueDate(String, oneshot::Sender<Result<()>>),
    SetTheme(Theme, oneshot::Sender<Result<()>>),

    #[cfg(feature = "upload")]
    UploadSignature(Vec<u8>, oneshot::Sender<Result<()>>),
    #[cfg(feature = "freehand")]
    DrawStroke(Vec<(f32, f32)>, oneshot::Sender<Result<bool>>),
    ClearSignature(oneshot::Sender<Result<()>>),

    Snapshot(oneshot::Sender<Result<DraftSnapshot>>),
    Export(
        ExportOptions,
        Option<PathBuf>,
        oneshot::Sender<Result<ExportedArtifact>>,
    ),

    Close(oneshot::Sender<Result<()>>),
}

/// An async handle to a single composer session.
///
/// Cloning yields another handle to the same session; all handles serialize
/// through the one worker.
#[derive(Clone)]
pub struct Studio {
    cmd_tx: Sender<Command>,
}

impl Studio {
    /// Create a session (spawns a background thread owning the composer).
    pub async fn new(config: ComposerConfig, theme: Theme) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx): (oneshot::Sender<Result<()>>, oneshot::Receiver<Result<()>>) =
            oneshot::channel();

        thread::spawn(move || {
            // Initialize the composer on the worker thread
            let mut composer = match Composer::new(config, theme) {
                Ok(c) => c,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };

            let _ = init_tx.send(Ok(()));

            // Command loop
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::SetRecipientName(name, resp) => {
                        composer.set_recipient_name(&name);
                        let _ = resp.send(Ok(()));
                    }
                    Command::SetIssuerName(name, resp) => {
                        composer.set_issuer_name(&name);
                        let _ = resp.send(Ok(()));
                    }
                    Command::SetIssueDate(display, resp) => {
                        composer.set_issue_date_display(&display);
                        let _ = resp.send(Ok(()));
                    }
                    Command::SetTheme(theme, resp) => {
                        let _ = resp.send(composer.set_theme(theme));
                    }

                    #[cfg(feature = "upload")]
                    Command::UploadSignature(bytes, resp) => {
                        let _ = resp.send(composer.upload_signature(&bytes));
                    }
                    #[cfg(feature = "freehand")]
                    Command::DrawStroke(points, resp) => {
                        let mut iter = points.into_iter();
                        if let Some((x, y)) = iter.next() {
                            composer.pen_down(x, y);
                            for (x, y) in iter {
                                composer.pen_move(x, y);
                            }
                        }
                        let _ = resp.send(composer.pen_up());
                    }
                    Command::ClearSignature(resp) => {
                        composer.clear_signature();
                        let _ = resp.send(Ok(()));
                    }

                    Command::Snapshot(resp) => {
                        let _ = resp.send(Ok(composer.snapshot()));
                    }
                    Command::Export(options, dir, resp) => {
                        let res = composer.export(&options).and_then(|artifact| {
                            if let Some(dir) = dir {
                                artifact.write_to(&dir)?;
                            }
                            Ok(artifact)
                        });
                        let _ = resp.send(res);
                    }

                    Command::Close(resp) => {
                        let _ = resp.send(Ok(()));
                        break;
                    }
                }
            }
        });

        // Wait for the worker to report initialization success or failure
        let init_res = init_rx
            .await
            .map_err(|e| Error::Other(format!("Worker init canceled: {}", e)))?;
        init_res?;

        Ok(Self { cmd_tx })
    }

    async fn round_trip<T>(
        &self,
        rx: oneshot::Receiver<Result<T>>,
        what: &str,
    ) -> Result<T> {
        rx.await
            .map_err(|e| Error::Other(format!("{} canceled: {}", what, e)))?
    }

    pub async fn set_recipient_name(&self, name: &str) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self
            .cmd_tx
            .send(Command::SetRecipientName(name.to_string(), tx));
        self.round_trip(rx, "SetRecipientName").await
    }

    pub async fn set_issuer_name(&self, name: &str) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::SetIssuerName(name.to_string(), tx));
        self.round_trip(rx, "SetIssuerName").await
    }

    pub async fn set_issue_date_display(&self, display: &str) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self
            .cmd_tx
            .send(Command::SetIssueDate(display.to_string(), tx));
        self.round_trip(rx, "SetIssueDate").await
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::SetTheme(theme, tx));
        self.round_trip(rx, "SetTheme").await
    }

    /// Decode uploaded signature bytes into the session's draft.
    #[cfg(feature = "upload")]
    pub async fn upload_signature(&self, bytes: Vec<u8>) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::UploadSignature(bytes, tx));
        self.round_trip(rx, "UploadSignature").await
    }

    /// Draw one freehand stroke (pen down through the points, then lift).
    /// Returns whether the lift captured a signature.
    #[cfg(feature = "freehand")]
    pub async fn draw_stroke(&self, points: Vec<(f32, f32)>) -> Result<bool> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::DrawStroke(points, tx));
        self.round_trip(rx, "DrawStroke").await
    }

    pub async fn clear_signature(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::ClearSignature(tx));
        self.round_trip(rx, "ClearSignature").await
    }

    pub async fn snapshot(&self) -> Result<DraftSnapshot> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Snapshot(tx));
        self.round_trip(rx, "Snapshot").await
    }

    /// Export the certificate; if `dir` is Some, the artifact is also
    /// written there under its derived filename.
    pub async fn export(
        &self,
        options: ExportOptions,
        dir: Option<PathBuf>,
    ) -> Result<ExportedArtifact> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Export(options, dir, tx));
        self.round_trip(rx, "Export").await
    }

    /// Shut down the background worker and end the session.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))?
    }
}
