//! Audition runtime.
//!
//! Owns the flow controller and bridges it to the real world: a 1 Hz tick
//! drives both countdowns, terminal commands arrive over the command
//! channel, and uploads run in spawned tasks that report back as flow
//! events. Effects are executed strictly in order; the effect queue also
//! carries the follow-up events a recorder call produces, so every state
//! transition happens on this one task.

use crate::{AppCommand, AppError, AppResult, BackendClient};

use std::{collections::VecDeque, io::Write, panic::Location, time::Duration};

use error_location::ErrorLocation;
use tokio::{
    sync::{mpsc, watch},
    time::{Instant as TokioInstant, MissedTickBehavior, interval_at},
};
use tracing::{debug, info, instrument, warn};
use tryout_core::{
    AnswerRequest, AuditionController, CompletionReason, Effect, FlowEvent, Notice, Recorder,
    RecordingState,
};
use uuid::Uuid;

/// The audition event loop.
///
/// Runs on a single task; the controller's busy flag and the strict
/// ordering of effect execution are what guarantee one upload at a time.
pub struct App<R: Recorder> {
    controller: AuditionController,
    recorder: R,
    client: BackendClient,
    command_rx: mpsc::Receiver<AppCommand>,
    upload_tx: mpsc::Sender<FlowEvent>,
    upload_rx: mpsc::Receiver<FlowEvent>,
    shutdown_tx: watch::Sender<bool>,
    run_id: Uuid,
    shown_index: Option<usize>,
    overtime_shown: bool,
}

impl<R: Recorder> App<R> {
    /// Wire up an audition loop over a controller and recorder.
    pub fn new(
        controller: AuditionController,
        recorder: R,
        client: BackendClient,
        command_rx: mpsc::Receiver<AppCommand>,
        shutdown_tx: watch::Sender<bool>,
    ) -> Self {
        let (upload_tx, upload_rx) = mpsc::channel(8);

        Self {
            controller,
            recorder,
            client,
            command_rx,
            upload_tx,
            upload_rx,
            shutdown_tx,
            run_id: Uuid::new_v4(),
            shown_index: None,
            overtime_shown: false,
        }
    }

    /// Run the audition to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow cannot start or the talent aborts.
    #[instrument(skip(self), fields(run_id = %self.run_id))]
    pub async fn run(mut self) -> AppResult<CompletionReason> {
        info!("Audition loop starting");

        let initial = self.controller.start()?;
        self.apply(initial).await?;

        // First tick lands a full second in; Skip keeps a delayed tick
        // from being followed by an immediate second one.
        let mut ticker = interval_at(
            TokioInstant::now() + Duration::from_secs(1),
            Duration::from_secs(1),
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let reason = loop {
            if let Some(reason) = self.controller.completion() {
                break reason;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    let effects = self.controller.handle(FlowEvent::Tick);
                    self.apply(effects).await?;
                    self.render_status();
                }

                Some(command) = self.command_rx.recv() => {
                    match command {
                        AppCommand::StopRecording => {
                            let effects = self.controller.handle(FlowEvent::StopPressed);
                            self.apply(effects).await?;
                        }
                        AppCommand::Advance => {
                            let effects = self.controller.handle(FlowEvent::AdvancePressed);
                            self.apply(effects).await?;
                        }
                        AppCommand::Shutdown => {
                            info!("Audition aborted from terminal");
                            let _ = self.shutdown_tx.send(true);
                            return Err(AppError::Aborted {
                                location: ErrorLocation::from(Location::caller()),
                            });
                        }
                    }
                }

                Some(event) = self.upload_rx.recv() => {
                    let effects = self.controller.handle(event);
                    self.apply(effects).await?;
                }
            }
        };

        let _ = self.shutdown_tx.send(true);
        info!(?reason, "Audition loop finished");

        Ok(reason)
    }

    /// Execute effects in order. Recorder calls can answer with follow-up
    /// events whose effects join the back of the queue, so one user action
    /// resolves fully before the next event is read.
    async fn apply(&mut self, initial: Vec<Effect>) -> AppResult<()> {
        let mut pending: VecDeque<Effect> = initial.into();

        while let Some(effect) = pending.pop_front() {
            match effect {
                Effect::StartRecording => {
                    if let Err(e) = self.recorder.start() {
                        warn!(error = ?e, "Recorder failed to start");
                        pending.extend(
                            self.controller
                                .handle(FlowEvent::RecordingFailed(e.to_string())),
                        );
                    } else {
                        debug!("Microphone capture started");
                    }
                }

                Effect::StopRecording => {
                    let question_id = self.controller.current_question().id.clone();
                    match self.recorder.stop(&question_id) {
                        Ok(audio) => {
                            pending.extend(
                                self.controller.handle(FlowEvent::RecordingStopped(audio)),
                            );
                        }
                        Err(e) => {
                            pending.extend(
                                self.controller
                                    .handle(FlowEvent::RecordingFailed(e.to_string())),
                            );
                        }
                    }
                }

                Effect::Upload(request) => self.spawn_upload(request),

                Effect::QuestionSkipped { question_id } => {
                    println!("\nNo answer recorded for {question_id}, skipping.");
                }

                Effect::Notify(notice) => self.report(&notice),

                Effect::SessionComplete(reason) => self.render_completion(reason),
            }
        }

        self.render_question_transition();

        Ok(())
    }

    /// Submit one answer in the background. The controller's busy flag
    /// holds the question until the result event comes back.
    fn spawn_upload(&self, request: AnswerRequest) {
        println!("\nUploading answer for {} ...", request.question_id);

        let client = self.client.clone();
        let session = self.controller.session().clone();
        let results = self.upload_tx.clone();

        tokio::spawn(async move {
            let event = match client.submit_answer(&session, &request).await {
                Ok(()) => FlowEvent::UploadSucceeded,
                Err(e) => FlowEvent::UploadFailed(e.to_string()),
            };

            if results.send(event).await.is_err() {
                warn!("Audition loop ended before the upload result arrived");
            }
        });
    }

    fn report(&self, notice: &Notice) {
        match notice {
            Notice::MissingAnswer => {
                println!("\nNo recording to submit yet. `stop` your answer first.");
            }
            Notice::UploadFailed { message } => {
                println!("\nUpload failed: {message}. Type `next` to retry.");
            }
            Notice::RecorderFailed { message } => {
                println!("\nRecorder error: {message}");
            }
        }
    }

    fn render_question_transition(&mut self) {
        if self.controller.completion().is_some() {
            return;
        }

        let index = self.controller.current_index();
        if self.shown_index == Some(index) {
            return;
        }
        self.shown_index = Some(index);
        self.overtime_shown = false;

        let total = self.controller.session().question_count();
        let question = self.controller.current_question();

        println!();
        println!("Question {} of {}: {}", index + 1, total, question.prompt);
        println!(
            "  {}s to answer. Recording has started: type `stop` to finish, then `next` to submit.",
            question.time_limit.as_secs()
        );
    }

    fn render_status(&mut self) {
        if self.controller.completion().is_some() {
            return;
        }

        if self.controller.overtime() && !self.overtime_shown {
            self.overtime_shown = true;
            println!("\n  Warning: 30 seconds left on this question.");
        }

        let state = match self.controller.recording_state() {
            RecordingState::Recording { .. } => "recording",
            RecordingState::Recorded { .. } if self.controller.is_uploading() => "uploading",
            RecordingState::Recorded { .. } => "recorded, type `next` to submit",
            RecordingState::Idle => "idle",
        };

        print!(
            "\r  exam {} | question {} | {}        ",
            format_clock(self.controller.exam_remaining_secs()),
            format_clock(self.controller.question_remaining_secs()),
            state
        );
        let _ = std::io::stdout().flush();
    }

    fn render_completion(&self, reason: CompletionReason) {
        println!();
        match reason {
            CompletionReason::AllQuestionsHandled => {
                println!("All questions handled. Audition finished.");
            }
            CompletionReason::ExamTimeUp => {
                println!("The exam time limit was reached. Audition finished.");
            }
        }
    }
}

/// Format seconds as MM:SS.
pub(crate) fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
