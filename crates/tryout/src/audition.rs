//! Audition bootstrap and completion.
//!
//! Resolves the opportunity, opens the attempt with the backend, runs the
//! flow loop against the microphone, and records the finished submission.

use crate::{
    App, AppError, AppResult, BackendClient, InputReader,
    backend::normalize_questions,
    config::Config,
};

use std::panic::Location;

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{info, instrument, warn};
use tryout_core::{AuditionController, CompletionReason, MicRecorder, Recorder, Session};

/// Identity used for practice runs; the backend files these separately.
const DEMO_USER_ID: &str = "demo-user";
const DEMO_OPPORTUNITY_ID: &str = "demo";

/// Run a real audition for `opportunity_id`, end to end.
#[instrument(skip(client, config))]
pub async fn run_audition(
    client: &BackendClient,
    config: &Config,
    opportunity_id: &str,
) -> AppResult<()> {
    let user_id = config.require_user_id()?.to_string();

    // One submission per opportunity: refuse a second attempt up front.
    let submissions = client.submissions(&user_id).await?;
    if submissions
        .iter()
        .any(|s| s.opportunity_id.as_deref() == Some(opportunity_id))
    {
        return Err(AppError::AlreadyApplied {
            opportunity_id: opportunity_id.to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let opportunity = client.opportunity(opportunity_id).await?;
    info!(
        title = %opportunity.title,
        company = %opportunity.company,
        "Preparing audition"
    );
    println!(
        "Auditioning for {} at {}.",
        opportunity.title, opportunity.company
    );

    let start = client.start_audition(&user_id, opportunity_id).await?;

    // audition/start owns the question list; the listing's embedded
    // questions are only a fallback for older backends.
    let wire = if start.questions.is_empty() {
        opportunity.questions
    } else {
        start.questions
    };
    let questions = normalize_questions(wire, config.session.fallback_question_secs);

    let session = Session::new(
        user_id,
        opportunity_id.to_string(),
        start.submission_id,
        questions,
    )?;
    let session_record = session.clone();

    let recorder = MicRecorder::new(config.audio.selected_device.as_deref())?;
    let reason = run_flow(client, config, session, recorder).await?;
    info!(?reason, "Audition flow finished");

    // Recording the submission makes the audition show up in
    // "My Applications" and blocks duplicate attempts.
    let submission_id = client.create_submission(&session_record).await?;
    println!("Audition submitted for review (submission {submission_id}).");

    Ok(())
}

/// Run the practice interview: same flow, practice identity, nothing is
/// recorded against a real opportunity.
#[instrument(skip(client, config))]
pub async fn run_demo(client: &BackendClient, config: &Config) -> AppResult<()> {
    let wire = client.demo_questions().await?;
    let questions = normalize_questions(wire, config.session.fallback_question_secs);

    let session = Session::new(
        DEMO_USER_ID.to_string(),
        DEMO_OPPORTUNITY_ID.to_string(),
        None,
        questions,
    )?;

    println!(
        "Practice interview: {} questions to check your microphone and timing.",
        session.question_count()
    );

    let recorder = MicRecorder::new(config.audio.selected_device.as_deref())?;
    let reason = run_flow(client, config, session, recorder).await?;
    info!(?reason, "Demo finished");

    println!("Demo complete! Your setup works. You are ready for a real audition.");

    Ok(())
}

/// Wire the controller, input reader and event loop together and run them.
async fn run_flow<R: Recorder>(
    client: &BackendClient,
    config: &Config,
    session: Session,
    recorder: R,
) -> AppResult<CompletionReason> {
    let controller = AuditionController::new(session, config.session.exam_time_limit());

    let (command_tx, command_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let reader = InputReader::new(command_tx);
    let app = App::new(controller, recorder, client.clone(), command_rx, shutdown_tx);

    let (reader_result, flow_result) = tokio::join!(reader.run(shutdown_rx), app.run());

    if let Err(e) = reader_result {
        warn!(error = ?e, "Input reader error");
    }

    flow_result
}
