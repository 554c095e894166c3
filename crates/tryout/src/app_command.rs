/// Commands sent from the terminal input reader to the audition loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Stop the current recording, keeping the take for submission.
    StopRecording,
    /// Upload the parked answer and move to the next question.
    Advance,
    /// Abort the audition.
    Shutdown,
}
