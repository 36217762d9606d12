//! Background generation
//!
//! Runs one generation on a dedicated thread so a UI thread can keep
//! polling progress and request cancellation.

use std::sync::Arc;
use std::thread::JoinHandle;

use log::error;

use crate::error::ReportResult;
use crate::generator::{GenerationOutcome, ReportGenerator};
use crate::model::ReportDocument;
use crate::progress::{CancellationToken, ProgressCallback};

const WORKER_THREAD_NAME: &str = "report-generator";

/// Handle to a generation running in the background
pub struct GenerationHandle {
    token: CancellationToken,
    thread: JoinHandle<GenerationOutcome>,
}

impl GenerationHandle {
    /// Ask the generation to stop at its next checkpoint
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the outcome
    pub fn join(self) -> GenerationOutcome {
        self.thread.join().unwrap_or_else(|_| {
            error!("Report generation thread panicked");
            GenerationOutcome::Failed {
                message: "report generation thread panicked".to_string(),
            }
        })
    }
}

/// Start generating `document` on a new thread
///
/// The generator takes an owned snapshot; later edits on the caller side
/// never reach the running generation.
pub fn spawn_generation(
    generator: Arc<ReportGenerator>,
    document: ReportDocument,
    progress: Arc<dyn ProgressCallback>,
) -> ReportResult<GenerationHandle> {
    let token = CancellationToken::new();
    let cancel = token.clone();
    let thread = std::thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || generator.generate(&document, progress.as_ref(), &cancel))?;
    Ok(GenerationHandle { token, thread })
}
