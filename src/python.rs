//! Python bindings
//!
//! Exposes the generator to Python hosts. Documents and configuration cross
//! the boundary as JSON strings; results come back as dictionaries.

use std::sync::{Arc, Mutex};

use log::warn;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::config::EngineConfig;
use crate::generator::{GenerationOutcome, ReportGenerator};
use crate::image_source::FileImageSource;
use crate::model::ReportDocument;
use crate::output::FileSystemOutput;
use crate::progress::{CancellationToken, NoopProgress, ProgressCallback};

/// Forwards page progress to a Python callable `(current, total)`
struct PyProgress(PyObject);

impl ProgressCallback for PyProgress {
    fn on_page_complete(&self, current: usize, total: usize) {
        Python::with_gil(|py| {
            if let Err(e) = self.0.call1(py, (current, total)) {
                warn!("Progress callback raised: {}", e);
            }
        });
    }
}

#[pyclass(name = "ReportGenerator")]
pub struct PyReportGenerator {
    inner: Arc<ReportGenerator>,
    current: Mutex<Option<CancellationToken>>,
}

#[pymethods]
impl PyReportGenerator {
    #[new]
    #[pyo3(signature = (output_dir, config_json=None, image_base_dir=None))]
    fn new(output_dir: String, config_json: Option<&str>, image_base_dir: Option<String>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => EngineConfig::from_json(json)?,
            None => EngineConfig::default(),
        };
        let source = match image_base_dir {
            Some(dir) => FileImageSource::with_base_dir(dir),
            None => FileImageSource::new(),
        };
        let generator = ReportGenerator::new(config, Arc::new(source), Arc::new(FileSystemOutput::new(output_dir)))?;
        Ok(Self {
            inner: Arc::new(generator),
            current: Mutex::new(None),
        })
    }

    /// Page count the progress callback will report
    fn total_pages(&self, document_json: &str) -> PyResult<usize> {
        let document = ReportDocument::from_json(document_json)?;
        Ok(self.inner.total_pages(&document))
    }

    /// Generate and store a report; the GIL is released while rendering
    #[pyo3(signature = (document_json, progress=None))]
    fn generate(&self, py: Python<'_>, document_json: &str, progress: Option<PyObject>) -> PyResult<PyObject> {
        let document = ReportDocument::from_json(document_json)?;
        let token = CancellationToken::new();
        if let Ok(mut current) = self.current.lock() {
            *current = Some(token.clone());
        }

        let progress: Box<dyn ProgressCallback> = match progress {
            Some(callable) => Box::new(PyProgress(callable)),
            None => Box::new(NoopProgress),
        };
        let inner = Arc::clone(&self.inner);
        let outcome = py.allow_threads(move || inner.generate(&document, progress.as_ref(), &token));

        let result = PyDict::new(py);
        match outcome {
            GenerationOutcome::Success(report) => {
                result.set_item("status", "success")?;
                result.set_item("path", report.path.display().to_string())?;
                result.set_item("title", report.record.title)?;
                result.set_item("size", report.size)?;
                result.set_item("quality", report.quality)?;
                result.set_item("pages", report.pages.len())?;
                result.set_item("created_at", report.record.created_at)?;
            }
            GenerationOutcome::Cancelled => {
                result.set_item("status", "cancelled")?;
            }
            GenerationOutcome::Failed { message } => {
                result.set_item("status", "failed")?;
                result.set_item("message", message)?;
            }
        }
        Ok(result.to_object(py))
    }

    /// Cancel the generation currently running on another thread
    fn cancel(&self) {
        if let Ok(current) = self.current.lock() {
            if let Some(token) = current.as_ref() {
                token.cancel();
            }
        }
    }
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_class::<PyReportGenerator>()?;
    Ok(())
}
