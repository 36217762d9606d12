//! Supervision report PDF engine
//!
//! Turns a captured "Reporte de Supervisión Efectiva" snapshot (general data
//! plus evidence sections A-J) into a paginated PDF with the fixed CFE
//! layout, kept under a hard size ceiling by lowering image quality.
//! Python bindings are available behind the `python` feature.

pub mod canvas;
pub mod config;
pub mod error;
pub mod font_metrics;
pub mod generator;
pub mod image_source;
pub mod image_utils;
pub mod model;
pub mod output;
pub mod planner;
pub mod progress;
pub mod quality;
pub mod renderer;
pub mod sections;
pub mod text_layout;
pub mod types;
pub mod unicode_utils;
pub mod worker;

#[cfg(feature = "python")]
mod python;

pub use config::{EngineConfig, ImageLimitPolicy};
pub use error::{ReportError, ReportResult};
pub use generator::{AssembledPdf, AssemblyOutcome, GeneratedReport, GenerationOutcome, ReportGenerator};
pub use image_source::{FileImageSource, ImageSource, MemoryImageSource};
pub use model::{GeneralData, ReportDocument, Section};
pub use output::{FileSystemOutput, MemoryOutput, OutputSink, ReportRecord};
pub use planner::{planned_page_count, PageKind, PagePlan, PaginationPlanner};
pub use progress::{CancellationCheck, CancellationToken, NeverCancelled, NoopProgress, ProgressCallback};
pub use sections::{SectionId, SectionInfo, SECTION_TABLE};
pub use worker::{spawn_generation, GenerationHandle};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module for report generation
#[cfg(feature = "python")]
#[pymodule]
fn supervision_report_pdf(_py: Python, m: &PyModule) -> PyResult<()> {
    python::register(m)
}
