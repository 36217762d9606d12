//! Size-constrained report generation
//!
//! A generation plans the document once, then renders it at decreasing
//! image quality until the serialized PDF fits under the size ceiling.
//! Every attempt rebuilds the whole document from the snapshot.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use image::DynamicImage;
use log::{error, info, warn};

use crate::config::EngineConfig;
use crate::error::{ReportError, ReportResult};
use crate::image_source::ImageSource;
use crate::image_utils::ImageProcessor;
use crate::model::ReportDocument;
use crate::output::{build_file_name, OutputSink, ReportRecord};
use crate::planner::PaginationPlanner;
use crate::progress::{CancellationCheck, ProgressCallback};
use crate::quality::{document_quality, QualitySchedule};
use crate::renderer::{DocumentWriter, PageRenderer, PageSummary};

const DOCUMENT_TITLE: &str = "Reporte de Supervisión Efectiva";

/// A document that fits under the ceiling, still in memory
#[derive(Debug, Clone)]
pub struct AssembledPdf {
    pub bytes: Vec<u8>,
    /// Document quality of the accepted attempt
    pub quality: u8,
    pub attempts: usize,
    pub pages: Vec<PageSummary>,
}

#[derive(Debug, Clone)]
pub enum AssemblyOutcome {
    Fitted(AssembledPdf),
    Cancelled,
    /// Every scheduled quality produced an oversized document
    Exhausted {
        attempts: usize,
        last_size: usize,
        last_quality: u8,
    },
}

/// A report that reached storage
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub path: PathBuf,
    pub record: ReportRecord,
    pub size: usize,
    pub quality: u8,
    pub pages: Vec<PageSummary>,
}

#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    Success(GeneratedReport),
    Cancelled,
    Failed { message: String },
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, GenerationOutcome::Cancelled)
    }

    pub fn report(&self) -> Option<&GeneratedReport> {
        match self {
            GenerationOutcome::Success(report) => Some(report),
            _ => None,
        }
    }
}

/// Turns report snapshots into stored PDF files
pub struct ReportGenerator {
    config: EngineConfig,
    processor: ImageProcessor,
    output: Arc<dyn OutputSink>,
    logo: Option<DynamicImage>,
}

impl ReportGenerator {
    /// Create a generator, loading the logo named by the configuration
    pub fn new(config: EngineConfig, source: Arc<dyn ImageSource>, output: Arc<dyn OutputSink>) -> ReportResult<Self> {
        config.validate()?;
        let logo = config.logo_path.as_deref().and_then(load_logo);
        Ok(Self {
            config,
            processor: ImageProcessor::new(source),
            output,
            logo,
        })
    }

    /// Replace the header logo; `None` draws the placeholder block
    pub fn with_logo(mut self, logo: Option<DynamicImage>) -> Self {
        self.logo = logo;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Pages the document will have, as reported to progress callbacks
    pub fn total_pages(&self, document: &ReportDocument) -> usize {
        self.planner().plan_document(document).len()
    }

    fn planner(&self) -> PaginationPlanner<'_> {
        PaginationPlanner::new(&self.processor, self.config.image_limit_policy)
    }

    /// Render the document under the size ceiling without writing it
    pub fn assemble(
        &self,
        document: &ReportDocument,
        progress: &dyn ProgressCallback,
        cancel: &dyn CancellationCheck,
    ) -> AssemblyOutcome {
        if cancel.is_cancelled() {
            return AssemblyOutcome::Cancelled;
        }
        let plans = self.planner().plan_document(document);
        let total = plans.len();
        let start = document_quality(document.total_images());
        let ceiling = self.config.size_ceiling_bytes;
        info!(
            "Generating report: {} pages, {} images, starting quality {}",
            total,
            document.total_images(),
            start
        );

        let mut attempts = 0;
        let mut last = (0, start);
        for quality in QualitySchedule::new(start, self.config.quality_step, self.config.quality_floor) {
            if cancel.is_cancelled() {
                info!("Generation cancelled before attempt {}", attempts + 1);
                return AssemblyOutcome::Cancelled;
            }
            attempts += 1;

            let renderer = PageRenderer::new(document, &self.processor, quality);
            let mut writer = DocumentWriter::new(self.logo.as_ref(), self.config.compress_streams);
            writer.set_info(DOCUMENT_TITLE, &document.general.supervisor);

            let mut pages = Vec::with_capacity(total);
            for (index, plan) in plans.iter().enumerate() {
                if cancel.is_cancelled() {
                    info!("Generation cancelled at page {} of {}", index + 1, total);
                    return AssemblyOutcome::Cancelled;
                }
                pages.push(renderer.render_page(&mut writer, plan));
                progress.on_page_complete(index + 1, total);
            }

            let bytes = writer.finish();
            info!(
                "Attempt {} at quality {}: {} bytes ({:.2} MB)",
                attempts,
                quality,
                bytes.len(),
                bytes.len() as f64 / 1_048_576.0
            );
            if bytes.len() <= ceiling {
                return AssemblyOutcome::Fitted(AssembledPdf {
                    bytes,
                    quality,
                    attempts,
                    pages,
                });
            }

            warn!(
                "PDF exceeds the {} byte ceiling at quality {}; retrying",
                ceiling, quality
            );
            progress.on_attempt_rejected(quality, bytes.len());
            last = (bytes.len(), quality);
        }

        AssemblyOutcome::Exhausted {
            attempts,
            last_size: last.0,
            last_quality: last.1,
        }
    }

    /// Render, size-check and store the report
    pub fn generate(
        &self,
        document: &ReportDocument,
        progress: &dyn ProgressCallback,
        cancel: &dyn CancellationCheck,
    ) -> GenerationOutcome {
        let assembled = match self.assemble(document, progress, cancel) {
            AssemblyOutcome::Fitted(assembled) => assembled,
            AssemblyOutcome::Cancelled => return GenerationOutcome::Cancelled,
            AssemblyOutcome::Exhausted {
                attempts,
                last_size,
                last_quality,
            } => {
                let err = ReportError::SizeCeilingExceeded {
                    size: last_size,
                    ceiling: self.config.size_ceiling_bytes,
                    quality: last_quality,
                };
                error!("{} after {} attempts", err, attempts);
                return GenerationOutcome::Failed {
                    message: err.to_string(),
                };
            }
        };

        if cancel.is_cancelled() {
            info!("Generation cancelled before writing");
            return GenerationOutcome::Cancelled;
        }

        let now = Local::now();
        let general = &document.general;
        let file_name = build_file_name(&general.supervisor, now);
        match self.output.write(&file_name, &assembled.bytes) {
            Ok(path) => GenerationOutcome::Success(GeneratedReport {
                record: ReportRecord {
                    title: format!("{} – {}", DOCUMENT_TITLE, general.supervision_date),
                    supervisor: general.supervisor.clone(),
                    date: general.supervision_date.clone(),
                    path: path.clone(),
                    created_at: now.timestamp_millis(),
                },
                path,
                size: assembled.bytes.len(),
                quality: assembled.quality,
                pages: assembled.pages,
            }),
            Err(e) => {
                error!("Failed to store report {}: {}", file_name, e);
                GenerationOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }
}

/// Decode the header logo; a missing or broken file only costs the logo
fn load_logo(path: &Path) -> Option<DynamicImage> {
    let loaded = std::fs::read(path)
        .map_err(|e| e.to_string())
        .and_then(|bytes| image::load_from_memory(&bytes).map_err(|e| e.to_string()));
    match loaded {
        Ok(logo) => Some(logo),
        Err(e) => {
            warn!("Logo {} unavailable, drawing placeholder: {}", path.display(), e);
            None
        }
    }
}
