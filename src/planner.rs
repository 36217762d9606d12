//! Pagination planning
//!
//! Turns the document snapshot into an ordered list of [`PagePlan`]s before
//! anything is drawn. Plans carry the orientation decision, so photos are
//! decoded for their dimensions exactly once per generation.

use log::{debug, warn};

use crate::config::ImageLimitPolicy;
use crate::image_utils::ImageProcessor;
use crate::model::{ReportDocument, Section};
use crate::sections::SectionId;
use crate::types::Orientation;

/// Images drawn on a single page
pub const IMAGES_PER_PAGE: usize = 4;

pub const GENERAL_DATA_TITLE: &str = "Datos Generales";
pub const CONTINUATION_SUFFIX: &str = " (Continuación)";

/// What a planned page shows below its banner
#[derive(Debug, Clone, PartialEq)]
pub enum PageKind {
    /// The general data table
    General,
    /// Section free text
    Text,
    /// "Sin contenido capturado"
    Placeholder,
    /// Up to [`IMAGES_PER_PAGE`] photos; continuation pages skip the description
    Images { refs: Vec<String>, continuation: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    /// `None` for the general data page
    pub section: Option<SectionId>,
    pub kind: PageKind,
    pub orientation: Orientation,
    /// Images the whole section renders; drives the per-image quality
    pub section_images: usize,
}

impl PagePlan {
    pub fn general() -> Self {
        Self {
            section: None,
            kind: PageKind::General,
            orientation: Orientation::Portrait,
            section_images: 0,
        }
    }

    /// Banner title of the page
    pub fn title(&self) -> String {
        match (self.section, &self.kind) {
            (None, _) => GENERAL_DATA_TITLE.to_string(),
            (Some(id), PageKind::Images { continuation: true, .. }) => {
                format!("{}{}", id.title(), CONTINUATION_SUFFIX)
            }
            (Some(id), _) => id.title().to_string(),
        }
    }

    pub fn is_continuation(&self) -> bool {
        matches!(self.kind, PageKind::Images { continuation: true, .. })
    }

    pub fn image_refs(&self) -> &[String] {
        match &self.kind {
            PageKind::Images { refs, .. } => refs,
            _ => &[],
        }
    }
}

/// Pages needed by a section holding `image_count` images
pub fn planned_page_count(image_count: usize) -> usize {
    if image_count <= IMAGES_PER_PAGE {
        1
    } else {
        1 + (image_count - IMAGES_PER_PAGE).div_ceil(IMAGES_PER_PAGE)
    }
}

/// Builds page plans for sections and whole documents
pub struct PaginationPlanner<'a> {
    processor: &'a ImageProcessor,
    policy: ImageLimitPolicy,
}

impl<'a> PaginationPlanner<'a> {
    pub fn new(processor: &'a ImageProcessor, policy: ImageLimitPolicy) -> Self {
        Self { processor, policy }
    }

    /// General data page followed by every section in A-J order
    pub fn plan_document(&self, document: &ReportDocument) -> Vec<PagePlan> {
        let mut plans = vec![PagePlan::general()];
        for (id, section) in document.sections() {
            plans.extend(self.plan_section(id, section));
        }
        debug!("Planned {} pages", plans.len());
        plans
    }

    pub fn plan_section(&self, id: SectionId, section: &Section) -> Vec<PagePlan> {
        let refs = self.effective_refs(id, section);
        let page = |kind, orientation| PagePlan {
            section: Some(id),
            kind,
            orientation,
            section_images: refs.len(),
        };

        if section.use_text {
            let kind = if section.primary_text.trim().is_empty() {
                PageKind::Placeholder
            } else {
                PageKind::Text
            };
            let overflow = refs.get(IMAGES_PER_PAGE..).unwrap_or(&[]);
            if !refs.is_empty() {
                debug!(
                    "Section {:?} is in text mode; {} of {} images go to continuation pages",
                    id,
                    overflow.len(),
                    refs.len()
                );
            }
            let mut plans = vec![page(kind, Orientation::Portrait)];
            plans.extend(overflow.chunks(IMAGES_PER_PAGE).map(|group| {
                page(
                    PageKind::Images {
                        refs: group.to_vec(),
                        continuation: true,
                    },
                    Orientation::Portrait,
                )
            }));
            return plans;
        }

        if refs.is_empty() {
            return vec![page(PageKind::Placeholder, Orientation::Portrait)];
        }

        let plans: Vec<PagePlan> = refs
            .chunks(IMAGES_PER_PAGE)
            .enumerate()
            .map(|(index, group)| {
                page(
                    PageKind::Images {
                        refs: group.to_vec(),
                        continuation: index > 0,
                    },
                    self.orientation_for(group),
                )
            })
            .collect();
        debug!("Section {:?}: {} images on {} pages", id, refs.len(), plans.len());
        plans
    }

    /// Image references after applying the capture limit policy
    fn effective_refs<'s>(&self, id: SectionId, section: &'s Section) -> &'s [String] {
        let refs = section.image_refs.as_slice();
        let max = id.max_images();
        if refs.len() <= max {
            return refs;
        }
        match self.policy {
            ImageLimitPolicy::Clamp => {
                warn!(
                    "Section {:?} holds {} images, over its limit of {}; keeping the first {}",
                    id,
                    refs.len(),
                    max,
                    max
                );
                &refs[..max]
            }
            ImageLimitPolicy::Lenient => {
                warn!(
                    "Section {:?} holds {} images, over its limit of {}; rendering all of them",
                    id,
                    refs.len(),
                    max
                );
                refs
            }
        }
    }

    /// Landscape only for a lone image wider than tall
    fn orientation_for(&self, group: &[String]) -> Orientation {
        let [locator] = group else {
            return Orientation::Portrait;
        };
        match self.processor.dimensions(locator) {
            Ok((width, height)) if width > height => Orientation::Landscape,
            Ok(_) => Orientation::Portrait,
            Err(e) => {
                warn!("Cannot read dimensions of {}: {}", locator, e);
                Orientation::Portrait
            }
        }
    }
}
