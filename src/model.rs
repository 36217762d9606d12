//! Report document snapshot handed over by the capture front-end
//!
//! The engine only ever borrows a [`ReportDocument`]; it never mutates it.

use serde::{Deserialize, Serialize};

use crate::error::ReportResult;
use crate::sections::SectionId;

/// Default worksite, as preset by the capture form
pub const DEFAULT_WORKSITE: &str = "Zona de Transmisión Monclova - Sabinas";

/// General data shown on the first page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralData {
    pub worksite: String,
    pub installation: String,
    pub supervision_date: String,
    pub activity: String,
    pub crews: Vec<String>,
    pub crew_responsible: String,
    pub crew_members: Vec<String>,
    pub supervisor: String,
    pub specialty: String,
}

impl Default for GeneralData {
    fn default() -> Self {
        Self {
            worksite: DEFAULT_WORKSITE.to_string(),
            installation: String::new(),
            supervision_date: String::new(),
            activity: String::new(),
            crews: Vec::new(),
            crew_responsible: String::new(),
            crew_members: Vec::new(),
            supervisor: String::new(),
            specialty: String::new(),
        }
    }
}

impl GeneralData {
    /// Label/value rows of the general-data table, in drawing order
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Centro de Trabajo:", self.worksite.clone()),
            ("Instalación:", self.installation.clone()),
            ("Fecha de Supervisión:", self.supervision_date.clone()),
            ("Actividad:", self.activity.clone()),
            ("Cuadrilla:", self.crews.join(", ")),
            ("Responsable de Cuadrilla:", self.crew_responsible.clone()),
            ("Integrantes de Cuadrilla:", self.crew_members.join(", ")),
            ("Supervisor:", self.supervisor.clone()),
            ("Especialidad:", self.specialty.clone()),
        ]
    }
}

/// Captured content of one evidence section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    /// Free text mode when true, image evidence mode otherwise
    pub use_text: bool,
    pub primary_text: String,
    /// Caption drawn under the images in image mode
    pub alternative_text: String,
    /// Opaque image locators, in capture order
    pub image_refs: Vec<String>,
    /// Replaces the default footer when not blank
    pub note: String,
}

impl Section {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            use_text: true,
            primary_text: text.into(),
            ..Self::default()
        }
    }

    pub fn images<I, S>(refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            image_refs: refs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.alternative_text = caption.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn has_note(&self) -> bool {
        !self.note.trim().is_empty()
    }
}

/// Complete form snapshot: general data plus sections A-J
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportDocument {
    pub general: GeneralData,
    sections: [Section; 10],
}

impl ReportDocument {
    pub fn new(general: GeneralData) -> Self {
        Self {
            general,
            sections: Default::default(),
        }
    }

    pub fn from_json(json: &str) -> ReportResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> ReportResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn section(&self, id: SectionId) -> &Section {
        &self.sections[id.index()]
    }

    pub fn section_mut(&mut self, id: SectionId) -> &mut Section {
        &mut self.sections[id.index()]
    }

    pub fn with_section(mut self, id: SectionId, section: Section) -> Self {
        self.sections[id.index()] = section;
        self
    }

    /// Sections in page order (A to J)
    pub fn sections(&self) -> impl Iterator<Item = (SectionId, &Section)> {
        SectionId::ALL.into_iter().map(move |id| (id, self.section(id)))
    }

    /// Image count across every section, as captured
    pub fn total_images(&self) -> usize {
        self.sections.iter().map(|s| s.image_refs.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_rows_order() {
        let general = GeneralData {
            crews: vec!["L1".into(), "L2".into()],
            crew_members: vec!["Ana".into(), "Luis".into()],
            ..GeneralData::default()
        };
        let rows = general.rows();
        assert_eq!(rows.len(), 9);
        assert_eq!(rows[0], ("Centro de Trabajo:", DEFAULT_WORKSITE.to_string()));
        assert_eq!(rows[4].1, "L1, L2");
        assert_eq!(rows[6].1, "Ana, Luis");
        assert_eq!(rows[8].0, "Especialidad:");
    }

    #[test]
    fn test_sections_in_page_order() {
        let doc = ReportDocument::default()
            .with_section(SectionId::C, Section::images(["a.jpg", "b.jpg"]))
            .with_section(SectionId::J, Section::text("hola"));
        let ids: Vec<SectionId> = doc.sections().map(|(id, _)| id).collect();
        assert_eq!(ids, SectionId::ALL.to_vec());
        assert_eq!(doc.total_images(), 2);
        assert!(doc.section(SectionId::J).use_text);
    }

    #[test]
    fn test_json_snapshot_with_missing_fields() {
        let doc = ReportDocument::from_json(r#"{"general": {"supervisor": "Juan"}}"#).unwrap();
        assert_eq!(doc.general.supervisor, "Juan");
        assert_eq!(doc.general.worksite, DEFAULT_WORKSITE);
        assert_eq!(doc.total_images(), 0);

        let round = ReportDocument::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(round, doc);
    }

    #[test]
    fn test_blank_note_is_not_a_note() {
        assert!(!Section::default().with_note("   ").has_note());
        assert!(Section::default().with_note("revisar").has_note());
    }
}
