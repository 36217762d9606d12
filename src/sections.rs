//! Static section table
//!
//! Every fact the engine knows about a section identifier lives in
//! [`SECTION_TABLE`]; planner, renderer and capture limits all read it
//! through [`SectionId::info`].

use serde::{Deserialize, Serialize};

/// The ten evidence sections of the report, in page order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SectionId {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
}

/// Fixed per-section data: capture limit, banner title and description
#[derive(Debug)]
pub struct SectionInfo {
    pub id: SectionId,
    pub max_images: usize,
    pub title: &'static str,
    pub description: &'static str,
}

pub static SECTION_TABLE: [SectionInfo; 10] = [
    SectionInfo {
        id: SectionId::A,
        max_images: 1,
        title: "A: Controles por verificar",
        description: "a) Planeación de Oficina (no aplica bajo emergencia)",
    },
    SectionInfo {
        id: SectionId::B,
        max_images: 1,
        title: "B: Orden de Trabajo",
        description: "B) Orden de Trabajo",
    },
    SectionInfo {
        id: SectionId::C,
        max_images: 2,
        title: "C: Planeación en campo",
        description: "c) Planeación en campo (ARS-RIM)",
    },
    SectionInfo {
        id: SectionId::D,
        max_images: 2,
        title: "D: Licencia de trabajo",
        description: "d) Solo si aplica, deberá contener imagen del registro y licencia del trabajo programado o licencia de emergencia.",
    },
    SectionInfo {
        id: SectionId::E,
        max_images: 5,
        title: "E: Evidencia de uso de equipo",
        description: "e) Imágenes en las que se observe que el uso de:\n\
            i. Uso de sistemas anticaídas arnés y línea de vida (con amortiguador o retráctil entre otros medios probados e igualmente eficaces).\n\
            ii. Uso de sistemas de posicionamiento (bandola, cordón de posicionamientos ajustable, entre otros medios probados y eficaces).\n\
            iii. Uso de dispositivos de ascenso y descenso controlado como lo son: línea de vida vertical con absorbedor de energía, ganchos de gran apertura, entre otros medios probados y eficaces.\n\
            iv. Para trabajos en canastillas, además, deberá: colocarse el freno de mano y otros dispositivos de frenado, se colocarán topes en las ruedas traseras en ambos sentidos.",
    },
    SectionInfo {
        id: SectionId::F,
        max_images: 3,
        title: "F: Delimitación de área",
        description: "f) Imágenes en que se observe el uso de:\n\
            Delimitación del área de trabajo, Uso de avisos preventivos, acordonamientos, barreras normalizadas, conos, líneas de restricción de movimiento, Respetar distancias de seguridad.",
    },
    SectionInfo {
        id: SectionId::G,
        max_images: 4,
        title: "G: Uso de equipo de protección",
        description: "g) Imágenes en que se observe el uso de equipo, herramienta y del equipo de protección personal.",
    },
    SectionInfo {
        id: SectionId::H,
        max_images: 4,
        title: "H: Acciones que salvan vidas",
        description: "h) Si aplica ARS–RIM, adjuntar imágenes de evidencia implementando Acciones que Salvan Vida (AQSV):\n\
            Apertura visible, bloqueos mecánicos, eléctricos, ausencia de potencial, instalación de puesta a tierra que correspondan.",
    },
    SectionInfo {
        id: SectionId::I,
        max_images: 1,
        title: "I: Selfie del supervisor",
        description: "i) Autorretrato (selfie) del supervisor ejecutando la supervisión en el lugar del trabajo, actividad o maniobra.",
    },
    SectionInfo {
        id: SectionId::J,
        max_images: 2,
        title: "J: Diagramas unifilares",
        description: "j) Si aplica de conformidad con ARS–RIM, adjuntar imágenes de diagramas unifilares eléctricos para ubicar la dirección eléctrica de trabajos, así como diagramas eléctricos y listado de cables del equipo o equipos a intervenir.",
    },
];

impl SectionId {
    /// All identifiers in page order
    pub const ALL: [SectionId; 10] = [
        SectionId::A,
        SectionId::B,
        SectionId::C,
        SectionId::D,
        SectionId::E,
        SectionId::F,
        SectionId::G,
        SectionId::H,
        SectionId::I,
        SectionId::J,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn info(self) -> &'static SectionInfo {
        &SECTION_TABLE[self.index()]
    }

    pub fn max_images(self) -> usize {
        self.info().max_images
    }

    pub fn title(self) -> &'static str {
        self.info().title
    }

    pub fn description(self) -> &'static str {
        self.info().description
    }
}
