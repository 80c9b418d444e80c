use crate::{
    foundation::error::{CubistError, CubistResult},
    sections::faces::{CubeFace, CubeFaceMap},
};

/// Identifier of one top-level page section. The set is closed for the
/// lifetime of the process.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    Home,
    Services,
    About,
    Portfolio,
    Tech,
    Contact,
}

impl SectionId {
    pub const ALL: [SectionId; 6] = [
        SectionId::Home,
        SectionId::Services,
        SectionId::About,
        SectionId::Portfolio,
        SectionId::Tech,
        SectionId::Contact,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Services => "services",
            Self::About => "about",
            Self::Portfolio => "portfolio",
            Self::Tech => "tech",
            Self::Contact => "contact",
        }
    }

    pub fn parse(s: &str) -> CubistResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(Self::Home),
            "services" => Ok(Self::Services),
            "about" => Ok(Self::About),
            "portfolio" => Ok(Self::Portfolio),
            "tech" => Ok(Self::Tech),
            "contact" => Ok(Self::Contact),
            other => Err(CubistError::validation(format!(
                "unknown section id '{other}'"
            ))),
        }
    }

    pub(crate) fn idx(self) -> usize {
        self as usize
    }
}

/// One navigable section: identifier, display label and explicit rank.
///
/// `rank` is the total order used for adjacency and rotation direction; the
/// ordering contract is part of the data, not of any collection's iteration
/// order.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SectionDescriptor {
    pub id: SectionId,
    pub label: String,
    pub rank: u32,
}

/// Neighbors of a section in registry order. Absent at the boundary ends,
/// no wraparound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdjacentSections {
    pub previous: Option<SectionId>,
    pub next: Option<SectionId>,
}

/// Immutable ordered list of navigable sections plus the static face map.
#[derive(Clone, Debug)]
pub struct SectionRegistry {
    sections: Vec<SectionDescriptor>,
    faces: CubeFaceMap,
}

impl SectionRegistry {
    /// The production registry: six sections in page order with the
    /// standard face assignment.
    pub fn standard() -> Self {
        let sections = [
            (SectionId::Home, "Home"),
            (SectionId::Services, "Services"),
            (SectionId::About, "About"),
            (SectionId::Portfolio, "Portfolio"),
            (SectionId::Tech, "Tech"),
            (SectionId::Contact, "Contact"),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (id, label))| SectionDescriptor {
            id,
            label: label.to_string(),
            rank: i as u32,
        })
        .collect();

        Self {
            sections,
            faces: CubeFaceMap::standard(),
        }
    }

    /// Build a registry from descriptors and a face map, validating the
    /// ordering contract and face bijection. Configuration errors here are
    /// fatal at startup; there is no runtime fallback for an unroutable
    /// section.
    pub fn new(sections: Vec<SectionDescriptor>, faces: CubeFaceMap) -> CubistResult<Self> {
        if sections.is_empty() {
            return Err(CubistError::validation("registry must not be empty"));
        }
        for pair in sections.windows(2) {
            if pair[1].rank <= pair[0].rank {
                return Err(CubistError::validation(
                    "section ranks must be strictly increasing",
                ));
            }
        }
        let mut seen = [false; SectionId::ALL.len()];
        for desc in &sections {
            if seen[desc.id.idx()] {
                return Err(CubistError::validation(format!(
                    "duplicate section '{}'",
                    desc.id.as_str()
                )));
            }
            seen[desc.id.idx()] = true;
        }
        Ok(Self { sections, faces })
    }

    /// Ordered section descriptors.
    pub fn sections(&self) -> &[SectionDescriptor] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn contains(&self, id: SectionId) -> bool {
        self.sections.iter().any(|d| d.id == id)
    }

    /// Position of `id` in registry order. Unknown ids are a programmer
    /// error surfaced as validation failure.
    pub fn index_of(&self, id: SectionId) -> CubistResult<usize> {
        self.sections
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| {
                CubistError::validation(format!("section '{}' not in registry", id.as_str()))
            })
    }

    pub fn label_of(&self, id: SectionId) -> CubistResult<&str> {
        let i = self.index_of(id)?;
        Ok(&self.sections[i].label)
    }

    pub fn face_for_section(&self, id: SectionId) -> CubeFace {
        self.faces.face_for_section(id)
    }

    pub fn section_for_face(&self, face: CubeFace) -> SectionId {
        self.faces.section_for_face(face)
    }

    /// Previous/next sections of `id`, absent at the two boundary ends.
    pub fn adjacent(&self, id: SectionId) -> CubistResult<AdjacentSections> {
        let i = self.index_of(id)?;
        Ok(AdjacentSections {
            previous: i.checked_sub(1).map(|p| self.sections[p].id),
            next: self.sections.get(i + 1).map(|d| d.id),
        })
    }
}
