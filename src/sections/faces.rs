use crate::{
    foundation::error::{CubistError, CubistResult},
    sections::registry::SectionId,
};

/// One of the six spatial faces of the transition cube.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CubeFace {
    Front,
    Right,
    Left,
    Top,
    Bottom,
    Back,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Front,
        CubeFace::Right,
        CubeFace::Left,
        CubeFace::Top,
        CubeFace::Bottom,
        CubeFace::Back,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Right => "right",
            Self::Left => "left",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Back => "back",
        }
    }

    pub(crate) fn idx(self) -> usize {
        self as usize
    }
}

/// Static bijection between cube faces and sections.
///
/// Validated at construction: every section has exactly one face and every
/// face exactly one section, so both lookups are total.
#[derive(Clone, Debug)]
pub struct CubeFaceMap {
    by_section: [CubeFace; 6],
    by_face: [SectionId; 6],
}

impl CubeFaceMap {
    /// The production assignment.
    pub fn standard() -> Self {
        // Known-good bijection; construction through `new` would succeed.
        Self {
            by_section: [
                CubeFace::Front,  // home
                CubeFace::Right,  // services
                CubeFace::Left,   // about
                CubeFace::Top,    // portfolio
                CubeFace::Bottom, // tech
                CubeFace::Back,   // contact
            ],
            by_face: [
                SectionId::Home,
                SectionId::Services,
                SectionId::About,
                SectionId::Portfolio,
                SectionId::Tech,
                SectionId::Contact,
            ],
        }
    }

    /// Build and validate a face map from `(section, face)` pairs.
    pub fn new(entries: &[(SectionId, CubeFace)]) -> CubistResult<Self> {
        if entries.len() != SectionId::ALL.len() {
            return Err(CubistError::validation(format!(
                "face map must cover all {} sections, got {} entries",
                SectionId::ALL.len(),
                entries.len()
            )));
        }

        let mut by_section = [None::<CubeFace>; 6];
        let mut by_face = [None::<SectionId>; 6];
        for &(section, face) in entries {
            if by_section[section.idx()].is_some() {
                return Err(CubistError::validation(format!(
                    "section '{}' mapped to more than one face",
                    section.as_str()
                )));
            }
            if by_face[face.idx()].is_some() {
                return Err(CubistError::validation(format!(
                    "face '{}' mapped to more than one section",
                    face.as_str()
                )));
            }
            by_section[section.idx()] = Some(face);
            by_face[face.idx()] = Some(section);
        }

        // Coverage of both domains follows from len == 6 and no duplicates.
        let by_section = std::array::from_fn(|i| match by_section[i] {
            Some(f) => f,
            None => CubeFace::Front,
        });
        let by_face = std::array::from_fn(|i| match by_face[i] {
            Some(s) => s,
            None => SectionId::Home,
        });
        Ok(Self {
            by_section,
            by_face,
        })
    }

    pub fn face_for_section(&self, id: SectionId) -> CubeFace {
        self.by_section[id.idx()]
    }

    pub fn section_for_face(&self, face: CubeFace) -> SectionId {
        self.by_face[face.idx()]
    }
}
