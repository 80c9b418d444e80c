use std::collections::BTreeMap;
use std::io::Cursor;

use base64::Engine as _;

use crate::{
    foundation::core::FrameRGBA,
    foundation::error::{CubistError, CubistResult},
    sections::registry::SectionId,
};

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// One cached section snapshot in its stored form: a PNG data URL plus the
/// capture metadata.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SnapshotRecord {
    pub section: SectionId,
    pub data_url: String,
    pub width: u32,
    pub height: u32,
    /// Monotonic counter distinguishing overwrites within a session.
    pub captured_version: u64,
}

impl SnapshotRecord {
    /// Decode the stored data URL back into a raster frame.
    pub fn decode(&self) -> CubistResult<FrameRGBA> {
        let b64 = self.data_url.strip_prefix(DATA_URL_PREFIX).ok_or_else(|| {
            CubistError::capture(format!(
                "snapshot for '{}' is not a PNG data URL",
                self.section.as_str()
            ))
        })?;
        let png = base64::engine::general_purpose::STANDARD
            .decode(b64)
            .map_err(|e| CubistError::capture(format!("snapshot base64 decode: {e}")))?;
        let img = image::load_from_memory_with_format(&png, image::ImageFormat::Png)
            .map_err(|e| CubistError::capture(format!("snapshot png decode: {e}")))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        FrameRGBA::from_raw(width, height, img.into_raw())
    }
}

/// Session-scoped key-value store: one snapshot slot per section plus the
/// ephemeral pending-navigation marker. Lives and dies with the session.
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    snapshots: BTreeMap<SectionId, SnapshotRecord>,
    pending_target: Option<SectionId>,
    version_counter: u64,
    snapshots_ready: bool,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `frame` and store it under `section`, overwriting any
    /// previous snapshot for that id.
    pub fn put_snapshot(&mut self, section: SectionId, frame: &FrameRGBA) -> CubistResult<()> {
        let data_url = encode_data_url(frame)?;
        self.version_counter += 1;
        self.snapshots.insert(
            section,
            SnapshotRecord {
                section,
                data_url,
                width: frame.width,
                height: frame.height,
                captured_version: self.version_counter,
            },
        );
        Ok(())
    }

    pub fn snapshot(&self, section: SectionId) -> Option<&SnapshotRecord> {
        self.snapshots.get(&section)
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }

    /// Signal flipped once the warm-up pass has processed every section.
    /// Nothing blocks on it; transitions tolerate missing snapshots.
    pub fn snapshots_ready(&self) -> bool {
        self.snapshots_ready
    }

    pub(crate) fn mark_snapshots_ready(&mut self) {
        self.snapshots_ready = true;
    }

    /// Best-effort marker for surviving a reload mid-transition.
    pub fn pending_target(&self) -> Option<SectionId> {
        self.pending_target
    }

    pub(crate) fn set_pending_target(&mut self, target: SectionId) {
        self.pending_target = Some(target);
    }

    pub(crate) fn clear_pending_target(&mut self) {
        self.pending_target = None;
    }
}

fn encode_data_url(frame: &FrameRGBA) -> CubistResult<String> {
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| CubistError::capture("frame buffer does not match its dimensions"))?;
    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| CubistError::capture(format!("snapshot png encode: {e}")))?;
    let b64 = base64::engine::general_purpose::STANDARD.encode(&png);
    Ok(format!("{DATA_URL_PREFIX}{b64}"))
}
