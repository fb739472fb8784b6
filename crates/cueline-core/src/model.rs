use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_FRAME_RATE: u32 = 25;
pub const DEFAULT_TRACK_NAME: &str = "Main";
pub const STEREO_MARKER: &str = "(stereo)";

/// One placed audio clip, as read from the session export. The parser is
/// the sole creator; regions are never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    pub track_name: String,
    pub start_frame: u64,
    pub stop_frame: u64,
    pub length: u64,
    pub is_mono: bool,
}

impl Region {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        track_name: impl Into<String>,
        start_frame: u64,
        stop_frame: u64,
        is_mono: bool,
    ) -> Self {
        let stop_frame = stop_frame.max(start_frame);
        Self {
            name: name.into(),
            track_name: track_name.into(),
            start_frame,
            stop_frame,
            length: stop_frame - start_frame,
            is_mono,
        }
    }

    /// Closed-interval overlap with a frame window.
    #[must_use]
    pub fn overlaps(&self, window_start: u64, window_stop: u64) -> bool {
        self.start_frame <= window_stop && self.stop_frame >= window_start
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Mono,
    Stereo,
}

impl TrackKind {
    /// Classify a track from its export name. Pro Tools marks stereo
    /// lanes with a "(Stereo)" suffix; everything else is mono.
    #[must_use]
    pub fn from_track_name(name: &str) -> Self {
        if name.to_lowercase().contains(STEREO_MARKER) {
            Self::Stereo
        } else {
            Self::Mono
        }
    }
}

/// One named track lane. Created once per distinct name encountered while
/// parsing, in first-seen order; only `selected` changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Track {
    pub name: String,
    pub kind: TrackKind,
    pub selected: bool,
}

impl Track {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = TrackKind::from_track_name(&name);
        Self {
            name,
            kind,
            selected: true,
        }
    }

    #[must_use]
    pub fn is_mono(&self) -> bool {
        self.kind == TrackKind::Mono
    }
}

/// One row of the derived report: a (possibly reduced or merged) name,
/// the raw names folded into it, and the summed length in frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegionUsage {
    pub id: Uuid,
    pub name: String,
    pub original_names: Vec<String>,
    pub length: u64,
    pub first_frame: u64,
}

impl RegionUsage {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        original_name: impl Into<String>,
        length: u64,
        first_frame: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            original_names: vec![original_name.into()],
            length,
            first_frame,
        }
    }

    /// Fold another entry into this one: lengths sum, provenance
    /// concatenates, the earliest first frame wins. Name and id stay.
    pub fn absorb(&mut self, other: RegionUsage) {
        self.length += other.length;
        self.original_names.extend(other.original_names);
        self.first_frame = self.first_frame.min(other.first_frame);
    }
}

/// Active ordering of the usage collection. A single global toggle, not
/// per-row state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    ByName,
    #[default]
    ByFirstFrame,
}

/// Filter configuration driving usage generation. `ignore_shorter_than`
/// and the selection range are in frames; zero/degenerate values disable
/// the corresponding filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UsageConfig {
    pub ignore_fade: bool,
    pub ignore_shorter_than: u64,
    pub strip_extension_suffix: bool,
    pub strip_new_suffix: bool,
    pub combine_similar: bool,
    pub selection_start: u64,
    pub selection_stop: u64,
    pub sort_key: SortKey,
}

impl UsageConfig {
    /// A selection window with `stop <= start` is unset and clips nothing.
    #[must_use]
    pub fn selection_active(&self) -> bool {
        self.selection_stop > self.selection_start
    }
}

/// Everything parsed out of one export file. Owned by the engine; all
/// mutation goes through engine operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub title: String,
    pub file_name: String,
    pub frame_rate: u32,
    pub sample_rate: f64,
    pub regions: Vec<Region>,
    pub tracks: Vec<Track>,
    pub start_frame: u64,
    pub stop_frame: u64,
    pub skipped_lines: usize,
}

impl Session {
    /// Min start / max stop over all regions, recomputed whenever the
    /// region collection changes.
    #[must_use]
    pub fn boundaries(regions: &[Region]) -> (u64, u64) {
        let start = regions.iter().map(|r| r.start_frame).min().unwrap_or(0);
        let stop = regions.iter().map(|r| r.stop_frame).max().unwrap_or(0);
        (start, stop)
    }

    #[must_use]
    pub fn track(&self, name: &str) -> Option<&Track> {
        self.tracks.iter().find(|track| track.name == name)
    }

    #[must_use]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}
