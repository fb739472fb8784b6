//! The region-usage engine: owns one parsed [`Session`], the current
//! [`UsageConfig`], and the live usage collection derived from them.
//!
//! Configuration and track-selection changes rebuild the collection from
//! the regions; the row edits (`combine_manually`, `delete_entries`,
//! `rename`) mutate the live collection directly and survive until the
//! next rebuild. Entries carry stable ids so edits stay unambiguous while
//! the collection reorders; row indices are translated to ids at the
//! public boundary.

use thiserror::Error;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    model::{Region, RegionUsage, Session, SortKey, Track, TrackKind, UsageConfig},
    parse::{self, ParseError},
    reduce::{self, NameToken},
    render,
    time::TimecodeError,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("track not found: {0}")]
    TrackNotFound(String),
    #[error("usage index out of range: {index} (collection has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("manual combine needs at least two in-bounds entries, got {0}")]
    InvalidSelection(usize),
}

#[derive(Debug, Clone)]
pub struct Engine {
    session: Session,
    config: UsageConfig,
    usages: Vec<RegionUsage>,
}

impl Engine {
    /// Parse an export and build the initial usage collection with the
    /// given configuration. The caller supplies file contents; the engine
    /// never touches the filesystem.
    pub fn load(text: &str, file_name: &str, config: UsageConfig) -> Result<Self, ParseError> {
        let session = parse::parse_session(text, file_name)?;
        let mut engine = Self {
            session,
            config,
            usages: Vec::new(),
        };
        engine.generate();
        Ok(engine)
    }

    #[must_use]
    pub fn from_session(session: Session, config: UsageConfig) -> Self {
        let mut engine = Self {
            session,
            config,
            usages: Vec::new(),
        };
        engine.generate();
        engine
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn config(&self) -> &UsageConfig {
        &self.config
    }

    #[must_use]
    pub fn usages(&self) -> &[RegionUsage] {
        &self.usages
    }

    /// Replace the filter configuration and rebuild.
    #[instrument(skip(self, config))]
    pub fn configure(&mut self, config: UsageConfig) {
        self.config = config;
        self.generate();
    }

    /// Toggle one track's selection state and rebuild.
    #[instrument(skip(self), fields(track = %name, enabled))]
    pub fn select_track(&mut self, name: &str, enabled: bool) -> Result<(), EngineError> {
        let track = self
            .session
            .tracks
            .iter_mut()
            .find(|track| track.name == name)
            .ok_or_else(|| EngineError::TrackNotFound(name.to_string()))?;
        track.selected = enabled;
        self.generate();
        Ok(())
    }

    /// Select or deselect every track at once.
    #[instrument(skip(self))]
    pub fn select_all_tracks(&mut self, enabled: bool) {
        for track in &mut self.session.tracks {
            track.selected = enabled;
        }
        self.generate();
    }

    /// Select or deselect all tracks of one kind (the original app's
    /// "select all mono/stereo tracks" menu items).
    #[instrument(skip(self))]
    pub fn select_tracks_of_kind(&mut self, kind: TrackKind, enabled: bool) {
        for track in &mut self.session.tracks {
            if track.kind == kind {
                track.selected = enabled;
            }
        }
        self.generate();
    }

    /// Clip the considered regions to a frame window; a window with
    /// `stop <= start` disables clipping.
    #[instrument(skip(self))]
    pub fn set_selection_range(&mut self, start: u64, stop: u64) {
        self.config.selection_start = start;
        self.config.selection_stop = stop;
        self.generate();
    }

    /// Rebuild the usage collection from the session's regions and the
    /// current configuration.
    #[instrument(skip(self), fields(file = %self.session.file_name))]
    pub fn generate(&mut self) {
        self.usages = generate_usages(&self.session.regions, &self.session.tracks, &self.config);
        info!(entries = self.usages.len(), "usage listing generated");
    }

    /// Merge the entries at the given row positions into one. The entry
    /// at the first listed index keeps its name and id; lengths sum and
    /// provenance concatenates in listed order.
    #[instrument(skip(self))]
    pub fn combine_manually(&mut self, indices: &[usize]) -> Result<RegionUsage, EngineError> {
        let ids = self.ids_for(indices)?;
        if ids.len() < 2 {
            return Err(EngineError::InvalidSelection(ids.len()));
        }

        let Some((&base_id, rest)) = ids.split_first() else {
            return Err(EngineError::InvalidSelection(0));
        };
        let rest: Vec<Uuid> = rest.to_vec();
        for id in rest {
            if let Some(absorbed) = self.take_by_id(id)
                && let Some(base) = self.usage_by_id_mut(base_id)
            {
                base.absorb(absorbed);
            }
        }

        let merged = self
            .usage_by_id_mut(base_id)
            .ok_or(EngineError::InvalidSelection(ids.len()))?
            .clone();
        info!(merged = %merged.name, entries = self.usages.len(), "entries combined manually");
        Ok(merged)
    }

    /// Remove the entries at the given row positions. Out-of-range
    /// indices are ignored, matching the export's best-effort philosophy.
    #[instrument(skip(self))]
    pub fn delete_entries(&mut self, indices: &[usize]) {
        let ids: Vec<Uuid> = indices
            .iter()
            .filter_map(|&index| {
                let id = self.usages.get(index).map(|usage| usage.id);
                if id.is_none() {
                    debug!(index, "ignored out-of-range delete index");
                }
                id
            })
            .collect();
        self.usages.retain(|usage| !ids.contains(&usage.id));
    }

    /// Replace one entry's display name. Provenance and length stay.
    #[instrument(skip(self, new_name))]
    pub fn rename(&mut self, index: usize, new_name: &str) -> Result<(), EngineError> {
        let len = self.usages.len();
        let usage = self
            .usages
            .get_mut(index)
            .ok_or(EngineError::IndexOutOfRange { index, len })?;
        usage.name = new_name.to_string();
        Ok(())
    }

    /// Render the current collection as the final report text.
    pub fn render_listing(&self, include_frames: bool) -> Result<String, TimecodeError> {
        render::render_listing(&self.usages, self.session.frame_rate, include_frames)
    }

    #[must_use]
    pub fn report_title(&self) -> String {
        render::report_title(&self.session.file_name)
    }

    /// Translate row indices to stable ids, rejecting the whole selection
    /// on any out-of-range index. Duplicates collapse.
    fn ids_for(&self, indices: &[usize]) -> Result<Vec<Uuid>, EngineError> {
        let mut ids = Vec::with_capacity(indices.len());
        for &index in indices {
            let usage = self
                .usages
                .get(index)
                .ok_or(EngineError::InvalidSelection(indices.len()))?;
            if !ids.contains(&usage.id) {
                ids.push(usage.id);
            }
        }
        Ok(ids)
    }

    fn usage_by_id_mut(&mut self, id: Uuid) -> Option<&mut RegionUsage> {
        self.usages.iter_mut().find(|usage| usage.id == id)
    }

    fn take_by_id(&mut self, id: Uuid) -> Option<RegionUsage> {
        let position = self.usages.iter().position(|usage| usage.id == id)?;
        Some(self.usages.remove(position))
    }
}

/// The canonical rebuild path: filter, reduce, group, auto-combine, sort.
/// Pure with respect to the caller's regions and tracks.
#[must_use]
pub fn generate_usages(
    regions: &[Region],
    tracks: &[Track],
    config: &UsageConfig,
) -> Vec<RegionUsage> {
    let mut usages: Vec<RegionUsage> = Vec::new();

    for region in regions {
        let track_selected = tracks
            .iter()
            .any(|track| track.name == region.track_name && track.selected);
        if !track_selected {
            continue;
        }
        if config.selection_active()
            && !region.overlaps(config.selection_start, config.selection_stop)
        {
            continue;
        }
        if config.ignore_fade && reduce::classify(&region.name) == NameToken::Fade {
            continue;
        }
        if config.ignore_shorter_than > 0 && region.length < config.ignore_shorter_than {
            continue;
        }

        let reduced = reduce::reduce_name(
            &region.name,
            config.strip_extension_suffix,
            config.strip_new_suffix,
        );

        // Identical reduced names always merge, in region-encounter order.
        let entry = RegionUsage::new(
            reduced,
            region.name.clone(),
            region.length,
            region.start_frame,
        );
        match usages.iter().position(|usage| usage.name == entry.name) {
            Some(position) => usages[position].absorb(entry),
            None => usages.push(entry),
        }
    }

    if config.combine_similar {
        combine_similar(&mut usages);
    }

    match config.sort_key {
        SortKey::ByName => usages.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        SortKey::ByFirstFrame => usages.sort_by_key(|usage| usage.first_frame),
    }

    usages
}

/// Pairwise merge to a fixed point. Each pass scans for the first similar
/// pair, folds the later entry into the earlier one (the first-seen name
/// survives), and restarts; the collection only shrinks, so this
/// terminates.
fn combine_similar(usages: &mut Vec<RegionUsage>) {
    loop {
        let mut merge: Option<(usize, usize)> = None;
        'scan: for i in 0..usages.len() {
            for j in (i + 1)..usages.len() {
                if reduce::similar(&usages[i].name, &usages[j].name) {
                    merge = Some((i, j));
                    break 'scan;
                }
            }
        }
        match merge {
            Some((i, j)) => {
                let absorbed = usages.remove(j);
                usages[i].absorb(absorbed);
            }
            None => break,
        }
    }
}
