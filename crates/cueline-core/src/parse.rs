//! Best-effort parser for the Pro Tools plain-text session export.
//!
//! The export is line oriented and loosely structured: a handful of
//! header keys, `TRACK NAME:` lines opening track sections, and one
//! tab-separated region line per placed clip. Unrecognized lines are
//! skipped and counted rather than failing the parse; only a file that
//! yields zero regions is unusable.

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::{
    model::{DEFAULT_FRAME_RATE, DEFAULT_TRACK_NAME, Region, Session, Track, TrackKind},
    time::timecode_to_frames,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("session export contains no regions")]
    EmptySession,
}

const KEY_SESSION_NAME: &str = "SESSION NAME";
const KEY_SAMPLE_RATE: &str = "SAMPLE RATE";
const KEY_TIMECODE_FORMAT: &str = "TIMECODE FORMAT";
const KEY_FRAME_RATE: &str = "FRAME RATE";
const KEY_TRACK_NAME: &str = "TRACK NAME";

/// A region line before duration inference has run.
#[derive(Debug)]
struct RawRegion {
    name: String,
    track_name: String,
    start_frame: u64,
    explicit_stop: Option<u64>,
}

/// Parse one export into a [`Session`].
///
/// `file_name` is the display name of the source file; it seeds the
/// session title when the header carries no `SESSION NAME` field. Missing
/// frame rate defaults to 25 fps, missing sample rate to 0.0.
#[instrument(skip(text), fields(file_name = %file_name, bytes = text.len()))]
pub fn parse_session(text: &str, file_name: &str) -> Result<Session, ParseError> {
    let mut title: Option<String> = None;
    let mut frame_rate: Option<u32> = None;
    let mut sample_rate: Option<f64> = None;
    let mut tracks: Vec<Track> = Vec::new();
    let mut raw_regions: Vec<RawRegion> = Vec::new();
    let mut current_track: Option<String> = None;
    let mut skipped_lines = 0_usize;

    for line in text.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        if let Some(value) = header_value(line, KEY_SESSION_NAME) {
            title = Some(value.to_string());
            continue;
        }
        if let Some(value) = header_value(line, KEY_SAMPLE_RATE) {
            sample_rate = value.split_whitespace().next().and_then(|v| v.parse().ok());
            continue;
        }
        if let Some(value) =
            header_value(line, KEY_TIMECODE_FORMAT).or_else(|| header_value(line, KEY_FRAME_RATE))
        {
            frame_rate = leading_integer(value);
            continue;
        }
        if let Some(value) = header_value(line, KEY_TRACK_NAME) {
            let name = value.to_string();
            if !tracks.iter().any(|track| track.name == name) {
                tracks.push(Track::new(name.clone()));
            }
            current_track = Some(name);
            continue;
        }

        // Region line or noise. Header keys precede the body in the
        // export, so the frame rate seen here is final.
        let rate = frame_rate.unwrap_or(DEFAULT_FRAME_RATE);
        match region_line(line, rate) {
            Some((start_frame, explicit_stop, name)) => {
                let track_name = current_track.clone().unwrap_or_else(|| {
                    let name = DEFAULT_TRACK_NAME.to_string();
                    if !tracks.iter().any(|track| track.name == name) {
                        tracks.push(Track::new(name.clone()));
                    }
                    name
                });
                raw_regions.push(RawRegion {
                    name,
                    track_name,
                    start_frame,
                    explicit_stop,
                });
            }
            None => {
                skipped_lines += 1;
                debug!(line, "skipped unrecognized line");
            }
        }
    }

    if raw_regions.is_empty() {
        return Err(ParseError::EmptySession);
    }

    let frame_rate = frame_rate.unwrap_or(DEFAULT_FRAME_RATE);
    let regions = infer_durations(raw_regions, &tracks);
    let (start_frame, stop_frame) = Session::boundaries(&regions);

    if skipped_lines > 0 {
        warn!(skipped_lines, "export contained unrecognized lines");
    }

    Ok(Session {
        title: title.unwrap_or_else(|| crate::render::report_title(file_name)),
        file_name: file_name.to_string(),
        frame_rate,
        sample_rate: sample_rate.unwrap_or(0.0),
        regions,
        tracks,
        start_frame,
        stop_frame,
        skipped_lines,
    })
}

/// Match a header key at the start of a line; the value is whatever
/// follows the key and any adjacent `:` / tab / space noise.
fn header_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let prefix = line.get(..key.len())?;
    if !prefix.eq_ignore_ascii_case(key) {
        return None;
    }
    let value = line[key.len()..].trim_start_matches([':', '\t', ' ']);
    Some(value.trim())
}

fn leading_integer(value: &str) -> Option<u32> {
    let digits: String = value.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Recognize `START<TAB>NAME` and `START<TAB>END<TAB>NAME` region lines.
fn region_line(line: &str, frame_rate: u32) -> Option<(u64, Option<u64>, String)> {
    let fields: Vec<&str> = line.split('\t').collect();
    match fields.as_slice() {
        [start, name] => {
            let start_frame = timecode_to_frames(start, frame_rate).ok()?;
            let name = name.trim();
            (!name.is_empty()).then(|| (start_frame, None, name.to_string()))
        }
        [start, end, name] => {
            let start_frame = timecode_to_frames(start, frame_rate).ok()?;
            let stop_frame = timecode_to_frames(end, frame_rate).ok()?;
            let name = name.trim();
            (!name.is_empty()).then(|| (start_frame, Some(stop_frame), name.to_string()))
        }
        _ => None,
    }
}

/// Resolve region stop frames. Explicit ends win; otherwise a region runs
/// until the next region on the same track (by ascending start), and a
/// trailing region with no successor gets length zero.
fn infer_durations(raw: Vec<RawRegion>, tracks: &[Track]) -> Vec<Region> {
    let mut resolved_stops: Vec<Option<u64>> = raw.iter().map(|r| r.explicit_stop).collect();

    for track in tracks {
        let mut indices: Vec<usize> = (0..raw.len())
            .filter(|&i| raw[i].track_name == track.name)
            .collect();
        indices.sort_by_key(|&i| raw[i].start_frame);

        for (position, &index) in indices.iter().enumerate() {
            if resolved_stops[index].is_some() {
                continue;
            }
            match indices.get(position + 1) {
                Some(&next) => resolved_stops[index] = Some(raw[next].start_frame),
                None => {
                    warn!(
                        region = %raw[index].name,
                        track = %track.name,
                        "no end timecode and no successor; region gets length zero"
                    );
                    resolved_stops[index] = Some(raw[index].start_frame);
                }
            }
        }
    }

    raw.into_iter()
        .zip(resolved_stops)
        .map(|(region, stop)| {
            let is_mono = TrackKind::from_track_name(&region.track_name) == TrackKind::Mono;
            Region::new(
                region.name,
                region.track_name,
                region.start_frame,
                stop.unwrap_or(region.start_frame),
                is_mono,
            )
        })
        .collect()
}
