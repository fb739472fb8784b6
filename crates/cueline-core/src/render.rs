//! Plain-text report rendering: one line per usage entry, optionally
//! prefixed with the entry's summed length as a timecode.

use crate::{
    model::RegionUsage,
    time::{TimecodeError, frames_to_timecode},
};

/// Format the final listing. With `include_frames` each line reads
/// `HH:MM:SS:FF<TAB>name`; without it the name stands alone.
pub fn render_listing(
    usages: &[RegionUsage],
    frame_rate: u32,
    include_frames: bool,
) -> Result<String, TimecodeError> {
    let mut out = String::new();
    for usage in usages {
        if include_frames {
            let timecode = frames_to_timecode(usage.length, frame_rate, true)?;
            out.push_str(&timecode);
            out.push('\t');
        }
        out.push_str(&usage.name);
        out.push('\n');
    }
    Ok(out)
}

/// Report header line: the session file name with its extension stripped.
#[must_use]
pub fn report_title(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(0) | None => file_name.to_string(),
        Some(index) => file_name[..index].to_string(),
    }
}
