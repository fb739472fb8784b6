use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimecodeError {
    #[error("frame rate must be positive")]
    InvalidFrameRate,
    #[error("malformed timecode: {0:?}")]
    Malformed(String),
}

/// Render a frame count as zero-padded `HH:MM:SS` or `HH:MM:SS:FF`.
pub fn frames_to_timecode(
    frames: u64,
    frame_rate: u32,
    include_frames: bool,
) -> Result<String, TimecodeError> {
    if frame_rate == 0 {
        return Err(TimecodeError::InvalidFrameRate);
    }

    let fps = u64::from(frame_rate);
    let hours = frames / (fps * 3600);
    let minutes = (frames / (fps * 60)) % 60;
    let seconds = (frames / fps) % 60;
    let remainder = frames % fps;

    if include_frames {
        Ok(format!(
            "{hours:02}:{minutes:02}:{seconds:02}:{remainder:02}"
        ))
    } else {
        Ok(format!("{hours:02}:{minutes:02}:{seconds:02}"))
    }
}

/// Parse a colon-delimited `H:M:S[:F]` string into a frame count.
///
/// Fields are scaled, never clamped: `00:00:75:00` at 25 fps is 75
/// seconds' worth of frames. Only a wrong field count or a non-numeric
/// field is rejected.
pub fn timecode_to_frames(text: &str, frame_rate: u32) -> Result<u64, TimecodeError> {
    if frame_rate == 0 {
        return Err(TimecodeError::InvalidFrameRate);
    }

    let fields: Vec<&str> = text.trim().split(':').collect();
    if fields.len() != 3 && fields.len() != 4 {
        return Err(TimecodeError::Malformed(text.to_string()));
    }

    let mut values = [0_u64; 4];
    for (slot, field) in values.iter_mut().zip(&fields) {
        *slot = field
            .trim()
            .parse()
            .map_err(|_| TimecodeError::Malformed(text.to_string()))?;
    }

    let [hours, minutes, seconds, frames] = values;
    let fps = u64::from(frame_rate);
    let total = hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60)?.checked_add(h))
        .and_then(|s| s.checked_add(seconds))
        .and_then(|s| s.checked_mul(fps))
        .and_then(|f| f.checked_add(frames));
    // Fields huge enough to overflow a u64 frame count are noise, not
    // timecode; reject them like any other malformed field.
    total.ok_or_else(|| TimecodeError::Malformed(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timecode_round_trip_is_stable() {
        let frame_rate = 25;
        let frames = 143_999;
        let text = frames_to_timecode(frames, frame_rate, true).expect("format should succeed");
        let restored = timecode_to_frames(&text, frame_rate).expect("parse should succeed");
        assert_eq!(frames, restored);
    }

    #[test]
    fn formats_with_and_without_frame_field() {
        assert_eq!(
            frames_to_timecode(2_399, 25, true).expect("format should succeed"),
            "00:01:35:24"
        );
        assert_eq!(
            frames_to_timecode(2_399, 25, false).expect("format should succeed"),
            "00:01:35"
        );
    }

    #[test]
    fn three_field_timecode_parses_as_whole_seconds() {
        let frames = timecode_to_frames("00:01:35", 25).expect("parse should succeed");
        assert_eq!(frames, 95 * 25);
    }

    #[test]
    fn out_of_range_fields_scale_through() {
        let frames = timecode_to_frames("00:00:75:00", 25).expect("parse should succeed");
        assert_eq!(frames, 75 * 25);
    }

    #[test]
    fn rejects_wrong_shape_and_non_numeric_fields() {
        assert!(matches!(
            timecode_to_frames("00:01", 25),
            Err(TimecodeError::Malformed(_))
        ));
        assert!(matches!(
            timecode_to_frames("00:01:xx:00", 25),
            Err(TimecodeError::Malformed(_))
        ));
        assert!(matches!(
            timecode_to_frames("1:2:3:4:5", 25),
            Err(TimecodeError::Malformed(_))
        ));
    }

    #[test]
    fn overflowing_fields_are_malformed_not_panics() {
        assert!(matches!(
            timecode_to_frames("18446744073709551615:00:00:00", 25),
            Err(TimecodeError::Malformed(_))
        ));
        assert!(matches!(
            timecode_to_frames("00:00:18446744073709551615:24", 120),
            Err(TimecodeError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_zero_frame_rate() {
        assert_eq!(
            frames_to_timecode(100, 0, true),
            Err(TimecodeError::InvalidFrameRate)
        );
        assert_eq!(
            timecode_to_frames("00:00:01:00", 0),
            Err(TimecodeError::InvalidFrameRate)
        );
    }
}
