use crate::{
    engine::Engine,
    model::{Session, UsageConfig},
    parse::parse_session,
};

pub const DEMO_FILE_NAME: &str = "Kassa 8-12-2007.txt";

/// A small export in the canonical shape: header, two track sections,
/// region lines with and without explicit end timecodes.
#[must_use]
pub fn demo_export_text() -> String {
    [
        "SESSION NAME:\tKassa 8-12-2007",
        "SAMPLE RATE:\t48000.000000",
        "TIMECODE FORMAT:\t25 Frame",
        "",
        "TRACK NAME:\tM1 (Stereo)",
        "00:00:20:11\t00:01:56:10\t01 Hijack.mp3",
        "00:01:56:10\t00:02:16:21\t07 Chico's Groove.mp3",
        "00:02:16:21\t00:03:31:02\t16 Track 16.aif",
        "TRACK NAME:\tD1",
        "00:00:05:00\t00:00:06:00\tFade 3",
        "00:00:10:00\t00:01:25:03\tIsabelle Comes Back.mp3",
        "00:01:25:03\t00:01:57:24\tLives In The Balance.mp3",
    ]
    .join("\n")
}

/// The demo export parsed with defaults; expect should never fire because
/// the fixture text is well formed.
#[must_use]
pub fn demo_session() -> Session {
    parse_session(&demo_export_text(), DEMO_FILE_NAME)
        .expect("fixture export should parse cleanly")
}

#[must_use]
pub fn demo_engine(config: UsageConfig) -> Engine {
    Engine::from_session(demo_session(), config)
}
