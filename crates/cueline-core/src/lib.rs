pub mod diagnostics;
pub mod engine;
pub mod fixtures;
pub mod model;
pub mod parse;
pub mod reduce;
pub mod render;
pub mod time;

pub use diagnostics::{TelemetryGuard, init_tracing, init_tracing_with_options};
pub use engine::{Engine, EngineError, generate_usages};
pub use model::{
    DEFAULT_FRAME_RATE, Region, RegionUsage, Session, SortKey, Track, TrackKind, UsageConfig,
};
pub use parse::{ParseError, parse_session};
pub use render::{render_listing, report_title};
pub use time::{TimecodeError, frames_to_timecode, timecode_to_frames};
