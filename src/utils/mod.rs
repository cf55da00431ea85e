mod maths_utils;
mod perf;
mod time_utils;

pub use time_utils::{AppInstant, TimeUtils, format_duration, format_timestamp, now_utc};

pub use maths_utils::{ceil_to_u64, finite_or_zero, is_non_decreasing};
