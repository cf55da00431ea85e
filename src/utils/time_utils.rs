use {
    chrono::{DateTime, Local, Utc},
    std::time::Duration,
};

/// Clock used for run timing. tokio's Instant so paused-clock tests see the same time.
pub type AppInstant = tokio::time::Instant;

pub struct TimeUtils;

impl TimeUtils {
    pub const STANDARD_TIME_FORMAT: &'static str = "%Y-%m-%d %H:%M";
}

pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Local wall-clock rendering for listings.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local)
        .format(TimeUtils::STANDARD_TIME_FORMAT)
        .to_string()
}

pub fn format_duration(d: Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 {
        return format!("{}ms", ms);
    }
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        return format!("{:.1}s", secs);
    }
    let mins = d.as_secs() / 60;
    format!("{}m {}s", mins, d.as_secs() % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_pick_a_readable_unit() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(3500)), "3.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }
}
