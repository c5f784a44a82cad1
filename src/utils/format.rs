//! Time display helpers

/// Render a seconds count as `mm:ss`, both fields zero-padded
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Render an elapsed duration for humans, e.g. `1h 2m 3s`
pub fn format_uptime(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pads_both_fields() {
        assert_eq!(format_clock(125), "02:05");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
    }

    #[test]
    fn clock_does_not_roll_into_hours() {
        assert_eq!(format_clock(3600), "60:00");
        assert_eq!(format_clock(6001), "100:01");
    }

    #[test]
    fn uptime_drops_empty_leading_units() {
        assert_eq!(format_uptime(42), "42s");
        assert_eq!(format_uptime(125), "2m 5s");
        assert_eq!(format_uptime(3723), "1h 2m 3s");
    }
}
