// Display helpers shared by the panels

/// Compact score formatting: `950`, `1.5K`, `2M`, `3.2B`.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() || n == 0.0 {
        return "0".to_string();
    }
    for (unit, suffix) in [(1e9, "B"), (1e6, "M"), (1e3, "K")] {
        if n >= unit {
            return with_one_decimal(n / unit, suffix);
        }
    }
    if n.fract() == 0.0 { format!("{}", n as i64) } else { format!("{:.1}", n) }
}

fn with_one_decimal(v: f64, suffix: &str) -> String {
    let s = format!("{:.1}", v);
    match s.strip_suffix(".0") {
        Some(whole) => format!("{whole}{suffix}"),
        None => format!("{s}{suffix}"),
    }
}

pub fn format_duration(ms: u64) -> String {
    let secs = ms / 1000;
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{:01}:{:02}:{:02}", h, m, s)
    } else if m > 0 {
        format!("{:02}:{:02}", m, s)
    } else {
        format!("{}s", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(950.0), "950");
        assert_eq!(format_number(6.75), "6.8");
        assert_eq!(format_number(1000.0), "1K");
        assert_eq!(format_number(1500.0), "1.5K");
        assert_eq!(format_number(2_000_000.0), "2M");
        assert_eq!(format_number(3_250_000_000.0), "3.2B");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(42_000), "42s");
        assert_eq!(format_duration(125_000), "02:05");
        assert_eq!(format_duration(7_200_000), "2:00:00");
    }
}
