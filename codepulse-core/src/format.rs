//! Formatting helpers shared by insights and the CLI report.

/// Compact count for display (e.g., "14.2M", "3.4K", "950").
pub fn compact_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Integer with thousands separators (e.g., "12,345").
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Hours with at most one decimal, dropping a trailing ".0".
pub fn hours(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        thousands(rounded.max(0.0) as u64)
    } else {
        format!("{:.1}", rounded)
    }
}

/// Signed percentage (e.g., "+23%", "-15%").
pub fn signed_percent(pct: i64) -> String {
    if pct >= 0 {
        format!("+{}%", pct)
    } else {
        format!("{}%", pct)
    }
}

/// 12-hour clock label for an hour of day (e.g., "2 PM").
pub fn hour_label(hour: u8) -> String {
    let h = hour % 24;
    let period = if h < 12 { "AM" } else { "PM" };
    let h12 = match h % 12 {
        0 => 12,
        h => h,
    };
    format!("{} {}", h12, period)
}

/// Window of `span` hours starting at `start` (e.g., "2 PM - 5 PM").
pub fn hour_range(start: u8, span: u8) -> String {
    let end = ((start as u16 + span as u16) % 24) as u8;
    format!("{} - {}", hour_label(start), hour_label(end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_count() {
        assert_eq!(compact_count(14_200_000), "14.2M");
        assert_eq!(compact_count(3_400), "3.4K");
        assert_eq!(compact_count(950), "950");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_hours() {
        assert_eq!(hours(47.0), "47");
        assert_eq!(hours(12.25), "12.3");
        assert_eq!(hours(1500.0), "1,500");
    }

    #[test]
    fn test_signed_percent() {
        assert_eq!(signed_percent(23), "+23%");
        assert_eq!(signed_percent(0), "+0%");
        assert_eq!(signed_percent(-15), "-15%");
    }

    #[test]
    fn test_hour_range() {
        assert_eq!(hour_label(0), "12 AM");
        assert_eq!(hour_label(12), "12 PM");
        assert_eq!(hour_range(14, 3), "2 PM - 5 PM");
        assert_eq!(hour_range(22, 3), "10 PM - 1 AM");
    }
}
