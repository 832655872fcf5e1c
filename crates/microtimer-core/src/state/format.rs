use std::time::Duration;

/// `HH:MM:SS`. Hours keep counting past 24.
pub fn format_hms(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// Millisecond remainder as three digits (`fff`).
pub fn format_millis(elapsed: Duration) -> String {
    format!("{:03}", elapsed.subsec_millis())
}

/// The two strings shown by the UI.
///
/// Unswapped, `primary` is the `HH:MM:SS` field and `secondary` the
/// milliseconds; swap mode exchanges them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayText {
    pub primary: String,
    pub secondary: String,
}

impl DisplayText {
    pub fn new(elapsed: Duration, swapped: bool) -> Self {
        let hms = format_hms(elapsed);
        let millis = format_millis(elapsed);
        if swapped {
            Self { primary: millis, secondary: hms }
        } else {
            Self { primary: hms, secondary: millis }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hms() {
        assert_eq!(format_hms(Duration::ZERO), "00:00:00");
        assert_eq!(format_hms(Duration::from_millis(61_999)), "00:01:01");
        assert_eq!(format_hms(Duration::from_secs(3661)), "01:01:01");
        assert_eq!(format_hms(Duration::from_secs(25 * 3600)), "25:00:00");
    }

    #[test]
    fn millis() {
        assert_eq!(format_millis(Duration::ZERO), "000");
        assert_eq!(format_millis(Duration::from_millis(7)), "007");
        assert_eq!(format_millis(Duration::from_millis(12_340)), "340");
    }

    #[test]
    fn swap_exchanges_fields() {
        let d = Duration::from_millis(83_042);
        let plain = DisplayText::new(d, false);
        assert_eq!(plain.primary, "00:01:23");
        assert_eq!(plain.secondary, "042");

        let swapped = DisplayText::new(d, true);
        assert_eq!(swapped.primary, plain.secondary);
        assert_eq!(swapped.secondary, plain.primary);
    }
}
