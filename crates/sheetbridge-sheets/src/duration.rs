//! Human-readable durations.

/// Format milliseconds as `M:SS`, rounding to the nearest second.
pub fn convert_millis(millis: u64) -> String {
    let total_secs = (millis + 500) / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_millis() {
        assert_eq!(convert_millis(0), "0:00");
        assert_eq!(convert_millis(61_000), "1:01");
        assert_eq!(convert_millis(754_300), "12:34");
        assert_eq!(convert_millis(1_499), "0:01");
    }

    #[test]
    fn test_rounding_carries_into_minutes() {
        assert_eq!(convert_millis(119_600), "2:00");
    }
}
