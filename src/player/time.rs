/// Format a position in seconds as `M:SS`, truncating partial seconds.
///
/// Minutes are not wrapped into hours, so an hour renders as `60:00`.
/// Negative or non-finite input renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
