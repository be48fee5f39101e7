/// Render elapsed seconds for display.
///
/// The leading unit is never padded; subordinate units are padded to two
/// digits. Seconds alone render bare.
///
/// ```
/// use literacy_core::clock::format_time;
/// assert_eq!(format_time(5), "5");
/// assert_eq!(format_time(65), "1:05");
/// assert_eq!(format_time(3605), "1:00:05");
/// ```
pub fn format_time(seconds: u64) -> String {
    let hrs = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hrs > 0 {
        format!("{hrs}:{mins:02}:{secs:02}")
    } else if mins > 0 {
        format!("{mins}:{secs:02}")
    } else {
        secs.to_string()
    }
}
