//! Summary figures derived from a finished result.

use serde::{Deserialize, Serialize};

use super::value::SessionResult;
use crate::clock::format_time;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub flash_count: Option<usize>,
    pub finish_count: Option<usize>,
    pub finish_time: u64,
    pub finish_time_display: String,
    pub incorrect_count: usize,
    /// Words read up to the finish word, minus those marked incorrect.
    pub finish_correct: Option<usize>,
    /// Rounded to a whole percent. `None` without a finish word.
    pub percentage_correct: Option<u32>,
    /// Rounded to whole words. `None` without a finish word or elapsed time.
    pub words_per_minute: Option<u32>,
}

impl AssessmentReport {
    pub fn from_result(result: &SessionResult) -> Self {
        let finish_count = result.finish_count();
        let incorrect_count = result.incorrect_indices.len();
        let finish_correct = finish_count.map(|count| count.saturating_sub(incorrect_count));

        let percentage_correct = finish_count
            .zip(finish_correct)
            .map(|(count, correct)| (correct as f64 / count as f64 * 100.0).round() as u32);

        let words_per_minute = finish_correct
            .filter(|_| result.elapsed_secs > 0)
            .map(|correct| (correct as f64 * 60.0 / result.elapsed_secs as f64).round() as u32);

        Self {
            flash_count: result.flash_count(),
            finish_count,
            finish_time: result.elapsed_secs,
            finish_time_display: format_time(result.elapsed_secs),
            incorrect_count,
            finish_correct,
            percentage_correct,
            words_per_minute,
        }
    }

    /// Decode a persisted value leniently and summarise it.
    pub fn from_value(value: &str) -> Self {
        Self::from_result(&super::decode(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarises_finished_value() {
        let report = AssessmentReport::from_value("5 7 10 null null null null null null null 7");
        assert_eq!(report.flash_count, Some(5));
        assert_eq!(report.finish_count, Some(10));
        assert_eq!(report.incorrect_count, 1);
        assert_eq!(report.finish_correct, Some(9));
        assert_eq!(report.percentage_correct, Some(90));
        // 9 words in 7 seconds
        assert_eq!(report.words_per_minute, Some(77));
        assert_eq!(report.finish_time_display, "7");
    }

    #[test]
    fn minute_long_attempt() {
        let report =
            AssessmentReport::from_value("30 60 40 null null null null null null null 2 3 4 5");
        assert_eq!(report.finish_correct, Some(36));
        assert_eq!(report.percentage_correct, Some(90));
        assert_eq!(report.words_per_minute, Some(36));
        assert_eq!(report.finish_time_display, "1:00");
    }

    #[test]
    fn missing_finish_yields_no_rates() {
        let report = AssessmentReport::from_value("null 12 null null null null null null null null");
        assert_eq!(report.finish_count, None);
        assert_eq!(report.percentage_correct, None);
        assert_eq!(report.words_per_minute, None);
    }

    #[test]
    fn zero_elapsed_has_no_speed() {
        let report = AssessmentReport::from_value("null 0 4 null null null null null null null");
        assert_eq!(report.percentage_correct, Some(100));
        assert_eq!(report.words_per_minute, None);
    }
}
