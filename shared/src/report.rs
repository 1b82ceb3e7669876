//! Derived views over API payloads: score series, statistics rows, score tones.

use crate::date::{display_date, parse_timestamp};
use crate::{SubmissionRecord, TeacherStatistics};

/// A point of the student's score chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformancePoint {
    pub label: String,
    pub score: i32,
}

/// Scores ordered by submission date; ungraded submissions plot as 0.
///
/// Entries with an unreadable date are kept and placed last.
pub fn performance_series(submissions: &[SubmissionRecord]) -> Vec<PerformancePoint> {
    let mut dated: Vec<_> = submissions
        .iter()
        .map(|s| (parse_timestamp(&s.submitted_at), s))
        .collect();
    // None 排在最后
    dated.sort_by_key(|(ts, _)| (ts.is_none(), *ts));
    dated
        .into_iter()
        .map(|(_, s)| PerformancePoint {
            label: display_date(&s.submitted_at),
            score: s.score.unwrap_or(0),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsRow {
    pub exercise_id: u64,
    pub submission_count: u32,
    pub average_score: f64,
}

impl StatisticsRow {
    pub fn average_label(&self) -> String {
        format!("{:.2}", self.average_score)
    }
}

pub fn statistics_rows(stats: &TeacherStatistics) -> Vec<StatisticsRow> {
    stats
        .iter()
        .map(|(id, s)| StatisticsRow {
            exercise_id: *id,
            submission_count: s.submission_count,
            average_score: s.average_score,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTone {
    Ungraded,
    Passing,
    Failing,
}

impl ScoreTone {
    pub fn of(score: Option<i32>) -> Self {
        match score {
            None => ScoreTone::Ungraded,
            Some(s) if s > 10 => ScoreTone::Passing,
            Some(_) => ScoreTone::Failing,
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            ScoreTone::Ungraded => "badge badge-ghost",
            ScoreTone::Passing => "badge badge-success",
            ScoreTone::Failing => "badge badge-error",
        }
    }
}

/// `15/20`, or `N/A` when ungraded
pub fn score_label(score: Option<i32>) -> String {
    match score {
        Some(s) => format!("{}/{}", s, crate::MAX_SCORE),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExerciseStats, StudentRef};

    fn record(id: u64, submitted_at: &str, score: Option<i32>) -> SubmissionRecord {
        SubmissionRecord {
            id,
            student: StudentRef {
                id: 1,
                username: "lea".to_string(),
                email: String::new(),
            },
            exercise: Some("Agrégats".to_string()),
            file: None,
            submitted_at: submitted_at.to_string(),
            score,
            feedback: None,
            is_locked: false,
        }
    }

    #[test]
    fn series_is_sorted_by_date_with_missing_scores_as_zero() {
        let subs = vec![
            record(1, "2025-03-12T10:00:00Z", Some(14)),
            record(2, "2025-01-05T10:00:00Z", None),
            record(3, "???", Some(9)),
            record(4, "2025-02-01T10:00:00Z", Some(18)),
        ];
        let series = performance_series(&subs);
        let scores: Vec<i32> = series.iter().map(|p| p.score).collect();
        assert_eq!(scores, vec![0, 18, 14, 9]);
        assert_eq!(series[0].label, "5 janv. 2025");
        assert_eq!(series[3].label, "Non spécifiée");
    }

    #[test]
    fn statistics_rows_format_average_with_two_decimals() {
        let mut stats = TeacherStatistics::new();
        stats.insert(
            3,
            ExerciseStats {
                average_score: 13.0 / 3.0,
                submission_count: 3,
            },
        );
        stats.insert(
            1,
            ExerciseStats {
                average_score: 0.0,
                submission_count: 0,
            },
        );
        let rows = statistics_rows(&stats);
        assert_eq!(rows[0].exercise_id, 1);
        assert_eq!(rows[0].average_label(), "0.00");
        assert_eq!(rows[1].average_label(), "4.33");
    }

    #[test]
    fn score_tone_passes_strictly_above_ten() {
        assert_eq!(ScoreTone::of(None), ScoreTone::Ungraded);
        assert_eq!(ScoreTone::of(Some(10)), ScoreTone::Failing);
        assert_eq!(ScoreTone::of(Some(11)), ScoreTone::Passing);
        assert_eq!(score_label(Some(11)), "11/20");
        assert_eq!(score_label(None), "N/A");
    }
}
