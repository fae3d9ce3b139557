// src/scoring/recompute.rs

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{points::calculate_assignment_points, streak::StreakTracker};
use crate::models::{
    assignment::AssignmentRecord,
    score::{ScoreBreakdown, UserScoreAggregate},
};

/// Derives a user's score breakdown from their scorable history.
///
/// `assignments` must already be filtered to scorable rows and sorted by
/// ascending `created_at`. Sums saturate at `i64::MAX`.
pub fn compute_breakdown(assignments: &[AssignmentRecord]) -> ScoreBreakdown {
    if assignments.is_empty() {
        return ScoreBreakdown::default();
    }

    let mut assignment_score: i64 = 0;
    let mut performance_bonus: i64 = 0;
    let mut perfect_scores = 0;
    let mut streak = StreakTracker::new();

    for assignment in assignments {
        let points = calculate_assignment_points(assignment.quiz_result.as_ref());
        assignment_score = assignment_score.saturating_add(points.base_points);
        performance_bonus = performance_bonus.saturating_add(points.bonus_points);

        if assignment
            .quiz_result
            .as_ref()
            .is_some_and(|r| r.is_perfect())
        {
            perfect_scores += 1;
        }

        streak.record(assignment.created_at);
    }

    let streak_bonus = streak.bonus();
    let bonus_points = performance_bonus.saturating_add(streak_bonus);

    ScoreBreakdown {
        total_score: assignment_score.saturating_add(bonus_points),
        assignment_score,
        bonus_points,
        performance_bonus,
        streak_bonus,
        assignments_completed: assignments.len() as i64,
        perfect_scores,
        current_streak: streak.longest(),
    }
}

/// Builds the row that replaces the user's aggregate.
pub fn to_aggregate(
    user_id: Uuid,
    breakdown: &ScoreBreakdown,
    now: DateTime<Utc>,
) -> UserScoreAggregate {
    UserScoreAggregate {
        user_id,
        total_score: breakdown.total_score,
        assignment_score: breakdown.assignment_score,
        bonus_points: breakdown.bonus_points,
        assignments_completed: breakdown.assignments_completed,
        perfect_scores: breakdown.perfect_scores,
        current_streak: breakdown.current_streak,
        rank: None,
        last_updated: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignment::{AssignmentStatus, QuizResult};
    use chrono::{Duration, TimeZone};

    fn completed(day: i64, score: i64, total: i64, percentage: f64) -> AssignmentRecord {
        AssignmentRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            title: format!("Quiz {day}"),
            status: AssignmentStatus::Completed,
            quiz_result: Some(QuizResult {
                score: Some(score),
                total: Some(total),
                percentage: Some(percentage),
            }),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::days(day),
        }
    }

    #[test]
    fn test_empty_history_is_all_zero() {
        assert_eq!(compute_breakdown(&[]), ScoreBreakdown::default());
    }

    #[test]
    fn test_breakdown_with_streak() {
        let history = vec![
            completed(0, 5, 5, 100.0), // 50 + 50
            completed(1, 4, 5, 80.0),  // 40 + 25
            completed(3, 3, 5, 60.0),  // 30 + 10
        ];
        let b = compute_breakdown(&history);

        assert_eq!(b.assignment_score, 120);
        assert_eq!(b.performance_bonus, 85);
        assert_eq!(b.current_streak, 3);
        assert_eq!(b.streak_bonus, 10);
        assert_eq!(b.bonus_points, 95);
        assert_eq!(b.total_score, 215);
        assert_eq!(b.assignments_completed, 3);
        assert_eq!(b.perfect_scores, 1);
    }

    #[test]
    fn test_broken_streak_has_no_bonus() {
        let history = vec![completed(0, 2, 5, 40.0), completed(5, 2, 5, 40.0)];
        let b = compute_breakdown(&history);

        assert_eq!(b.current_streak, 1);
        assert_eq!(b.streak_bonus, 0);
        assert_eq!(b.total_score, 40);
    }

    #[test]
    fn test_zero_point_assignments_still_count_towards_streak_and_total() {
        let history = vec![completed(0, 0, 5, 0.0), completed(1, 1, 5, 20.0)];
        let b = compute_breakdown(&history);

        assert_eq!(b.assignments_completed, 2);
        assert_eq!(b.assignment_score, 10);
        assert_eq!(b.current_streak, 2);
        assert_eq!(b.streak_bonus, 5);
        assert_eq!(b.total_score, 15);
    }

    #[test]
    fn test_huge_stored_scores_saturate() {
        let huge = i64::MAX / 10;
        let history = vec![completed(0, huge, 5, 10.0), completed(1, huge, 5, 10.0)];
        let b = compute_breakdown(&history);

        assert_eq!(b.assignment_score, i64::MAX);
        assert_eq!(b.streak_bonus, 5);
        assert_eq!(b.total_score, i64::MAX);

        // Too large to score at all: counted, worth nothing.
        let b = compute_breakdown(&[completed(0, 1_000_000_000_000_000_000, 5, 10.0)]);
        assert_eq!(b.assignments_completed, 1);
        assert_eq!(b.total_score, 0);
    }

    #[test]
    fn test_aggregate_mirrors_breakdown() {
        let now = Utc::now();
        let user = Uuid::new_v4();
        let b = compute_breakdown(&[completed(0, 5, 5, 100.0)]);
        let row = to_aggregate(user, &b, now);

        assert_eq!(row.user_id, user);
        assert_eq!(row.total_score, b.total_score);
        assert_eq!(row.total_score, row.assignment_score + row.bonus_points);
        assert_eq!(row.rank, None);
        assert_eq!(row.last_updated, now);
    }
}
