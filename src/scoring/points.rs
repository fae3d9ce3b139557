// src/scoring/points.rs

use crate::models::{assignment::QuizResult, score::AssignmentPoints};

/// Points awarded per correct answer.
pub const POINTS_PER_CORRECT_ANSWER: i64 = 10;

pub const PERFECT_BONUS: i64 = 50;
pub const EXCELLENT_BONUS: i64 = 25;
pub const GOOD_BONUS: i64 = 10;

/// Performance bonus for a stored percentage.
///
/// Out-of-range values are compared as-is. A missing percentage earns nothing.
pub fn performance_bonus(percentage: Option<f64>) -> i64 {
    match percentage {
        Some(p) if p == 100.0 => PERFECT_BONUS,
        Some(p) if p >= 80.0 => EXCELLENT_BONUS,
        Some(p) if p >= 60.0 => GOOD_BONUS,
        _ => 0,
    }
}

/// Calculates the points earned by a single assignment.
///
/// * A missing result, a zero/missing `score` or a zero/missing `total` yields zero points.
///   A genuine score of 0 therefore lands in the same branch as malformed input.
/// * Base points are `score * 10`. A score too large for that product is
///   treated like malformed input.
/// * The bonus tier is read from the stored `percentage`, not from `score / total`.
pub fn calculate_assignment_points(quiz_result: Option<&QuizResult>) -> AssignmentPoints {
    let Some(result) = quiz_result else {
        return AssignmentPoints::default();
    };

    let score = match (result.score, result.total) {
        (Some(score), Some(total)) if score != 0 && total != 0 => score,
        _ => return AssignmentPoints::default(),
    };

    let bonus_points = performance_bonus(result.percentage);
    let Some(base_points) = score.checked_mul(POINTS_PER_CORRECT_ANSWER) else {
        return AssignmentPoints::default();
    };
    let Some(total_points) = base_points.checked_add(bonus_points) else {
        return AssignmentPoints::default();
    };

    AssignmentPoints {
        base_points,
        bonus_points,
        total_points,
    }
}
