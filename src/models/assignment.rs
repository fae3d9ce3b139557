// src/models/assignment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle of an assignment. Only `Completed` rows are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Pending,
    InProgress,
    Completed,
}

impl AssignmentStatus {
    /// Database representation, as checked by the `assignments.status` constraint.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "pending",
            AssignmentStatus::InProgress => "in_progress",
            AssignmentStatus::Completed => "completed",
        }
    }

    /// Parses the database representation. Unknown values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(AssignmentStatus::Pending),
            "in_progress" => Some(AssignmentStatus::InProgress),
            "completed" => Some(AssignmentStatus::Completed),
            _ => None,
        }
    }
}

/// Outcome of the quiz attached to an assignment.
///
/// Stored as a JSON document, so every field is optional. Fields are decoded
/// independently: a missing or mistyped field is `None` without affecting the
/// others, and a document that is not an object is scored as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct QuizResult {
    /// Number of correct answers.
    pub score: Option<i64>,

    /// Number of questions.
    pub total: Option<i64>,

    /// 0-100, computed when the quiz was graded. Never recomputed here.
    pub percentage: Option<f64>,
}

impl QuizResult {
    /// Builds a result from a graded quiz, deriving the rounded percentage.
    ///
    /// `total` must be non-zero; callers validate that beforehand.
    pub fn graded(score: i64, total: i64) -> Self {
        let percentage = ((score * 100) as f64 / total as f64).round();
        Self {
            score: Some(score),
            total: Some(total),
            percentage: Some(percentage),
        }
    }

    /// Lenient decode of a stored JSON document, one field at a time.
    pub fn from_json(value: serde_json::Value) -> Self {
        let Some(fields) = value.as_object() else {
            return Self::default();
        };

        Self {
            score: fields.get("score").and_then(integral),
            total: fields.get("total").and_then(integral),
            percentage: fields.get("percentage").and_then(serde_json::Value::as_f64),
        }
    }

    pub fn is_perfect(&self) -> bool {
        self.percentage == Some(100.0)
    }
}

/// Integers, or floats with no fractional part (JSONB keeps `4.0` as written).
fn integral(value: &serde_json::Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let n = value.as_f64()?;
    // i64::MAX is not representable as f64; the bound is exclusive.
    let in_range = n >= i64::MIN as f64 && n < i64::MAX as f64;
    (n.fract() == 0.0 && in_range).then_some(n as i64)
}

/// Represents the 'assignments' table in the database.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignmentRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub status: AssignmentStatus,
    pub quiz_result: Option<QuizResult>,

    /// Ordering key for streaks.
    pub created_at: DateTime<Utc>,
}

impl AssignmentRecord {
    /// Whether this record takes part in score recomputation.
    pub fn is_scorable(&self) -> bool {
        self.status == AssignmentStatus::Completed && self.quiz_result.is_some()
    }
}

/// DTO for submitting a graded quiz against an assignment.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = validate_score_within_total))]
pub struct CompleteAssignmentRequest {
    #[validate(range(min = 0))]
    pub score: i64,
    #[validate(range(min = 1, max = 1000))]
    pub total: i64,
}

fn validate_score_within_total(
    req: &CompleteAssignmentRequest,
) -> Result<(), validator::ValidationError> {
    if req.score > req.total {
        return Err(validator::ValidationError::new("score_exceeds_total"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_quiz_result_decodes_as_empty() {
        assert_eq!(QuizResult::from_json(json!("not an object")), QuizResult::default());
        assert_eq!(QuizResult::from_json(json!([4, 5])), QuizResult::default());
        assert_eq!(QuizResult::from_json(json!({"score": "bad"})), QuizResult::default());
    }

    #[test]
    fn mistyped_field_does_not_discard_the_others() {
        let result = QuizResult::from_json(json!({"score": "five", "total": 5}));
        assert_eq!(result.score, None);
        assert_eq!(result.total, Some(5));

        let result = QuizResult::from_json(json!({"score": 4, "total": 5, "percentage": "80"}));
        assert_eq!(result.score, Some(4));
        assert_eq!(result.total, Some(5));
        assert_eq!(result.percentage, None);
    }

    #[test]
    fn integral_floats_decode_as_counts() {
        let result = QuizResult::from_json(json!({"score": 4.0, "total": 5, "percentage": 80}));
        assert_eq!(result.score, Some(4));
        assert_eq!(result.total, Some(5));
        assert_eq!(result.percentage, Some(80.0));

        let result = QuizResult::from_json(json!({"score": 4.5, "total": 5.0}));
        assert_eq!(result.score, None);
        assert_eq!(result.total, Some(5));

        let result = QuizResult::from_json(json!({"score": 1e300}));
        assert_eq!(result.score, None);
    }

    #[test]
    fn partial_quiz_result_keeps_present_fields() {
        let result = QuizResult::from_json(json!({"score": 3, "total": 4}));
        assert_eq!(result.score, Some(3));
        assert_eq!(result.total, Some(4));
        assert_eq!(result.percentage, None);
    }

    #[test]
    fn graded_rounds_percentage() {
        assert_eq!(QuizResult::graded(2, 3).percentage, Some(67.0));
        assert_eq!(QuizResult::graded(1, 3).percentage, Some(33.0));
        assert!(QuizResult::graded(4, 4).is_perfect());
    }

    #[test]
    fn completion_request_rejects_score_above_total() {
        let req = CompleteAssignmentRequest { score: 6, total: 5 };
        assert!(req.validate().is_err());

        let req = CompleteAssignmentRequest { score: 0, total: 5 };
        assert!(req.validate().is_ok());

        let req = CompleteAssignmentRequest { score: 0, total: 0 };
        assert!(req.validate().is_err());
    }

    #[test]
    fn status_round_trips_through_database_text() {
        for status in [
            AssignmentStatus::Pending,
            AssignmentStatus::InProgress,
            AssignmentStatus::Completed,
        ] {
            assert_eq!(AssignmentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AssignmentStatus::parse("archived"), None);
    }

    #[test]
    fn status_database_text_matches_api_name() {
        for status in [
            AssignmentStatus::Pending,
            AssignmentStatus::InProgress,
            AssignmentStatus::Completed,
        ] {
            assert_eq!(serde_json::to_value(status).unwrap(), json!(status.as_str()));
        }
    }
}
