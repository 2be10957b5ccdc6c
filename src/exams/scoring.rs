/**
 * Exam Scoring
 *
 * Pure arithmetic over a question set and a parallel answer list.
 * Answers and correct answers compare as JSON values, so an exam whose
 * correct answers are option indices and one whose correct answers are
 * option strings both score without special casing.
 *
 * Award formula: 10 base points, plus 1 per correct answer, plus a
 * bonus of 10 at a perfect score or 5 at 80% and above.
 */

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single exam question as submitted by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamQuestion {
    pub question: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub question_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub correct_answer: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Result of scoring one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamScore {
    pub correct_count: u32,
    pub total_questions: u32,
    /// Rounded percentage in 0..=100
    pub percentage: u32,
    pub points: u32,
}

const BASE_POINTS: u32 = 10;
const PERFECT_BONUS: u32 = 10;
const HIGH_SCORE_BONUS: u32 = 5;
const HIGH_SCORE_THRESHOLD: u32 = 80;

/// Score a submission.
///
/// The caller has already checked that `answers` is the same length as
/// `questions`; a shorter list simply scores the missing tail as wrong.
pub fn score_exam(questions: &[ExamQuestion], answers: &[Value]) -> ExamScore {
    let total = questions.len() as u32;

    let correct = questions
        .iter()
        .zip(answers.iter())
        .filter(|(q, a)| q.correct_answer == **a)
        .count() as u32;

    let percentage = if total == 0 {
        0
    } else {
        (correct * 100 + total / 2) / total
    };

    let bonus = if percentage == 100 {
        PERFECT_BONUS
    } else if percentage >= HIGH_SCORE_THRESHOLD {
        HIGH_SCORE_BONUS
    } else {
        0
    };

    ExamScore {
        correct_count: correct,
        total_questions: total,
        percentage,
        points: BASE_POINTS + correct + bonus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn question(correct: Value) -> ExamQuestion {
        ExamQuestion {
            question: "q".to_string(),
            question_type: None,
            options: None,
            correct_answer: correct,
            explanation: None,
        }
    }

    #[test]
    fn half_right_two_question_exam() {
        let questions = vec![question(json!("الف")), question(json!("ب"))];
        let answers = vec![json!("الف"), json!("ج")];

        let score = score_exam(&questions, &answers);
        assert_eq!(score.correct_count, 1);
        assert_eq!(score.percentage, 50);
        assert_eq!(score.points, 11);
    }

    #[test]
    fn perfect_score_earns_the_full_bonus() {
        let questions: Vec<_> = (0..2).map(|i| question(json!(i))).collect();
        let answers = vec![json!(0), json!(1)];

        let score = score_exam(&questions, &answers);
        assert_eq!(score.percentage, 100);
        assert_eq!(score.points, 10 + 2 + 10);
    }

    #[test]
    fn eighty_percent_earns_the_smaller_bonus() {
        let questions: Vec<_> = (0..5).map(|i| question(json!(i))).collect();
        let answers = vec![json!(0), json!(1), json!(2), json!(3), json!(99)];

        let score = score_exam(&questions, &answers);
        assert_eq!(score.percentage, 80);
        assert_eq!(score.points, 10 + 4 + 5);
    }

    #[test]
    fn all_wrong_still_earns_base_points() {
        let questions = vec![question(json!("a"))];
        let answers = vec![json!("b")];

        let score = score_exam(&questions, &answers);
        assert_eq!(score.correct_count, 0);
        assert_eq!(score.percentage, 0);
        assert_eq!(score.points, BASE_POINTS);
    }

    #[test]
    fn numeric_and_string_answers_do_not_cross_match() {
        // json!(1) != json!("1"): value comparison is type-aware
        let questions = vec![question(json!(1))];
        let answers = vec![json!("1")];

        assert_eq!(score_exam(&questions, &answers).correct_count, 0);
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        let questions: Vec<_> = (0..3).map(|i| question(json!(i))).collect();
        let answers = vec![json!(0), json!(99), json!(99)];

        // 1/3 = 33.33 rounds to 33
        assert_eq!(score_exam(&questions, &answers).percentage, 33);

        let answers = vec![json!(0), json!(1), json!(99)];
        // 2/3 = 66.67 rounds to 67
        assert_eq!(score_exam(&questions, &answers).percentage, 67);
    }

    #[test]
    fn empty_exam_scores_zero_percent() {
        let score = score_exam(&[], &[]);
        assert_eq!(score.total_questions, 0);
        assert_eq!(score.percentage, 0);
    }

    proptest! {
        #[test]
        fn score_stays_within_bounds(answer_bits in proptest::collection::vec(any::<bool>(), 1..40)) {
            let questions: Vec<_> = (0..answer_bits.len()).map(|i| question(json!(i))).collect();
            let answers: Vec<_> = answer_bits
                .iter()
                .enumerate()
                .map(|(i, right)| if *right { json!(i) } else { json!("wrong") })
                .collect();

            let score = score_exam(&questions, &answers);
            let total = questions.len() as u32;

            prop_assert!(score.percentage <= 100);
            prop_assert!(score.points >= BASE_POINTS);
            prop_assert!(score.points <= BASE_POINTS + total + PERFECT_BONUS);
            prop_assert_eq!(score.correct_count, answer_bits.iter().filter(|b| **b).count() as u32);
        }
    }

    #[test]
    fn question_type_field_deserializes_from_type_key() {
        let q: ExamQuestion = serde_json::from_value(json!({
            "question": "2+2?",
            "type": "multiple_choice",
            "options": ["3", "4"],
            "correct_answer": "4"
        }))
        .unwrap();
        assert_eq!(q.question_type.as_deref(), Some("multiple_choice"));
        assert_eq!(q.correct_answer, json!("4"));
    }
}
