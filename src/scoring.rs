// src/scoring.rs

use std::collections::HashSet;

/// Answer key for one question: its point value, the ids of all of its
/// choices and the ids of the choices marked correct.
#[derive(Debug, Clone)]
pub struct QuestionKey {
    pub question_id: i64,
    pub grade: i64,
    pub choice_ids: HashSet<i64>,
    pub correct_choice_ids: HashSet<i64>,
}

/// Grades one question against the submission's selected choices.
///
/// Only choices belonging to this question count; the question is awarded
/// its full grade iff the selected subset equals the correct set exactly.
/// No partial credit.
pub fn score_question(key: &QuestionKey, selected: &HashSet<i64>) -> i64 {
    let chosen_for_question: HashSet<i64> =
        selected.intersection(&key.choice_ids).copied().collect();

    if chosen_for_question == key.correct_choice_ids {
        key.grade
    } else {
        0
    }
}

/// Total grade for a submission: the sum of per-question scores across
/// every question of the course.
pub fn total_grade(questions: &[QuestionKey], selected: &HashSet<i64>) -> i64 {
    questions.iter().map(|key| score_question(key, selected)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(question_id: i64, grade: i64, choices: &[i64], correct: &[i64]) -> QuestionKey {
        QuestionKey {
            question_id,
            grade,
            choice_ids: choices.iter().copied().collect(),
            correct_choice_ids: correct.iter().copied().collect(),
        }
    }

    fn selected(ids: &[i64]) -> HashSet<i64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn exact_match_awards_full_grade() {
        let q = key(1, 10, &[1, 2, 3, 4], &[1, 2]);
        assert_eq!(score_question(&q, &selected(&[1, 2])), 10);
    }

    #[test]
    fn missing_a_correct_choice_scores_zero() {
        let q = key(1, 10, &[1, 2, 3, 4], &[1, 2]);
        assert_eq!(score_question(&q, &selected(&[1])), 0);
        assert_eq!(score_question(&q, &selected(&[2])), 0);
        assert_eq!(score_question(&q, &selected(&[])), 0);
    }

    #[test]
    fn extra_choice_scores_zero() {
        let q = key(1, 10, &[1, 2, 3, 4], &[1, 2]);
        assert_eq!(score_question(&q, &selected(&[1, 2, 3])), 0);
    }

    #[test]
    fn other_questions_choices_are_ignored() {
        // Choice 99 belongs to a different question and must not break
        // the exact match for this one.
        let q = key(1, 10, &[1, 2, 3, 4], &[1, 2]);
        assert_eq!(score_question(&q, &selected(&[1, 2, 99])), 10);
    }

    #[test]
    fn question_without_correct_choices_matches_empty_selection() {
        let q = key(1, 5, &[1, 2], &[]);
        assert_eq!(score_question(&q, &selected(&[])), 5);
        assert_eq!(score_question(&q, &selected(&[1])), 0);
    }

    #[test]
    fn total_is_sum_over_questions() {
        // Q1 worth 10, correct {1, 2}; Q2 worth 5, correct {5}.
        let questions = vec![key(1, 10, &[1, 2, 3], &[1, 2]), key(2, 5, &[4, 5], &[5])];

        // Selecting {1, 2, 5} answers both exactly.
        assert_eq!(total_grade(&questions, &selected(&[1, 2, 5])), 15);

        // Selecting {1, 5} fails Q1's exact match but still earns Q2.
        assert_eq!(total_grade(&questions, &selected(&[1, 5])), 5);

        // Selecting nothing earns nothing.
        assert_eq!(total_grade(&questions, &selected(&[])), 0);
    }
}
