use crate::models::Question;

/// How a single option came out in the review, from the student's
/// perspective. The four states are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionOutcome {
    /// Correct and selected.
    CorrectSelected,
    /// Incorrect but selected.
    IncorrectSelected,
    /// Correct but not selected.
    MissedCorrect,
    /// Incorrect and not selected.
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionOutcome {
    /// Whole-question verdict: selection set equals the correct set.
    pub correct: bool,
    /// One entry per option, in display order.
    pub options: Vec<OptionOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreReport {
    pub correct_count: usize,
    /// Rounded to the nearest whole percent; 0 for an empty quiz.
    pub percentage: u32,
    pub per_question: Vec<QuestionOutcome>,
}

/// Score a finished quiz. A question only counts when the selected set
/// matches the correct set exactly; there is no partial credit.
pub fn score(questions: &[Question], user_answers: &[Vec<usize>]) -> ScoreReport {
    let empty: Vec<usize> = Vec::new();

    let per_question: Vec<QuestionOutcome> = questions
        .iter()
        .enumerate()
        .map(|(idx, question)| {
            let selection = user_answers.get(idx).unwrap_or(&empty);
            question_outcome(question, selection)
        })
        .collect();

    let correct_count = per_question.iter().filter(|o| o.correct).count();

    let percentage = if questions.is_empty() {
        0
    } else {
        (correct_count as f64 * 100.0 / questions.len() as f64).round() as u32
    };

    ScoreReport {
        correct_count,
        percentage,
        per_question,
    }
}

fn question_outcome(question: &Question, selection: &[usize]) -> QuestionOutcome {
    let mut selected = selection.to_vec();
    selected.sort_unstable();
    let mut correct = question.correct_answer_indices.clone();
    correct.sort_unstable();

    let options = (0..question.options.len())
        .map(|i| {
            let is_correct = correct.binary_search(&i).is_ok();
            let is_selected = selected.binary_search(&i).is_ok();
            match (is_correct, is_selected) {
                (true, true) => OptionOutcome::CorrectSelected,
                (false, true) => OptionOutcome::IncorrectSelected,
                (true, false) => OptionOutcome::MissedCorrect,
                (false, false) => OptionOutcome::Neutral,
            }
        })
        .collect();

    QuestionOutcome {
        correct: selected == correct,
        options,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Question, QuestionType};

    fn question(options: usize, correct: &[usize], multi: bool) -> Question {
        Question {
            id: None,
            question_text: "Frage".to_string(),
            options: (0..options).map(|i| format!("Antwort {}", i + 1)).collect(),
            correct_answer_indices: correct.to_vec(),
            category: None,
            question_type: if multi {
                QuestionType::Multi
            } else {
                QuestionType::Single
            },
            verband: None,
            image_url: None,
        }
    }

    #[test]
    fn exact_match_required_no_partial_credit() {
        let questions = vec![question(4, &[0, 2], true)];
        let report = score(&questions, &[vec![0]]);
        assert_eq!(report.correct_count, 0);
        assert!(!report.per_question[0].correct);
    }

    #[test]
    fn selection_order_does_not_matter() {
        let questions = vec![question(4, &[0, 2], true)];
        let report = score(&questions, &[vec![2, 0]]);
        assert_eq!(report.correct_count, 1);
    }

    #[test]
    fn four_of_five_is_eighty_percent() {
        let questions = vec![
            question(3, &[0], false),
            question(3, &[1], false),
            question(3, &[2], false),
            question(4, &[1, 3], true),
            question(3, &[0], false),
        ];
        let answers = vec![vec![0], vec![1], vec![2], vec![1, 3], vec![2]];
        let report = score(&questions, &answers);
        assert_eq!(report.correct_count, 4);
        assert_eq!(report.percentage, 80);
    }

    #[test]
    fn empty_quiz_scores_zero_without_dividing() {
        let report = score(&[], &[]);
        assert_eq!(report.correct_count, 0);
        assert_eq!(report.percentage, 0);
        assert!(report.per_question.is_empty());
    }

    #[test]
    fn percentage_rounds_half_up() {
        // 1 of 8 = 12.5% → 13.
        let questions: Vec<Question> = (0..8).map(|_| question(2, &[0], false)).collect();
        let mut answers = vec![vec![1]; 8];
        answers[0] = vec![0];
        assert_eq!(score(&questions, &answers).percentage, 13);
    }

    #[test]
    fn options_classify_into_four_states() {
        let questions = vec![question(4, &[0, 2], true)];
        let report = score(&questions, &[vec![0, 1]]);
        assert_eq!(
            report.per_question[0].options,
            vec![
                OptionOutcome::CorrectSelected,
                OptionOutcome::IncorrectSelected,
                OptionOutcome::MissedCorrect,
                OptionOutcome::Neutral,
            ]
        );
    }

    #[test]
    fn unanswered_question_counts_as_incorrect() {
        let questions = vec![question(3, &[1], false)];
        let report = score(&questions, &[vec![]]);
        assert!(!report.per_question[0].correct);
        assert_eq!(report.per_question[0].options[1], OptionOutcome::MissedCorrect);
    }

    #[test]
    fn scoring_is_repeatable() {
        let questions = vec![question(4, &[1, 2], true), question(3, &[0], false)];
        let answers = vec![vec![1, 2], vec![2]];
        assert_eq!(score(&questions, &answers), score(&questions, &answers));
    }
}
