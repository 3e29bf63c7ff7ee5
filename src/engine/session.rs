use rand::Rng;

use crate::models::Question;

use super::answer::toggle_selection;
use super::normalize::normalize;
use super::score::{score, ScoreReport};
use super::shuffle::shuffle_options;

/// A quiz attempt in progress. Questions are fixed once loaded; only the
/// answer slots and the question pointer move.
#[derive(Debug)]
pub struct QuizRun {
    questions: Vec<Question>,
    user_answers: Vec<Vec<usize>>,
    current: usize,
}

impl QuizRun {
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    pub fn selection(&self, question_idx: usize) -> &[usize] {
        self.user_answers
            .get(question_idx)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_answered(&self, question_idx: usize) -> bool {
        !self.selection(question_idx).is_empty()
    }

    pub fn answered_count(&self) -> usize {
        self.user_answers.iter().filter(|a| !a.is_empty()).count()
    }
}

/// A submitted quiz: the frozen question/answer pair and its score,
/// computed exactly once.
#[derive(Debug)]
pub struct CompletedQuiz {
    pub questions: Vec<Question>,
    pub user_answers: Vec<Vec<usize>>,
    pub report: ScoreReport,
}

/// The trainer's per-student state machine: `Config → Quiz → Results`,
/// with restart leading back to `Config` from anywhere. A failed question
/// fetch never leaves `Config`, so the error overlay sits on top of the
/// config screen.
#[derive(Debug, Default)]
pub enum SessionState {
    #[default]
    Config,
    Quiz(QuizRun),
    Results(CompletedQuiz),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// Operation requires the config state.
    NotInConfig,
    /// Operation requires an active quiz.
    NotInQuiz,
    /// Question index out of range.
    NoSuchQuestion,
    /// Option index out of range for the addressed question.
    NoSuchOption,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            TransitionError::NotInConfig => "no quiz can start outside the config state",
            TransitionError::NotInQuiz => "no quiz is active",
            TransitionError::NoSuchQuestion => "question index out of range",
            TransitionError::NoSuchOption => "option index out of range",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for TransitionError {}

impl SessionState {
    /// Config → Quiz. Cleans up every fetched question and shuffles its
    /// options, then sets up one empty answer slot per question.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        questions: Vec<Question>,
        rng: &mut R,
    ) -> Result<(), TransitionError> {
        if !matches!(self, SessionState::Config) {
            return Err(TransitionError::NotInConfig);
        }

        let prepared: Vec<Question> = questions
            .into_iter()
            .map(|q| prepare_question(q, rng))
            .collect();
        let slots = vec![Vec::new(); prepared.len()];

        *self = SessionState::Quiz(QuizRun {
            questions: prepared,
            user_answers: slots,
            current: 0,
        });
        Ok(())
    }

    /// Apply a selection event to one question. The slot is replaced
    /// wholesale with the toggled result.
    pub fn select_answer(
        &mut self,
        question_idx: usize,
        option_idx: usize,
    ) -> Result<(), TransitionError> {
        let run = self.run_mut()?;
        let question = run
            .questions
            .get(question_idx)
            .ok_or(TransitionError::NoSuchQuestion)?;
        if option_idx >= question.options.len() {
            return Err(TransitionError::NoSuchOption);
        }

        let next = toggle_selection(
            &run.user_answers[question_idx],
            option_idx,
            question.question_type.is_multi(),
        );
        run.user_answers[question_idx] = next;
        Ok(())
    }

    /// Move the question pointer.
    pub fn goto(&mut self, question_idx: usize) -> Result<(), TransitionError> {
        let run = self.run_mut()?;
        if question_idx >= run.questions.len() {
            return Err(TransitionError::NoSuchQuestion);
        }
        run.current = question_idx;
        Ok(())
    }

    /// Quiz → Results. Callers reach this only through the confirmation
    /// dialog; there is no direct submit path in the surface.
    pub fn submit_confirmed(&mut self) -> Result<(), TransitionError> {
        match std::mem::take(self) {
            SessionState::Quiz(run) => {
                let report = score(&run.questions, &run.user_answers);
                *self = SessionState::Results(CompletedQuiz {
                    questions: run.questions,
                    user_answers: run.user_answers,
                    report,
                });
                Ok(())
            }
            other => {
                *self = other;
                Err(TransitionError::NotInQuiz)
            }
        }
    }

    /// Back to Config from anywhere, dropping all quiz data.
    pub fn restart(&mut self) {
        *self = SessionState::Config;
    }

    pub fn run(&self) -> Result<&QuizRun, TransitionError> {
        match self {
            SessionState::Quiz(run) => Ok(run),
            _ => Err(TransitionError::NotInQuiz),
        }
    }

    fn run_mut(&mut self) -> Result<&mut QuizRun, TransitionError> {
        match self {
            SessionState::Quiz(run) => Ok(run),
            _ => Err(TransitionError::NotInQuiz),
        }
    }

    pub fn results(&self) -> Option<&CompletedQuiz> {
        match self {
            SessionState::Results(completed) => Some(completed),
            _ => None,
        }
    }
}

fn prepare_question<R: Rng + ?Sized>(mut question: Question, rng: &mut R) -> Question {
    question.question_text = normalize(&question.question_text);
    question.options = question.options.iter().map(|o| normalize(o)).collect();
    question.category = question
        .category
        .as_deref()
        .map(normalize)
        .filter(|c| !c.is_empty());

    let shuffled = shuffle_options(&question.options, &question.correct_answer_indices, rng);
    question.options = shuffled.options;
    question.correct_answer_indices = shuffled.correct_indices;
    question
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn question(text: &str, options: &[&str], correct: &[usize], multi: bool) -> Question {
        Question {
            id: None,
            question_text: text.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answer_indices: correct.to_vec(),
            category: Some("Haltung".to_string()),
            question_type: if multi {
                QuestionType::Multi
            } else {
                QuestionType::Single
            },
            verband: None,
            image_url: None,
        }
    }

    fn started(questions: Vec<Question>) -> SessionState {
        let mut state = SessionState::default();
        let mut rng = StdRng::seed_from_u64(99);
        state.start(questions, &mut rng).expect("start from config");
        state
    }

    #[test]
    fn starts_only_from_config() {
        let mut state = started(vec![question("Q", &["a", "b"], &[0], false)]);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            state.start(vec![], &mut rng),
            Err(TransitionError::NotInConfig)
        );
    }

    #[test]
    fn start_normalizes_and_creates_empty_slots() {
        let state = started(vec![question(
            "Wer &amp; wie?\r\n\r\nGenau.",
            &["ja", "nein"],
            &[0],
            false,
        )]);
        let run = state.run().expect("quiz active");
        assert_eq!(run.questions()[0].question_text, "Wer & wie?\nGenau.");
        assert_eq!(run.len(), 1);
        assert!(!run.is_answered(0));
        assert_eq!(run.answered_count(), 0);
    }

    #[test]
    fn start_shuffles_but_keeps_correct_texts() {
        let state = started(vec![question(
            "Farbe?",
            &["rot", "grün", "blau", "gelb", "lila", "braun"],
            &[1, 3],
            true,
        )]);
        let q = &state.run().expect("quiz active").questions()[0];
        let mut correct_texts: Vec<&String> = q
            .correct_answer_indices
            .iter()
            .map(|&i| &q.options[i])
            .collect();
        correct_texts.sort();
        assert_eq!(correct_texts, vec!["gelb", "grün"]);
    }

    #[test]
    fn select_replaces_slot_and_respects_mode() {
        let mut state = started(vec![
            question("S", &["a", "b", "c"], &[0], false),
            question("M", &["a", "b", "c"], &[0, 1], true),
        ]);

        state.select_answer(0, 1).expect("select");
        state.select_answer(0, 2).expect("select");
        assert_eq!(state.run().expect("run").selection(0), &[2]);

        state.select_answer(1, 2).expect("select");
        state.select_answer(1, 0).expect("select");
        assert_eq!(state.run().expect("run").selection(1), &[0, 2]);
        state.select_answer(1, 2).expect("toggle off");
        assert_eq!(state.run().expect("run").selection(1), &[0]);
    }

    #[test]
    fn select_rejects_out_of_range() {
        let mut state = started(vec![question("Q", &["a", "b"], &[0], false)]);
        assert_eq!(
            state.select_answer(5, 0),
            Err(TransitionError::NoSuchQuestion)
        );
        assert_eq!(
            state.select_answer(0, 9),
            Err(TransitionError::NoSuchOption)
        );
    }

    #[test]
    fn goto_moves_pointer_within_bounds() {
        let mut state = started(vec![
            question("1", &["a", "b"], &[0], false),
            question("2", &["a", "b"], &[0], false),
        ]);
        state.goto(1).expect("goto");
        assert_eq!(state.run().expect("run").current_index(), 1);
        assert_eq!(state.goto(2), Err(TransitionError::NoSuchQuestion));
    }

    #[test]
    fn submit_freezes_results() {
        let mut state = started(vec![question("Q", &["ja", "nein"], &[0], false)]);
        let correct_idx = state.run().expect("run").questions()[0].correct_answer_indices[0];
        state.select_answer(0, correct_idx).expect("select");
        state.submit_confirmed().expect("submit");

        let completed = state.results().expect("results");
        assert_eq!(completed.report.correct_count, 1);
        assert_eq!(completed.report.percentage, 100);

        assert_eq!(state.submit_confirmed(), Err(TransitionError::NotInQuiz));
    }

    #[test]
    fn submit_requires_active_quiz() {
        let mut state = SessionState::default();
        assert_eq!(state.submit_confirmed(), Err(TransitionError::NotInQuiz));
    }

    #[test]
    fn restart_clears_everything() {
        let mut state = started(vec![question("Q", &["a", "b"], &[0], false)]);
        state.restart();
        assert!(matches!(state, SessionState::Config));
        assert!(state.results().is_none());

        // A fresh start is possible again.
        let mut rng = StdRng::seed_from_u64(3);
        state
            .start(vec![question("Q2", &["a", "b"], &[1], false)], &mut rng)
            .expect("restartable");
    }
}
