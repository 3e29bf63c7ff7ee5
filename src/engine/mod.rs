//! The quiz engine: pure, synchronous transformations over one attempt's
//! questions and answers. Everything here is safe to call repeatedly and
//! touches no I/O; the handlers own fetching and rendering.

mod answer;
mod normalize;
mod score;
mod session;
mod shuffle;

pub use answer::{clamp_to_single, toggle_selection};
pub use normalize::normalize;
pub use score::{score, OptionOutcome, QuestionOutcome, ScoreReport};
pub use session::{CompletedQuiz, QuizRun, SessionState, TransitionError};
pub use shuffle::{shuffle_options, shuffle_options_with, ShuffledOptions};
