use serde::{Deserialize, Serialize};

/// Question mode: exactly one correct answer vs. one or more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuestionType {
    #[default]
    Single,
    Multi,
}

impl QuestionType {
    pub fn is_multi(self) -> bool {
        matches!(self, QuestionType::Multi)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Single => "Single",
            QuestionType::Multi => "Multi",
        }
    }

    /// Import rule: anything whose label starts with "Single" is Single,
    /// everything else is Multi.
    pub fn parse(label: &str) -> Self {
        if label.trim().starts_with("Single") {
            QuestionType::Single
        } else {
            QuestionType::Multi
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Association a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verband {
    Dzkb,
    ProHunde,
}

impl Verband {
    pub const ALL: [Verband; 2] = [Verband::Dzkb, Verband::ProHunde];

    pub fn as_str(self) -> &'static str {
        match self {
            Verband::Dzkb => "DZKB",
            Verband::ProHunde => "ProHunde",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "DZKB" => Some(Verband::Dzkb),
            "ProHunde" => Some(Verband::ProHunde),
            _ => None,
        }
    }
}

impl std::fmt::Display for Verband {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One quiz item. `id` is absent until the record has been persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: Option<i32>,
    pub question_text: String,
    pub options: Vec<String>,
    /// Ascending, unique indices into `options`. For `Single` questions
    /// there is exactly one.
    pub correct_answer_indices: Vec<usize>,
    pub category: Option<String>,
    pub question_type: QuestionType,
    pub verband: Option<Verband>,
    pub image_url: Option<String>,
}

/// Access code record as stored by the backend. Read-mostly on this side;
/// created and toggled through the admin surface.
#[derive(Debug, Clone)]
pub struct AccessCode {
    pub id: i32,
    pub code: String,
    pub student_name: Option<String>,
    pub email: String,
    pub is_active: bool,
    /// Formatted `YYYY-MM-DD`, rendered as-is in the admin table.
    pub created_at: String,
    pub sent_at: Option<String>,
    pub send_status: Option<String>,
}
