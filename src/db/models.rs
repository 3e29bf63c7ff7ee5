// Database row structs and their conversions into domain types

use crate::models::{AccessCode, Question, QuestionType, Verband};

#[derive(sqlx::FromRow)]
pub struct QuestionRow {
    pub id: i32,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer_indices: Vec<i32>,
    pub category: Option<String>,
    pub question_type: String,
    pub verband: Option<String>,
    pub image_url: Option<String>,
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        Question {
            id: Some(row.id),
            question_text: row.question_text,
            options: row.options,
            correct_answer_indices: row
                .correct_answer_indices
                .into_iter()
                .filter(|&i| i >= 0)
                .map(|i| i as usize)
                .collect(),
            category: row.category,
            question_type: QuestionType::parse(&row.question_type),
            verband: row.verband.as_deref().and_then(Verband::parse),
            image_url: row.image_url,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct AccessCodeRow {
    pub id: i32,
    pub code: String,
    pub student_name: Option<String>,
    pub email: String,
    pub is_active: bool,
    pub created_at: String,
    pub sent_at: Option<String>,
    pub send_status: Option<String>,
}

impl From<AccessCodeRow> for AccessCode {
    fn from(row: AccessCodeRow) -> Self {
        AccessCode {
            id: row.id,
            code: row.code,
            student_name: row.student_name,
            email: row.email,
            is_active: row.is_active,
            created_at: row.created_at,
            sent_at: row.sent_at,
            send_status: row.send_status,
        }
    }
}
