use color_eyre::{eyre::eyre, eyre::OptionExt, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::models::{Question, Verband};

use super::models::QuestionRow;
use super::Db;

const QUESTION_COLUMNS: &str = "id, question_text, options, correct_answer_indices, category, question_type, verband, image_url";

impl Db {
    pub async fn fetch_all_questions(&self) -> Result<Vec<Question>> {
        let rows: Vec<QuestionRow> = sqlx::query_as(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Draw up to `count` random questions, optionally restricted to one
    /// Verband. Returns an empty vec when nothing matches; the caller
    /// decides how to surface that.
    pub async fn fetch_random_questions(
        &self,
        count: i64,
        verband: Option<Verband>,
    ) -> Result<Vec<Question>> {
        let rows: Vec<QuestionRow> = sqlx::query_as(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE $1::TEXT IS NULL OR verband = $1"
        ))
        .bind(verband.map(|v| v.as_str()))
        .fetch_all(&self.pool)
        .await?;

        let mut questions: Vec<Question> = rows.into_iter().map(Into::into).collect();

        let mut rng = StdRng::seed_from_u64(rand::random());
        questions.shuffle(&mut rng);
        questions.truncate(count.max(0) as usize);

        Ok(questions)
    }

    pub async fn get_question(&self, id: i32) -> Result<Option<Question>> {
        let row: Option<QuestionRow> = sqlx::query_as(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn create_question(&self, question: &Question) -> Result<Question> {
        let row: QuestionRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO questions (question_text, options, correct_answer_indices, category, question_type, verband, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {QUESTION_COLUMNS}
            "#,
        ))
        .bind(&question.question_text)
        .bind(&question.options)
        .bind(correct_indices(question))
        .bind(&question.category)
        .bind(question.question_type.as_str())
        .bind(question.verband.map(|v| v.as_str()))
        .bind(&question.image_url)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("question created: id={}", row.id);
        Ok(row.into())
    }

    pub async fn update_question(&self, question: &Question) -> Result<Question> {
        let id = question.id.ok_or_eyre("question has no id to update")?;

        let row: QuestionRow = sqlx::query_as(&format!(
            r#"
            UPDATE questions
            SET question_text = $2, options = $3, correct_answer_indices = $4,
                category = $5, question_type = $6, verband = $7, image_url = $8
            WHERE id = $1
            RETURNING {QUESTION_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(&question.question_text)
        .bind(&question.options)
        .bind(correct_indices(question))
        .bind(&question.category)
        .bind(question.question_type.as_str())
        .bind(question.verband.map(|v| v.as_str()))
        .bind(&question.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    pub async fn delete_question(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(eyre!("question {id} was not deleted (missing or no permission)"));
        }

        tracing::info!("deleted question {id}");
        Ok(())
    }

    pub async fn delete_questions(&self, ids: &[i32]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let result = sqlx::query("DELETE FROM questions WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;

        tracing::info!("deleted {} questions", result.rows_affected());
        Ok(())
    }

    /// Bulk import. All rows go in atomically; a bad row aborts the batch.
    pub async fn insert_questions(&self, questions: &[Question]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        for question in questions {
            sqlx::query(
                r#"
                INSERT INTO questions (question_text, options, correct_answer_indices, category, question_type, verband, image_url)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(&question.question_text)
            .bind(&question.options)
            .bind(correct_indices(question))
            .bind(&question.category)
            .bind(question.question_type.as_str())
            .bind(question.verband.map(|v| v.as_str()))
            .bind(&question.image_url)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!("imported {} questions", questions.len());
        Ok(questions.len())
    }
}

fn correct_indices(question: &Question) -> Vec<i32> {
    question
        .correct_answer_indices
        .iter()
        .map(|&i| i as i32)
        .collect()
}
