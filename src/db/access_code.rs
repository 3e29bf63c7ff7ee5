use color_eyre::{eyre::eyre, Result};

use crate::models::AccessCode;
use crate::names;
use crate::services::access_request::{CodeDelivery, CodeRepository};

use super::models::AccessCodeRow;
use super::Db;

const ACCESS_CODE_COLUMNS: &str = r#"
    id, code, student_name, email, is_active,
    to_char(created_at, 'YYYY-MM-DD') AS created_at,
    to_char(sent_at, 'YYYY-MM-DD') AS sent_at,
    send_status
"#;

impl Db {
    /// A code is valid when it exists, is active and is younger than the
    /// expiry window. Inactive or aged-out codes fail regardless of
    /// anything else.
    pub async fn validate_access_code(&self, code: &str) -> Result<bool> {
        let valid: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM access_codes
                WHERE code = $1
                  AND is_active
                  AND created_at >= NOW() - make_interval(months => $2)
            )
            "#,
        )
        .bind(code)
        .bind(names::ACCESS_CODE_MAX_AGE_MONTHS)
        .fetch_one(&self.pool)
        .await?;

        Ok(valid)
    }

    pub async fn fetch_all_access_codes(&self) -> Result<Vec<AccessCode>> {
        let rows: Vec<AccessCodeRow> = sqlx::query_as(&format!(
            "SELECT {ACCESS_CODE_COLUMNS} FROM access_codes ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn create_access_code(
        &self,
        code: &str,
        student_name: Option<&str>,
        email: &str,
    ) -> Result<AccessCode> {
        let row: AccessCodeRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO access_codes (code, student_name, email, is_active)
            VALUES ($1, $2, $3, TRUE)
            RETURNING {ACCESS_CODE_COLUMNS}
            "#,
        ))
        .bind(code)
        .bind(student_name)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("access code created: id={}", row.id);
        Ok(row.into())
    }

    /// Flip the activity gate and report the new state. Fails when the
    /// row is gone, which the optimistic toggle in the admin surface uses
    /// to roll back.
    pub async fn toggle_access_code_active(&self, id: i32) -> Result<bool> {
        let is_active: Option<bool> = sqlx::query_scalar(
            "UPDATE access_codes SET is_active = NOT is_active WHERE id = $1 RETURNING is_active",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        is_active.ok_or_else(|| eyre!("access code {id} not found"))
    }

    pub async fn delete_access_code(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM access_codes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!("deleted access code {id}");
        Ok(())
    }
}

impl CodeRepository for Db {
    async fn count_recent_code_requests_by_email(&self, email: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM access_code_request_log
            WHERE email = $1 AND created_at >= NOW() - make_interval(mins => $2)
            "#,
        )
        .bind(email)
        .bind(names::CODE_REQUEST_WINDOW_MINUTES as i32)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn count_recent_code_requests_by_address(&self, address: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM access_code_request_log
            WHERE ip = $1 AND created_at >= NOW() - make_interval(mins => $2)
            "#,
        )
        .bind(address)
        .bind(names::CODE_REQUEST_WINDOW_MINUTES as i32)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn log_code_request(&self, email: &str, address: Option<String>) -> Result<()> {
        sqlx::query("INSERT INTO access_code_request_log (email, ip) VALUES ($1, $2)")
            .bind(email)
            .bind(address)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_active_code_for_email(&self, email: &str) -> Result<Option<CodeDelivery>> {
        let row: Option<(String, Option<String>, String)> = sqlx::query_as(
            r#"
            SELECT code, student_name, email FROM access_codes
            WHERE email = $1 AND is_active
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(code, student_name, email)| CodeDelivery {
            code,
            student_name,
            email,
        }))
    }
}
