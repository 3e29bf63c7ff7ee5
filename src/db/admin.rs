use color_eyre::Result;

use crate::names;

use super::Db;

impl Db {
    /// Credentials are compared directly against the stored record, the
    /// way the backing table keeps them.
    pub async fn validate_admin_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<bool> {
        let valid: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM admin_users WHERE username = $1 AND password = $2)",
        )
        .bind(username)
        .bind(password)
        .fetch_one(&self.pool)
        .await?;

        Ok(valid)
    }

    /// Store the study guide under its fixed key, replacing whatever was
    /// there before. There is only ever one current guide.
    pub async fn upload_study_guide(&self, content: &[u8]) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO learning_materials (key, content, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE SET content = EXCLUDED.content, updated_at = NOW()
            "#,
        )
        .bind(names::STUDY_GUIDE_KEY)
        .bind(content)
        .execute(&self.pool)
        .await?;

        tracing::info!("study guide replaced ({} bytes)", content.len());
        Ok(())
    }

    pub async fn fetch_study_guide(&self) -> Result<Option<Vec<u8>>> {
        let content: Option<Vec<u8>> =
            sqlx::query_scalar("SELECT content FROM learning_materials WHERE key = $1")
                .bind(names::STUDY_GUIDE_KEY)
                .fetch_optional(&self.pool)
                .await?;

        Ok(content)
    }
}
