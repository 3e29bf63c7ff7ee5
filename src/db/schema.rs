use color_eyre::Result;
use sqlx::PgPool;

const TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS questions (
        id SERIAL PRIMARY KEY,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        question_text TEXT NOT NULL,
        options TEXT[] NOT NULL,
        correct_answer_indices INT[] NOT NULL,
        category TEXT,
        question_type TEXT NOT NULL DEFAULT 'Single',
        verband TEXT,
        image_url TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS access_codes (
        id SERIAL PRIMARY KEY,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        code TEXT NOT NULL UNIQUE,
        student_name TEXT,
        email TEXT NOT NULL DEFAULT '',
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        sent_at TIMESTAMPTZ,
        send_status TEXT,
        send_error TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS admin_users (
        id SERIAL PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS access_code_request_log (
        id SERIAL PRIMARY KEY,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        email TEXT NOT NULL,
        ip TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS learning_materials (
        key TEXT PRIMARY KEY,
        content BYTEA NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
];

pub async fn create_schema(pool: &PgPool) -> Result<()> {
    for table in TABLES {
        sqlx::query(table).execute(pool).await?;
    }
    Ok(())
}
