#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Stored date {value:?} is not a valid YYYY-MM-DD date: {source}")]
    InvalidStoredDate {
        value: String,
        source: chrono::ParseError,
    },
}
