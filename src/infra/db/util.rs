use crate::application::repos::RepoError;

pub(crate) fn convert_count(value: i64) -> Result<u64, RepoError> {
    value
        .try_into()
        .map_err(|_| RepoError::from_persistence("count exceeds supported range"))
}

/// Classify SQLite driver failures into repository errors. The driver
/// reports constraint failures as flat message strings; the message is
/// kept verbatim because it names the offending table and column.
pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::Database(db) if db.message().contains("UNIQUE constraint failed") => {
            RepoError::Duplicate {
                constraint: db.message().to_string(),
            }
        }
        sqlx::Error::Database(db) if db.message().contains("constraint failed") => {
            // FOREIGN KEY, NOT NULL, and CHECK violations all land here.
            RepoError::Constraint {
                message: db.message().to_string(),
            }
        }
        other => RepoError::from_persistence(other),
    }
}
