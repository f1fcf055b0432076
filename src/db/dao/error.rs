use sea_orm::DbErr;

#[derive(Debug, thiserror::Error)]
pub enum DaoLayerError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
    #[error("{entity} not found (id={id})")]
    NotFound { entity: &'static str, id: i64 },
    #[error("Storage call cancelled")]
    Cancelled,
}

pub type DaoResult<T> = Result<T, DaoLayerError>;
