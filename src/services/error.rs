use sea_orm::DbErr;

use crate::db::dao::DaoLayerError;

/// Failures a todo-list operation can report.
///
/// Only the store and the validator originate these; every layer above passes them on
/// unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidPayload(String),
    #[error("{entity} not found (id={id})")]
    NotFound { entity: &'static str, id: i64 },
    #[error("Storage failure: {0}")]
    Storage(#[source] DbErr),
    #[error("Operation cancelled")]
    Cancelled,
}

impl ServiceError {
    /// Failures caused by the request itself rather than the backing store.
    pub fn is_client_error(&self) -> bool {
        match self {
            ServiceError::InvalidPayload(_) | ServiceError::NotFound { .. } => true,
            ServiceError::Storage(_) | ServiceError::Cancelled => false,
        }
    }
}

impl From<DaoLayerError> for ServiceError {
    fn from(err: DaoLayerError) -> Self {
        match err {
            DaoLayerError::Db(err) => ServiceError::Storage(err),
            DaoLayerError::NotFound { entity, id } => ServiceError::NotFound { entity, id },
            DaoLayerError::Cancelled => ServiceError::Cancelled,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;

    use super::ServiceError;
    use crate::db::dao::DaoLayerError;

    #[test]
    fn store_errors_keep_their_kind() {
        let not_found = ServiceError::from(DaoLayerError::NotFound {
            entity: "Todo list",
            id: 9,
        });
        assert!(matches!(
            not_found,
            ServiceError::NotFound {
                entity: "Todo list",
                id: 9
            }
        ));
        assert_eq!(not_found.to_string(), "Todo list not found (id=9)");

        let storage = ServiceError::from(DaoLayerError::Db(DbErr::Custom("down".to_string())));
        assert!(matches!(storage, ServiceError::Storage(_)));
        assert!(!storage.is_client_error());

        let cancelled = ServiceError::from(DaoLayerError::Cancelled);
        assert!(matches!(cancelled, ServiceError::Cancelled));
    }
}
