use grpc_jwt_propagation::AuthError;
use thiserror::Error;
use tonic::{Code, Status};

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ServiceError {
    /// Convert to gRPC Status for wire protocol
    pub fn to_status(&self) -> Status {
        match self {
            ServiceError::Validation(msg) => Status::new(Code::InvalidArgument, msg.clone()),
            ServiceError::NotFound(what) => {
                Status::new(Code::NotFound, format!("{} not found", what))
            }
            // Don't leak internal details to callers
            ServiceError::Database(_) => Status::new(Code::Internal, "internal server error"),
            ServiceError::Auth(err) => err.to_status(),
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_foreign_key_violation() {
                return ServiceError::Validation("user_id does not reference a user".to_string());
            }
        }

        tracing::error!("Database error: {}", err);
        ServiceError::Database(err.to_string())
    }
}

// gRPC Status conversion
impl From<ServiceError> for Status {
    fn from(err: ServiceError) -> Self {
        err.to_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_detail_is_hidden() {
        let status = ServiceError::Database("relation \"todos\" does not exist".into()).to_status();
        assert_eq!(status.code(), Code::Internal);
        assert_eq!(status.message(), "internal server error");
    }

    #[test]
    fn test_validation_and_not_found() {
        let status = ServiceError::Validation("id is required".into()).to_status();
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "id is required");

        let status = ServiceError::NotFound("todo".into()).to_status();
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "todo not found");
    }

    #[test]
    fn test_auth_errors_keep_their_mapping() {
        let status: Status = ServiceError::from(AuthError::AuthenticationFailed).into();
        assert_eq!(status.code(), Code::Unauthenticated);
        assert_eq!(status.message(), "authentication failed");
    }

    #[test]
    fn test_row_not_found_is_internal() {
        let status = ServiceError::from(sqlx::Error::RowNotFound).to_status();
        assert_eq!(status.code(), Code::Internal);
    }
}
