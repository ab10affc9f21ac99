use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};

use crate::tmdb::CatalogError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("movie already exists ({0})")]
    UniqueConstraintViolation(String),

    #[error("movie catalog unavailable: {0}")]
    CatalogUnavailable(#[from] CatalogError),

    #[error("{0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(DbErr),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn movie_not_found(id: i32) -> Self {
        Self::NotFound(format!("movie {id}"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
            Self::CatalogUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => Self::UniqueConstraintViolation(msg),
            _ => Self::Database(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                "Something went wrong. Please try again.".to_string()
            }
            Self::CatalogUnavailable(_) => {
                tracing::warn!(error = %self, "catalog request failed");
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = crate::templates::error_page(status, &message);
        (status, Html(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(AppError::movie_not_found(3).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::UniqueConstraintViolation("movie.title".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::Validation("id is required".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::from(DbErr::Custom("boom".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn internal_details_are_not_rendered() {
        use http_body_util::BodyExt;

        let resp = AppError::Internal(anyhow::anyhow!("secret path /var/db")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Something went wrong"));
        assert!(!body.contains("secret path"));
    }
}
