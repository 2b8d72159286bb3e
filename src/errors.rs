use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mongodb::error::Error as MongoError;
use serde_json::json;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Mongo(#[from] MongoError),

    #[error("Error parsing ObjectID {0}")]
    ParseObjectID(String),

    #[error("{0}")]
    DeserializeDocument(#[from] bson::de::Error),

    #[error("{0}")]
    SerializeDocument(#[from] bson::ser::Error),

    #[error("{0}")]
    BadRequest(#[from] BadRequest),

    #[error("{0}")]
    NotFound(#[from] NotFound),

    #[error("{0}")]
    Conflict(#[from] Conflict),

    #[error("{0}")]
    Internal(#[from] Internal),

    #[error("{0}")]
    Unauthorized(#[from] Unauthorized),

    #[error("Store call timed out after {0} ms")]
    Timeout(u64),

    #[error("{0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl Error {
    fn get_codes(&self) -> (StatusCode, u16) {
        match *self {
            // 4XX Errors
            Error::ParseObjectID(_) => (StatusCode::BAD_REQUEST, 40001),
            Error::BadRequest(_) => (StatusCode::BAD_REQUEST, 40002),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, 40003),
            Error::Unauthorized(_) => (StatusCode::UNAUTHORIZED, 40004),
            Error::Conflict(_) => (StatusCode::CONFLICT, 40006),

            // 5XX Errors
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, 5000),
            Error::Mongo(_) => (StatusCode::INTERNAL_SERVER_ERROR, 5003),
            Error::DeserializeDocument(_) => (StatusCode::INTERNAL_SERVER_ERROR, 5004),
            Error::SerializeDocument(_) => (StatusCode::INTERNAL_SERVER_ERROR, 5005),
            Error::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, 5006),
            Error::SerdeJsonError(_) => (StatusCode::INTERNAL_SERVER_ERROR, 6003),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Error::BadRequest(BadRequest {
            message: message.to_string(),
        })
    }

    pub fn not_found(message: &str) -> Self {
        Error::NotFound(NotFound {
            message: message.to_string(),
        })
    }

    pub fn conflict(message: &str) -> Self {
        Error::Conflict(Conflict {
            message: message.to_string(),
        })
    }

    pub fn internal_err(message: &str) -> Self {
        Error::Internal(Internal {
            message: message.to_string(),
        })
    }

    pub fn unauthorized(message: &str) -> Self {
        Error::Unauthorized(Unauthorized {
            message: message.to_string(),
        })
    }

}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("{self:?}");

        let (status_code, code) = self.get_codes();
        let message = self.to_string();

        (status_code, Json(json!({ "code": code, "message": message }))).into_response()
    }
}

#[derive(thiserror::Error, Debug)]
#[error("Bad Request: {message}")]
pub struct BadRequest {
    pub message: String,
}

#[derive(thiserror::Error, Debug)]
#[error("Not found: {message}")]
pub struct NotFound {
    pub message: String,
}

#[derive(thiserror::Error, Debug)]
#[error("Conflict: {message}")]
pub struct Conflict {
    pub message: String,
}

#[derive(thiserror::Error, Debug)]
#[error("Internal error: {message}")]
pub struct Internal {
    pub message: String,
}

#[derive(thiserror::Error, Debug)]
#[error("Unauthorized error: {message}")]
pub struct Unauthorized {
    pub message: String,
}
