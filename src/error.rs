use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::Debug;

#[derive(Debug, Clone)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        database_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        decode_error(err)
    }
}

impl From<oso::OsoError> for Error {
    fn from(err: oso::OsoError) -> Self {
        authorizor_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            102 => (StatusCode::UNAUTHORIZED, self.message.as_str()),
            121 | 130 => (StatusCode::NOT_FOUND, self.message.as_str()),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl Error {
    pub fn is_invalid_input_error(&self) -> bool {
        self.code == 101
    }

    pub fn is_invalid_state_error(&self) -> bool {
        self.code == 100
    }

    pub fn is_registry_not_found_error(&self) -> bool {
        self.code == 121
    }

    pub fn is_bid_not_found_error(&self) -> bool {
        self.code == 130
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: 1,
        message: "environment variable error".into(),
    }
}

pub fn database_error<T: Debug>(_: T) -> Error {
    Error {
        code: 2,
        message: "database error".into(),
    }
}

pub fn reqwest_error(_: reqwest::Error) -> Error {
    Error {
        code: 3,
        message: "reqwest error".into(),
    }
}

pub fn decode_error<T: Debug>(_: T) -> Error {
    Error {
        code: 4,
        message: "decode error".into(),
    }
}

pub fn authorizor_error(_: oso::OsoError) -> Error {
    Error {
        code: 5,
        message: "authorizor error".into(),
    }
}

pub fn invalid_state_error() -> Error {
    Error {
        code: 100,
        message: "invalid state".into(),
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 101,
        message: "invalid input".into(),
    }
}

pub fn unauthorized_error() -> Error {
    Error {
        code: 102,
        message: "unauthorized".into(),
    }
}

pub fn validation_error(message: impl Into<String>) -> Error {
    Error {
        code: 110,
        message: message.into(),
    }
}

pub fn registry_access_denied_error() -> Error {
    Error {
        code: 120,
        message: "FMCSA registry denied access; verification cannot proceed".into(),
    }
}

pub fn registry_not_found_error() -> Error {
    Error {
        code: 121,
        message: "no FMCSA registry record found for the given identifier".into(),
    }
}

pub fn registry_unavailable_error() -> Error {
    Error {
        code: 122,
        message: "FMCSA registry is unavailable; resubmit to retry verification".into(),
    }
}

pub fn unrecognized_shape_error() -> Error {
    Error {
        code: 123,
        message: "FMCSA registry returned a payload in an unrecognized shape".into(),
    }
}

pub fn bid_not_found_error() -> Error {
    Error {
        code: 130,
        message: "bid not found".into(),
    }
}

pub fn invalid_operation_error(message: impl Into<String>) -> Error {
    Error {
        code: 131,
        message: message.into(),
    }
}
