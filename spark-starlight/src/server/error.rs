use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use spark_guidance::GuidanceError;
use std::fmt::{Display, Formatter};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub detail: String,
}

/// A request the engine cannot work with. Always answered with 400.
#[derive(Debug)]
pub struct ApiError(pub GuidanceError);

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<GuidanceError> for ApiError {
    fn from(err: GuidanceError) -> Self {
        ApiError(err)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: "invalid_request",
            detail: self.0.to_string(),
        })
    }
}

/// Body errors, including rejected detections, in the same `{error, detail}` shape.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    error!("Rejected body for {}: {}", req.path(), err);
    let response = HttpResponse::BadRequest().json(ErrorBody {
        error: "invalid_body",
        detail: err.to_string(),
    });
    InternalError::from_response(err, response).into()
}
