use crate::app::ServiceError;
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

pub const CUSTOMER_NOT_FOUND: &str = "Customer not found";
pub const TAX_ID_EXISTS: &str = "Tax ID already exists";
pub const TAX_ID_EXISTS_DETAIL: &str = "A customer with this Tax ID already exists in the system";
const INTERNAL_ERROR: &str = "Internal server error";

/// Maps a service failure to its status code and envelope.
///
/// `context` names the operation for the 500 message, e.g. `"creating the customer"`.
/// Internal details are logged, never returned.
pub fn service_error_response(err: ServiceError, context: &str) -> (StatusCode, Json<ApiResponse>) {
    match err {
        ServiceError::ValidationFailed(errors) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse {
                success: false,
                message: Some("Validation failed".to_string()),
                errors: Some(errors),
                ..Default::default()
            }),
        ),
        ServiceError::ExternalValidationFailed { message, errors } => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::failure("Legacy validation failed", message).with_errors(errors)),
        ),
        ServiceError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::failure(
                CUSTOMER_NOT_FOUND,
                format!("Customer with ID {} does not exist", id),
            )),
        ),
        ServiceError::DuplicateTaxId(_) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::failure(TAX_ID_EXISTS, TAX_ID_EXISTS_DETAIL)),
        ),
        fault @ (ServiceError::ValidatorTimeout(_)
        | ServiceError::Validator(_)
        | ServiceError::Store(_)) => {
            tracing::error!(error = %fault, "request failed while {}", context);
            internal_error(context)
        }
    }
}

pub fn internal_error(context: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::failure(
            format!("An error occurred while {}", context),
            INTERNAL_ERROR,
        )),
    )
}

/// Builds a success envelope carrying `data`.
pub fn data_response<T: Serialize>(
    status: StatusCode,
    message: &str,
    data: &T,
    context: &str,
) -> (StatusCode, Json<ApiResponse>) {
    match serde_json::to_value(data) {
        Ok(value) => (status, Json(ApiResponse::ok(message).with_data(value))),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response while {}", context);
            internal_error(context)
        }
    }
}
