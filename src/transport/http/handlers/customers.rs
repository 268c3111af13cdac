use crate::domain::{CustomerDto, CustomerFields};
use crate::transport::http::handlers::common::{
    data_response, service_error_response, TAX_ID_EXISTS, TAX_ID_EXISTS_DETAIL,
};
use crate::transport::http::types::{json_422, path_400, ApiResponse, AppState};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

const FIELDS_SHAPE: &str = r#"{"name", "phone", "email", "address", "taxId"}"#;

#[utoipa::path(
    get,
    path = "/customers",
    responses(
        (status = 200, description = "All customers", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_customers_handler(State(state): State<AppState>) -> impl IntoResponse {
    let context = "retrieving customers";
    match state.customers.list().await {
        Ok(customers) => {
            let dtos: Vec<CustomerDto> = customers.into_iter().map(CustomerDto::from).collect();
            data_response(StatusCode::OK, "Customers retrieved successfully", &dtos, context)
                .into_response()
        }
        Err(e) => service_error_response(e, context).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/customers/{id}",
    params(
        ("id" = i32, Path, description = "Customer id")
    ),
    responses(
        (status = 200, description = "Customer found", body = ApiResponse),
        (status = 404, description = "No customer with this id", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn get_customer_handler(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> impl IntoResponse {
    let Path(id) = match id {
        Ok(v) => v,
        Err(e) => return path_400(e).into_response(),
    };
    let context = "retrieving the customer";
    match state.customers.get(id).await {
        Ok(customer) => data_response(
            StatusCode::OK,
            "Customer retrieved successfully",
            &CustomerDto::from(customer),
            context,
        )
        .into_response(),
        Err(e) => service_error_response(e, context).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/customers",
    request_body = CustomerFields,
    responses(
        (status = 201, description = "Customer created", body = ApiResponse),
        (status = 400, description = "Field or legacy validation failed", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn create_customer_handler(
    State(state): State<AppState>,
    request: Result<Json<CustomerFields>, JsonRejection>,
) -> impl IntoResponse {
    let Json(fields) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, FIELDS_SHAPE).into_response(),
    };
    let context = "creating the customer";
    match state.customers.create(fields).await {
        Ok(customer) => {
            let location = format!("/customers/{}", customer.id);
            let (status, body) = data_response(
                StatusCode::CREATED,
                "Customer created successfully",
                &CustomerDto::from(customer),
                context,
            );
            if status == StatusCode::CREATED {
                (status, [(header::LOCATION, location)], body).into_response()
            } else {
                (status, body).into_response()
            }
        }
        Err(e) => service_error_response(e, context).into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/customers/{id}",
    params(
        ("id" = i32, Path, description = "Customer id")
    ),
    request_body = CustomerFields,
    responses(
        (status = 200, description = "Customer updated", body = ApiResponse),
        (status = 400, description = "Field validation failed or tax id taken", body = ApiResponse),
        (status = 404, description = "No customer with this id", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn update_customer_handler(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    request: Result<Json<CustomerFields>, JsonRejection>,
) -> impl IntoResponse {
    let Path(id) = match id {
        Ok(v) => v,
        Err(e) => return path_400(e).into_response(),
    };
    let Json(fields) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, FIELDS_SHAPE).into_response(),
    };
    let context = "updating the customer";
    match state.customers.update(id, fields).await {
        Ok(customer) => data_response(
            StatusCode::OK,
            "Customer updated successfully",
            &CustomerDto::from(customer),
            context,
        )
        .into_response(),
        Err(e) => service_error_response(e, context).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/customers/{id}",
    params(
        ("id" = i32, Path, description = "Customer id")
    ),
    responses(
        (status = 200, description = "Customer deleted", body = ApiResponse),
        (status = 404, description = "No customer with this id", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn delete_customer_handler(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> impl IntoResponse {
    let Path(id) = match id {
        Ok(v) => v,
        Err(e) => return path_400(e).into_response(),
    };
    match state.customers.delete(id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::ok("Customer deleted successfully")),
        )
            .into_response(),
        Err(e) => service_error_response(e, "deleting the customer").into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/customers/validate-tax-id/{tax_id}",
    params(
        ("tax_id" = String, Path, description = "Tax id to check")
    ),
    responses(
        (status = 200, description = "Tax id is available", body = ApiResponse),
        (status = 400, description = "Tax id is already taken", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn validate_tax_id_handler(
    State(state): State<AppState>,
    Path(tax_id): Path<String>,
) -> impl IntoResponse {
    match state.customers.check_tax_id_available(&tax_id).await {
        Ok(true) => (StatusCode::OK, Json(ApiResponse::ok("Tax ID is available"))).into_response(),
        Ok(false) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::failure(TAX_ID_EXISTS, TAX_ID_EXISTS_DETAIL)),
        )
            .into_response(),
        Err(e) => service_error_response(e, "validating the Tax ID").into_response(),
    }
}
