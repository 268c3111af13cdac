use crate::domain::{CustomerDto, CustomerFields};
use crate::infra::config::AppConfig;
use crate::transport::http::handlers::{customers, health};
use crate::transport::http::types::{ApiResponse, HealthReport};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        customers::list_customers_handler,
        customers::get_customer_handler,
        customers::create_customer_handler,
        customers::update_customer_handler,
        customers::delete_customer_handler,
        customers::validate_tax_id_handler
    ),
    components(schemas(ApiResponse, CustomerDto, CustomerFields, HealthReport))
)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/customers",
            get(customers::list_customers_handler).post(customers::create_customer_handler),
        )
        .route(
            "/customers/validate-tax-id/:tax_id",
            get(customers::validate_tax_id_handler),
        )
        .route(
            "/customers/:id",
            get(customers::get_customer_handler)
                .put(customers::update_customer_handler)
                .delete(customers::delete_customer_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Any origin unless `CORS_ALLOWED_ORIGIN` names one.
pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    match config.cors_allowed_origin.clone() {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}
