use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::error::panic_response;
use crate::handler;
use crate::AppState;

async fn count_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.metrics.request_received();
    next.run(request).await
}

/// Build the axum router with every simulator endpoint.
pub fn build_router(state: AppState) -> Router {
    let mut router: Router<AppState> = Router::new()
        .route("/", get(handler::root_handler))
        .route("/health", get(handler::health_handler))
        .route("/cbs/customers", get(handler::list_customers))
        .route("/cbs/accounts", get(handler::list_accounts))
        .route("/cbs/customer/:id", get(handler::get_customer))
        .route("/cbs/account/:id", get(handler::get_account))
        .route("/cbs/account/:id/history", get(handler::get_account_history))
        .route("/cbs/history/:id", get(handler::get_statement))
        .route("/cbs/transfer", post(handler::transfer))
        .route("/api/accounts/:account_number", get(handler::api_get_account))
        .route("/api/balance/:account_number", get(handler::api_get_balance))
        .route("/api/transactions", post(handler::api_post_transaction));

    if state.config.metrics_enabled {
        router = router.route("/metrics", get(handler::metrics_handler));
    }

    router
        .fallback(handler::fallback_handler)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(state.clone(), count_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
