//! Actix glue: the `/graphql` endpoint, the subscription WebSocket, and the
//! welcome route.
//!
//! Each HTTP request gets a freshly built request context derived from the
//! `Authorization` header; WebSocket connections derive theirs from the
//! `Authorization` field of the connection-init payload, once per
//! connection.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use async_graphql::{Data, ServerError};
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse, GraphQLSubscription};
use tracing::warn;

use crate::domain::GatewayState;
use crate::inbound::graphql::GatewaySchema;

/// Shared application state: the executable schema plus the gateway wiring
/// used to build per-request contexts.
pub struct AppState {
    pub schema: GatewaySchema,
    pub gateway: GatewayState,
}

#[get("/")]
pub async fn welcome() -> impl Responder {
    "Welcome to the PhotoShare API"
}

#[post("/graphql")]
pub async fn graphql(
    state: web::Data<AppState>,
    http_request: HttpRequest,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let credential = http_request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    match state.gateway.request_context(credential.as_deref()).await {
        Ok(context) => state
            .schema
            .execute(request.into_inner().data(context))
            .await
            .into(),
        Err(error) => {
            warn!(error = %error, "request context construction failed");
            async_graphql::Response::from_errors(vec![ServerError::new(error.to_string(), None)])
                .into()
        }
    }
}

#[get("/graphql/ws")]
pub async fn graphql_ws(
    state: web::Data<AppState>,
    request: HttpRequest,
    payload: web::Payload,
) -> actix_web::Result<HttpResponse> {
    let gateway = state.gateway.clone();
    GraphQLSubscription::new(state.schema.clone())
        .on_connection_init(move |value| connection_init(gateway, value))
        .start(&request, payload)
}

/// Build the connection-scoped context from the init payload.
async fn connection_init(
    gateway: GatewayState,
    payload: serde_json::Value,
) -> async_graphql::Result<Data> {
    let credential = payload.get("Authorization").and_then(|value| value.as_str());
    let context = gateway
        .request_context(credential)
        .await
        .map_err(|error| async_graphql::Error::new(error.to_string()))?;

    let mut data = Data::default();
    data.insert(context);
    Ok(data)
}
