//! HTTP routes
//!
//! Maps each endpoint onto an engine command.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::engine::Engine;
use crate::error::StrataError;
use crate::model::Attributes;
use crate::protocol::{
    ApiError, Command, CommandOutput, CreateTableRequest, ErrorResponse, HealthResponse,
    QueryParams,
};

type Shared = State<Arc<Engine>>;

/// Build the router with all endpoints
pub fn router(engine: Arc<Engine>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/tables", post(create_table))
        .route("/api/v1/tables/:table/items", post(put_item).get(query_items))
        .route(
            "/api/v1/tables/:table/items/:pk",
            get(get_item).delete(delete_item),
        )
        .route(
            "/api/v1/tables/:table/items/:pk/:sk",
            get(get_sorted_item).delete(delete_sorted_item),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(engine)
}

/// Run a command; mutations go to the blocking pool
async fn run(engine: Arc<Engine>, command: Command) -> Result<CommandOutput, ApiError> {
    tracing::debug!(table = command.table_name(), mutation = command.is_mutation(), "command");

    if !command.is_mutation() {
        return Ok(engine.execute(command)?);
    }

    let output = tokio::task::spawn_blocking(move || engine.execute(command))
        .await
        .map_err(|e| StrataError::Network(format!("write task failed: {}", e)))??;
    Ok(output)
}

fn respond(output: CommandOutput, success: StatusCode) -> Response {
    match output {
        CommandOutput::Done => success.into_response(),
        CommandOutput::Item(Some(item)) => (success, Json(item)).into_response(),
        CommandOutput::Item(None) => {
            let body = ErrorResponse {
                status: StatusCode::NOT_FOUND.as_u16(),
                message: "Item not found".to_string(),
            };
            (StatusCode::NOT_FOUND, Json(body)).into_response()
        }
        CommandOutput::Items(items) => (success, Json(items)).into_response(),
    }
}

async fn health(State(engine): Shared) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        tables: engine.registry().len(),
        next_lsn: engine.next_lsn(),
    })
}

async fn create_table(
    State(engine): Shared,
    Json(req): Json<CreateTableRequest>,
) -> Result<Response, ApiError> {
    let output = run(engine, req.into()).await?;
    Ok(respond(output, StatusCode::CREATED))
}

async fn put_item(
    State(engine): Shared,
    Path(table_name): Path<String>,
    Json(attributes): Json<Attributes>,
) -> Result<Response, ApiError> {
    let command = Command::PutItem {
        table_name,
        attributes,
    };
    let output = run(engine, command).await?;
    Ok(respond(output, StatusCode::OK))
}

async fn get_item(
    State(engine): Shared,
    Path((table_name, partition_key)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    fetch(engine, table_name, partition_key, None).await
}

async fn get_sorted_item(
    State(engine): Shared,
    Path((table_name, partition_key, sort_key)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    fetch(engine, table_name, partition_key, Some(sort_key)).await
}

async fn fetch(
    engine: Arc<Engine>,
    table_name: String,
    partition_key: String,
    sort_key: Option<String>,
) -> Result<Response, ApiError> {
    let command = Command::GetItem {
        table_name,
        partition_key,
        sort_key,
    };
    let output = run(engine, command).await?;
    Ok(respond(output, StatusCode::OK))
}

async fn delete_item(
    State(engine): Shared,
    Path((table_name, partition_key)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    remove(engine, table_name, partition_key, None).await
}

async fn delete_sorted_item(
    State(engine): Shared,
    Path((table_name, partition_key, sort_key)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    remove(engine, table_name, partition_key, Some(sort_key)).await
}

async fn remove(
    engine: Arc<Engine>,
    table_name: String,
    partition_key: String,
    sort_key: Option<String>,
) -> Result<Response, ApiError> {
    let command = Command::DeleteItem {
        table_name,
        partition_key,
        sort_key,
    };
    let output = run(engine, command).await?;
    Ok(respond(output, StatusCode::NO_CONTENT))
}

async fn query_items(
    State(engine): Shared,
    Path(table_name): Path<String>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    let command = Command::Query {
        table_name,
        partition_key: params.partition_key,
        start_key: params.start_key,
        end_key: params.end_key,
    };
    let output = run(engine, command).await?;
    Ok(respond(output, StatusCode::OK))
}
