use std::{collections::HashMap, sync::Arc};

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sea_orm::{DbErr, SqlErr};
use serde_json::{Value, json};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::{ApiResponse, EntryResponse, Stats},
    pagination, timestamps, validate,
};

type Reply = ApiResult<(StatusCode, Json<ApiResponse>)>;

const DUPLICATE_TITLE_YEAR: &str = "An entry with this title and year already exists";
const DUPLICATE_TITLE: &str = "An entry with this title already exists";

/// A whitespace-only body maps to `Null`; anything else must parse as JSON.
fn parse_json(bytes: &Bytes) -> Result<Value, ApiError> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|_| ApiError::MalformedJson)
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// POST /api/entries
pub async fn create_entry(State(state): State<Arc<AppState>>, body: Bytes) -> Reply {
    let value = parse_json(&body)?;
    if value.is_null() || value.as_object().is_some_and(|obj| obj.is_empty()) {
        return Err(ApiError::EmptyBody);
    }

    let entry = validate::validate_create(&value).map_err(|errors| {
        ApiError::validation("Validation failed. Please provide all required fields.", errors)
    })?;

    let duplicate = state
        .store
        .find_by_title_year(&entry.title, entry.year)
        .await
        .map_err(ApiError::internal("Failed to create entry"))?;
    if duplicate.is_some() {
        return Err(ApiError::Conflict(DUPLICATE_TITLE_YEAR));
    }

    // The unique index backstops the probe against a concurrent create
    // slipping in between the check and the write.
    let created = match state.store.insert(entry).await {
        Ok(model) => model,
        Err(err) if is_unique_violation(&err) => {
            return Err(ApiError::Conflict(DUPLICATE_TITLE_YEAR));
        }
        Err(err) => return Err(ApiError::internal("Failed to create entry")(err)),
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Entry created successfully",
            json!({ "entry": EntryResponse::from(created) }),
        )),
    ))
}

/// GET /api/entries
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<HashMap<String, String>>,
) -> Reply {
    let query = validate::validate_pagination(&raw)
        .map_err(|errors| ApiError::validation("Invalid query parameters", errors))?;

    let total = state
        .store
        .count_all()
        .await
        .map_err(ApiError::internal("Failed to retrieve entries"))?;
    let rows = state
        .store
        .page(pagination::offset(query.page, query.limit), query.limit)
        .await
        .map_err(ApiError::internal("Failed to retrieve entries"))?;

    let entries: Vec<EntryResponse> = rows.into_iter().map(Into::into).collect();
    let meta = pagination::paginate(query.page, query.limit, total);

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(
            "Entries retrieved successfully",
            json!({ "entries": entries, "pagination": meta }),
        )),
    ))
}

/// GET /api/entries/search
pub async fn search_entries(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<HashMap<String, String>>,
) -> Reply {
    let query = validate::validate_search(&raw)
        .map_err(|errors| ApiError::validation("Invalid search parameters", errors))?;

    let total = state
        .store
        .count_matching(&query.q)
        .await
        .map_err(ApiError::internal("Failed to search entries"))?;
    let rows = state
        .store
        .search(&query.q, pagination::offset(query.page, query.limit), query.limit)
        .await
        .map_err(ApiError::internal("Failed to search entries"))?;

    let entries: Vec<EntryResponse> = rows.into_iter().map(Into::into).collect();
    let meta = pagination::paginate(query.page, query.limit, total);

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(
            "Search completed successfully",
            json!({ "entries": entries, "pagination": meta, "searchQuery": query.q }),
        )),
    ))
}

/// GET /api/entries/stats
pub async fn stats(State(state): State<Arc<AppState>>) -> Reply {
    let snapshot = state
        .store
        .stats(timestamps::current_year())
        .await
        .map_err(ApiError::internal("Failed to retrieve statistics"))?;

    let stats = Stats {
        total_entries: snapshot.total,
        movies_count: snapshot.movies,
        tv_shows_count: snapshot.tv_shows,
        recent_entries: snapshot.recent,
        avg_budget: snapshot.avg_budget,
        generated_at: timestamps::now_ist(),
    };

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Statistics retrieved successfully", json!({ "stats": stats }))),
    ))
}

/// GET /api/entries/{id}
pub async fn get_entry(State(state): State<Arc<AppState>>, Path(raw_id): Path<String>) -> Reply {
    let id = validate::validate_id(&raw_id)
        .map_err(|errors| ApiError::validation("Invalid ID parameter", errors))?;

    let entry = state
        .store
        .find_by_id(id)
        .await
        .map_err(ApiError::internal("Failed to retrieve entry"))?
        .ok_or(ApiError::NotFound)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(
            "Entry retrieved successfully",
            json!({ "entry": EntryResponse::from(entry) }),
        )),
    ))
}

/// PUT /api/entries/{id}
pub async fn update_entry(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Reply {
    let id = validate::validate_id(&raw_id)
        .map_err(|errors| ApiError::validation("Invalid ID parameter", errors))?;

    let value = parse_json(&body)?;
    // A missing body behaves like an empty object and fails the
    // at-least-one-field rule rather than the empty-body pre-check.
    let value = if value.is_null() { json!({}) } else { value };
    let patch = validate::validate_update(&value).map_err(|errors| {
        ApiError::validation("Validation failed. Please provide valid field values.", errors)
    })?;

    let current = state
        .store
        .find_by_id(id)
        .await
        .map_err(ApiError::internal("Failed to update entry"))?
        .ok_or(ApiError::NotFound)?;

    // Rename uniqueness is title-only, excluding the entry itself. Year is
    // deliberately not part of this probe; create-time uniqueness is the
    // stricter (title, year) pair.
    if let Some(title) = &patch.title {
        let taken = state
            .store
            .title_taken_by_other(title, id)
            .await
            .map_err(ApiError::internal("Failed to update entry"))?;
        if taken {
            return Err(ApiError::Conflict(DUPLICATE_TITLE));
        }
    }

    let updated = match state.store.update(current, patch).await {
        Ok(model) => model,
        Err(err) if is_unique_violation(&err) => {
            return Err(ApiError::Conflict(DUPLICATE_TITLE));
        }
        Err(err) => return Err(ApiError::internal("Failed to update entry")(err)),
    };

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(
            "Entry updated successfully",
            json!({ "entry": EntryResponse::from(updated) }),
        )),
    ))
}

/// DELETE /api/entries/{id}
pub async fn delete_entry(State(state): State<Arc<AppState>>, Path(raw_id): Path<String>) -> Reply {
    let id = validate::validate_id(&raw_id)
        .map_err(|errors| ApiError::validation("Invalid ID parameter", errors))?;

    let entry = state
        .store
        .find_by_id(id)
        .await
        .map_err(ApiError::internal("Failed to delete entry"))?
        .ok_or(ApiError::NotFound)?;

    state.store.delete(entry).await.map_err(ApiError::internal("Failed to delete entry"))?;

    Ok((StatusCode::OK, Json(ApiResponse::ok_empty("Entry deleted successfully"))))
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Server is running",
        "timestamp": timestamps::now_ist(),
        "environment": state.config.environment,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /
pub async fn index() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Favorite Movies & TV Shows API",
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/health",
        "endpoints": {
            "POST /api/entries": "Create a new entry",
            "GET /api/entries": "Get all entries with pagination",
            "GET /api/entries/search": "Search entries by title",
            "GET /api/entries/stats": "Get statistics",
            "GET /api/entries/{id}": "Get entry by ID",
            "PUT /api/entries/{id}": "Update entry by ID",
            "DELETE /api/entries/{id}": "Delete entry by ID",
        },
    }))
}

/// Anything that misses the route table.
pub async fn not_found() -> (StatusCode, Json<ApiResponse>) {
    (StatusCode::NOT_FOUND, Json(ApiResponse::fail("Route not found")))
}
