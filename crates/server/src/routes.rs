use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use scorequest_store::{self as store, StoreError, Submission};
use serde::Deserialize;
use serde_json::{json, Number};
use sqlx::SqlitePool;

/// Number of entries exposed by `GET /leaderboard`.
pub const TOP_N: u32 = 10;

/// Build the router. The pool is the only state; every handler passes it
/// down to the store explicitly.
pub fn app(pool: SqlitePool) -> Router {
    Router::new()
        .route("/leaderboard", get(get_leaderboard))
        .route("/leaderboard/submit", post(submit_score))
        .route("/leaderboard/nft-minted", post(mark_nft_minted))
        .route("/leaderboard/player/{wallet_address}", get(get_player_stats))
        .with_state(pool)
}

/// Status code and message rendered as the uniform failure payload.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::Validation(_) => StatusCode::BAD_REQUEST,
            StoreError::NotFound => StatusCode::NOT_FOUND,
            StoreError::Database(err) => {
                tracing::error!(%err, "storage error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "success": false, "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl ToString) -> ApiError {
    ApiError {
        status: StatusCode::BAD_REQUEST,
        message: message.to_string(),
    }
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    bad_request(rejection.body_text())
}

#[derive(Deserialize)]
struct SubmitRequest {
    wallet_address: String,
    // Taken as a raw JSON number so that negative and fractional scores can
    // be rejected with a 400 instead of a serde type error.
    score: Number,
}

async fn submit_score(
    State(pool): State<SqlitePool>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload.map_err(bad_body)?;
    // Fractional scores never reach the store; negative ones are rejected
    // there alongside wallet validation.
    let score = req
        .score
        .as_i64()
        .ok_or_else(|| bad_request("Score must be a non-negative integer"))?;

    let submission = store::submit(&pool, &req.wallet_address, score).await?;
    tracing::info!(
        wallet = %req.wallet_address,
        score,
        new_best = submission.is_new_best(),
        "score submission"
    );

    let (status, body) = match submission {
        Submission::Created { score } => (
            StatusCode::CREATED,
            json!({
                "success": true,
                "message": "New player added to leaderboard",
                "new_best": true,
                "score": score,
            }),
        ),
        Submission::Updated { score } => (
            StatusCode::OK,
            json!({
                "success": true,
                "message": "Score updated successfully",
                "new_best": true,
                "score": score,
            }),
        ),
        Submission::Unchanged { best, submitted } => (
            StatusCode::OK,
            json!({
                "success": true,
                "message": "Score submitted but not a new best",
                "new_best": false,
                "current_best": best,
                "submitted_score": submitted,
            }),
        ),
    };
    Ok((status, Json(body)).into_response())
}

async fn get_leaderboard(State(pool): State<SqlitePool>) -> Result<Response, ApiError> {
    let entries = store::top(&pool, TOP_N).await?;
    let leaderboard = entries
        .iter()
        .map(|entry| {
            json!({
                "address": entry.wallet_address,
                "score": entry.score,
                "nft_minted": entry.nft_minted,
            })
        })
        .collect::<Vec<_>>();
    Ok(Json(json!({ "success": true, "leaderboard": leaderboard })).into_response())
}

#[derive(Deserialize)]
struct MintedRequest {
    wallet_address: String,
}

async fn mark_nft_minted(
    State(pool): State<SqlitePool>,
    payload: Result<Json<MintedRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload.map_err(bad_body)?;
    store::mark_minted(&pool, &req.wallet_address).await?;
    tracing::info!(wallet = %req.wallet_address, "nft minted");
    Ok(Json(json!({ "success": true, "message": "NFT minting status updated" })).into_response())
}

async fn get_player_stats(
    State(pool): State<SqlitePool>,
    Path(wallet_address): Path<String>,
) -> Result<Response, ApiError> {
    let stats = store::stats(&pool, &wallet_address)
        .await
        .map_err(|err| match err {
            StoreError::NotFound => ApiError {
                status: StatusCode::NOT_FOUND,
                message: "Player not found".to_string(),
            },
            other => other.into(),
        })?;
    let entry = &stats.entry;
    Ok(Json(json!({
        "success": true,
        "player": {
            "address": entry.wallet_address,
            "score": entry.score,
            "nft_minted": entry.nft_minted,
            "rank": stats.rank,
            "created_at": entry.created_at.to_rfc3339(),
            "updated_at": entry.updated_at.to_rfc3339(),
        }
    }))
    .into_response())
}
