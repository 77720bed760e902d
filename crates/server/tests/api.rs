use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use scorequest_server::app;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

async fn test_app() -> eyre::Result<Router> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    scorequest_store::init_schema(&pool).await?;
    Ok(app(pool))
}

fn wallet(tag: u8) -> String {
    format!("0x{tag:040x}")
}

fn post(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> eyre::Result<Value> {
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn submit_flow_created_unchanged_updated() -> eyre::Result<()> {
    let app = test_app().await?;
    let wallet = wallet(1);

    let response = app
        .clone()
        .oneshot(post(
            "/leaderboard/submit",
            json!({ "wallet_address": &wallet, "score": 100 }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await?;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["new_best"], json!(true));
    assert_eq!(body["score"], json!(100));

    let response = app
        .clone()
        .oneshot(post(
            "/leaderboard/submit",
            json!({ "wallet_address": &wallet, "score": 50 }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await?;
    assert_eq!(body["new_best"], json!(false));
    assert_eq!(body["current_best"], json!(100));
    assert_eq!(body["submitted_score"], json!(50));

    let response = app
        .oneshot(post(
            "/leaderboard/submit",
            json!({ "wallet_address": &wallet, "score": 150 }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await?;
    assert_eq!(body["new_best"], json!(true));
    assert_eq!(body["score"], json!(150));
    Ok(())
}

#[tokio::test]
async fn submit_rejects_malformed_input() -> eyre::Result<()> {
    let app = test_app().await?;

    let cases = [
        json!({ "wallet_address": "not0x0000000000000000000000000000000000000", "score": 5 }),
        json!({ "wallet_address": format!("0x{}", "a".repeat(39)), "score": 5 }),
        json!({ "wallet_address": wallet(1), "score": -1 }),
        json!({ "wallet_address": wallet(1), "score": 3.5 }),
        json!({ "wallet_address": wallet(1) }),
        json!({ "score": 5 }),
    ];
    for case in cases {
        let response = app
            .clone()
            .oneshot(post("/leaderboard/submit", case.clone()))
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{case}");
        let body = body_json(response).await?;
        assert_eq!(body["success"], json!(false), "{case}");
        assert!(body["error"].is_string(), "{case}");
    }
    Ok(())
}

#[tokio::test]
async fn submit_accepts_scores_above_32_bits() -> eyre::Result<()> {
    let app = test_app().await?;
    let big: i64 = 5_000_000_000;

    let response = app
        .clone()
        .oneshot(post(
            "/leaderboard/submit",
            json!({ "wallet_address": wallet(1), "score": big }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await?;
    assert_eq!(body["score"], json!(big));

    // Beyond the storage's integer range is still a 400.
    let response = app
        .oneshot(post(
            "/leaderboard/submit",
            json!({ "wallet_address": wallet(1), "score": u64::MAX }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn leaderboard_is_top_ten_by_score() -> eyre::Result<()> {
    let app = test_app().await?;

    for tag in 0..12u8 {
        let response = app
            .clone()
            .oneshot(post(
                "/leaderboard/submit",
                json!({ "wallet_address": wallet(tag), "score": u32::from(tag) * 10 }),
            ))
            .await?;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.oneshot(get("/leaderboard")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await?;
    let entries = body["leaderboard"].as_array().unwrap();
    assert_eq!(entries.len(), 10);
    assert_eq!(entries[0]["score"], json!(110));
    assert_eq!(entries[0]["address"], json!(wallet(11)));
    assert_eq!(entries[0]["nft_minted"], json!(false));
    let scores: Vec<_> = entries.iter().map(|e| e["score"].as_u64().unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    Ok(())
}

#[tokio::test]
async fn nft_minted_flow() -> eyre::Result<()> {
    let app = test_app().await?;
    let wallet = wallet(2);

    let response = app
        .clone()
        .oneshot(post(
            "/leaderboard/nft-minted",
            json!({ "wallet_address": &wallet }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await?;
    assert_eq!(body["error"], json!("Player not found in leaderboard"));

    app.clone()
        .oneshot(post(
            "/leaderboard/submit",
            json!({ "wallet_address": &wallet, "score": 10 }),
        ))
        .await?;

    // Marking twice is a no-op success.
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(post(
                "/leaderboard/nft-minted",
                json!({ "wallet_address": &wallet }),
            ))
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await?;
        assert_eq!(body["success"], json!(true));
    }

    let response = app
        .oneshot(get(&format!("/leaderboard/player/{wallet}")))
        .await?;
    let body = body_json(response).await?;
    assert_eq!(body["player"]["nft_minted"], json!(true));
    Ok(())
}

#[tokio::test]
async fn player_stats_carry_rank_and_timestamps() -> eyre::Result<()> {
    let app = test_app().await?;

    for (tag, score) in [(1u8, 300), (2, 200), (3, 100)] {
        app.clone()
            .oneshot(post(
                "/leaderboard/submit",
                json!({ "wallet_address": wallet(tag), "score": score }),
            ))
            .await?;
    }

    let response = app
        .clone()
        .oneshot(get(&format!("/leaderboard/player/{}", wallet(2))))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await?;
    let player = &body["player"];
    assert_eq!(player["address"], json!(wallet(2)));
    assert_eq!(player["score"], json!(200));
    assert_eq!(player["rank"], json!(2));
    assert!(player["created_at"].is_string());
    assert!(player["updated_at"].is_string());

    let response = app
        .oneshot(get(&format!("/leaderboard/player/{}", wallet(9))))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await?;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Player not found"));
    Ok(())
}
