#![cfg(feature = "sync-client")]

use std::sync::{Arc, Mutex};

use bingo_back::{
    claims::{ClaimStyle, ClaimantCode},
    client::{
        BoardView, ClaimSyncClient, ClientError, HttpClaimSource, PollOutcome, Reconciliation,
        TileSurface,
    },
    config::AppConfig,
    dao::board_store::MemoryBoardStore,
    routes,
    state::AppState,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

async fn spawn_server() -> String {
    let state = AppState::with_store(AppConfig::default(), Arc::new(MemoryBoardStore::new()));
    let app = routes::router(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn upload_board(base: &str, allow_multiple_claims: bool) -> Value {
    let columns: Vec<Vec<Value>> = (0..5)
        .map(|x| {
            (0..5)
                .map(|y| json!({"text": format!("challenge {x}/{y}"), "tooltip": "", "difficulty": 1.0}))
                .collect()
        })
        .collect();
    let response = reqwest::Client::new()
        .post(format!("{base}/boards"))
        .json(&json!({
            "metadata": {"title": "Weekend run", "authors": ["ana"], "game": "Celeste", "version": "1"},
            "difficulty": 1.0,
            "width": 5,
            "height": 5,
            "board": columns,
            "allow_multiple_claims": allow_multiple_claims,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    response.json().await.unwrap()
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<(u32, u32, Option<String>)>>>);

impl TileSurface for Recorder {
    fn repaint(&mut self, x: u32, y: u32, style: &ClaimStyle) {
        self.0.lock().unwrap().push((x, y, style.to_css()));
    }

    fn set_hidden(&mut self, _hidden: bool) {}
}

#[tokio::test]
async fn two_viewers_share_a_multi_claim_tile() {
    let base = spawn_server().await;
    let board = upload_board(&base, true).await;
    let board_id = board["id"].as_str().unwrap().parse().unwrap();

    let alice_surface = Recorder::default();
    let alice = ClaimSyncClient::new(
        HttpClaimSource::new(&base).unwrap(),
        BoardView::new(board_id, 5, 5),
        alice_surface.clone(),
        ClaimantCode::Two,
    );
    let bob = ClaimSyncClient::new(
        HttpClaimSource::new(&base).unwrap(),
        BoardView::new(board_id, 5, 5),
        Recorder::default(),
        ClaimantCode::Five,
    );

    alice.toggle(0, 0).await.unwrap();
    bob.toggle(0, 0).await.unwrap();
    alice.poll_once().await.unwrap();

    assert_eq!(alice.view().await.rendered(0, 0), Some("25"));
    let painted = alice_surface.0.lock().unwrap().clone();
    assert_eq!(painted.len(), 2);
    assert_eq!(painted[0], (0, 0, Some("#1e88e5".to_string())));
    assert_eq!(
        painted[1].2.as_deref(),
        Some("conic-gradient(from 0deg, #1e88e5 0% 50%, #8e24aa 50% 100%)")
    );

    alice.toggle(0, 0).await.unwrap();
    assert_eq!(alice.view().await.rendered(0, 0), Some("5"));
}

#[tokio::test]
async fn exclusive_tile_cannot_be_stolen_over_http() {
    let base = spawn_server().await;
    let board = upload_board(&base, false).await;
    assert_eq!(board["claim_mode"], "exclusive");
    let board_id = board["id"].as_str().unwrap().parse().unwrap();

    let owner = ClaimSyncClient::new(
        HttpClaimSource::new(&base).unwrap(),
        BoardView::new(board_id, 5, 5),
        Recorder::default(),
        ClaimantCode::Three,
    );
    let rival = ClaimSyncClient::new(
        HttpClaimSource::new(&base).unwrap(),
        BoardView::new(board_id, 5, 5),
        Recorder::default(),
        ClaimantCode::Five,
    );

    owner.toggle(2, 3).await.unwrap();
    let outcome = rival.toggle(2, 3).await.unwrap();

    assert!(matches!(outcome, PollOutcome::Applied(_)));
    assert_eq!(rival.view().await.rendered(2, 3), Some("3"));
}

#[tokio::test]
async fn invalid_toggles_are_rejected_with_error_bodies() {
    let base = spawn_server().await;
    let board = upload_board(&base, true).await;
    let id = board["id"].as_str().unwrap();
    let http = reqwest::Client::new();

    let bad_code = http
        .post(format!("{base}/boards/{id}/claims"))
        .json(&json!({"x": 0, "y": 0, "claim": "9"}))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_code.status(), 400);
    let body: Value = bad_code.json().await.unwrap();
    assert_eq!(body["status"], "error");

    let negative = http
        .post(format!("{base}/boards/{id}/claims"))
        .json(&json!({"x": -1, "y": 0, "claim": "1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(negative.status(), 400);

    let source = HttpClaimSource::new(&base).unwrap();
    let client = ClaimSyncClient::new(
        source,
        BoardView::new(id.parse().unwrap(), 5, 5),
        Recorder::default(),
        ClaimantCode::One,
    );
    let outside = client.toggle(7, 0).await.unwrap_err();
    assert!(matches!(outside, ClientError::Status { status: 404, .. }));

    let matrix: Value = http
        .get(format!("{base}/boards/{id}/claims"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(
        matrix["claims"]
            .as_array()
            .unwrap()
            .iter()
            .flat_map(|row| row.as_array().unwrap())
            .all(|claim| claim == "")
    );
}

#[tokio::test]
async fn acknowledgement_carries_no_claim_state() {
    let base = spawn_server().await;
    let board = upload_board(&base, false).await;
    let id = board["id"].as_str().unwrap();

    let ack: Value = reqwest::Client::new()
        .post(format!("{base}/boards/{id}/claims"))
        .json(&json!({"x": 1, "y": 1, "claim": "4"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ack, json!({"status": "success", "message": "claim updated"}));
}

#[tokio::test]
async fn undecodable_requests_share_the_error_body() {
    let base = spawn_server().await;
    let board = upload_board(&base, true).await;
    let id = board["id"].as_str().unwrap();
    let http = reqwest::Client::new();

    let requests = [
        http.post(format!("{base}/boards/{id}/claims"))
            .json(&json!({"x": 0, "y": 0})),
        http.post(format!("{base}/boards/{id}/claims"))
            .json(&json!({"x": "left", "y": 0, "claim": "1"})),
        http.post(format!("{base}/boards/{id}/claims"))
            .header("content-type", "application/json")
            .body("{not json"),
        http.get(format!("{base}/boards/not-a-board/claims")),
    ];

    for request in requests {
        let response = request.send().await.unwrap();
        assert_eq!(response.status(), 400);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().is_some_and(|message| !message.is_empty()));
    }
}

#[tokio::test]
async fn deleting_a_board_hides_its_viewers() {
    let base = spawn_server().await;
    let board = upload_board(&base, true).await;
    let id = board["id"].as_str().unwrap();

    let viewer = ClaimSyncClient::new(
        HttpClaimSource::new(&base).unwrap(),
        BoardView::new(id.parse().unwrap(), 5, 5),
        Recorder::default(),
        ClaimantCode::Four,
    );
    viewer.toggle(1, 2).await.unwrap();
    assert!(!viewer.view().await.is_hidden());

    let deleted = reqwest::Client::new()
        .delete(format!("{base}/boards/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), 204);

    let outcome = viewer.poll_once().await.unwrap();
    assert!(matches!(
        outcome,
        PollOutcome::Applied(Reconciliation::Hidden { .. })
    ));
    assert!(viewer.view().await.is_hidden());
}
