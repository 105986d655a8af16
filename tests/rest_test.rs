//! HTTP surface tests — real server on a random port, driven with reqwest,
//! board calls captured by the recording client.

mod common;

use common::{Call, RecordingBoard};
use formd::config::ServerConfig;
use formd::{rest, AppContext};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Find a free local port by binding to port 0.
fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn test_config(dir: &TempDir, port: u16) -> ServerConfig {
    ServerConfig {
        port,
        data_dir: dir.path().to_path_buf(),
        log: "error".to_string(),
        bind_address: "127.0.0.1".to_string(),
        public_base_url: format!("http://127.0.0.1:{port}"),
        monday_api_url: "http://127.0.0.1:0".to_string(),
        monday_api_token: None,
        log_format: "pretty".to_string(),
    }
}

/// Start the server with a recording board client; returns the base URL and
/// the client for call assertions.
async fn start_server(dir: &TempDir, board: RecordingBoard) -> (String, Arc<RecordingBoard>) {
    let port = find_free_port();
    let board = Arc::new(board);
    let ctx = Arc::new(AppContext::new(test_config(dir, port), board.clone()));

    tokio::spawn(async move {
        let _ = rest::run(ctx).await;
    });
    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    (format!("http://127.0.0.1:{port}"), board)
}

/// Wait until the recording board has seen at least `count` calls.
async fn wait_for_calls(board: &RecordingBoard, count: usize) -> Vec<Call> {
    for _ in 0..50 {
        let calls = board.calls();
        if calls.len() >= count {
            return calls;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    board.calls()
}

#[tokio::test]
async fn health_reports_ok() {
    let dir = TempDir::new().unwrap();
    let (base, _board) = start_server(&dir, RecordingBoard::default()).await;

    let body: Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn config_api_404s_until_admin_creates_default() {
    let dir = TempDir::new().unwrap();
    let (base, _board) = start_server(&dir, RecordingBoard::default()).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/api/config")).send().await.unwrap();
    assert_eq!(resp.status(), 404);

    // The admin page synthesizes the default document as a side effect.
    let resp = client.get(format!("{base}/admin")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let config: Value = client
        .get(format!("{base}/api/config"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    for form_type in ["guias", "clientes", "fornecedores"] {
        assert!(config.get(form_type).is_some(), "missing {form_type}");
    }
}

#[tokio::test]
async fn config_post_then_get_round_trips() {
    let dir = TempDir::new().unwrap();
    let (base, _board) = start_server(&dir, RecordingBoard::default()).await;
    let client = reqwest::Client::new();

    let config = json!({
        "guias": {
            "board_a": "111",
            "board_b": "222",
            "link_column": "link_1",
            "questions": [
                {"id": "q1", "type": "yesno", "text": "Correu bem?", "required": true,
                 "destination_column": "status_1"}
            ]
        }
    });

    let resp = client
        .post(format!("{base}/api/config"))
        .json(&config)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let loaded: Value = client
        .get(format!("{base}/api/config"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(loaded["guias"]["board_b"], "222");
    assert_eq!(loaded["guias"]["questions"][0]["type"], "yesno");
}

#[tokio::test]
async fn webhook_challenge_is_echoed() {
    let dir = TempDir::new().unwrap();
    let (base, board) = start_server(&dir, RecordingBoard::default()).await;

    let body: Value = reqwest::Client::new()
        .post(format!("{base}/webhook/guias"))
        .json(&json!({"challenge": "abc123"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["challenge"], "abc123");
    assert!(board.calls().is_empty());
}

#[tokio::test]
async fn unknown_form_404s_everywhere() {
    let dir = TempDir::new().unwrap();
    let (base, _board) = start_server(&dir, RecordingBoard::default()).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/form/nope")).send().await.unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .post(format!("{base}/submit_form/nope"))
        .form(&[("q1", "yes")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .delete(format!("{base}/api/forms/nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .post(format!("{base}/webhook/inexistente"))
        .json(&json!({"event": {"pulseId": 1}}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn webhook_to_submission_flow_reaches_the_board() {
    let dir = TempDir::new().unwrap();
    let stub = RecordingBoard {
        column_texts: [("hotel_col".to_string(), "Hotel Mar".to_string())]
            .into_iter()
            .collect(),
        ..Default::default()
    };
    let (base, board) = start_server(&dir, stub).await;
    let client = reqwest::Client::new();

    let config = json!({
        "guias": {
            "board_a": "111",
            "board_b": "123",
            "link_column": "link_1",
            "questions": [
                {"id": "q1", "type": "yesno", "text": "Correu tudo bem?",
                 "required": true, "destination_column": "colA"},
                {"id": "m1", "type": "monday_column", "source_column": "hotel_col",
                 "question_destination_column": "colM"}
            ]
        }
    });
    client
        .post(format!("{base}/api/config"))
        .json(&config)
        .send()
        .await
        .unwrap();

    // Webhook creates the form and hands back its URL.
    let created: Value = client
        .post(format!("{base}/webhook/guias"))
        .json(&json!({"event": {"pulseId": 999, "pulseName": "Trip A"}}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let form_id = created["form_id"].as_str().unwrap().to_string();
    let form_url = created["form_url"].as_str().unwrap().to_string();
    assert!(form_url.ends_with(&format!("/form/{form_id}")));

    // The form link is written back to the source item in the background.
    let calls = wait_for_calls(&board, 1).await;
    assert_eq!(
        calls[0],
        Call::UpdateColumn {
            board_id: "111".into(),
            item_id: "999".into(),
            column_id: "link_1".into(),
            value: form_url.clone(),
        }
    );

    // Form listing sees the new instance.
    let forms: Value = client
        .get(format!("{base}/api/forms"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(forms[0]["id"], form_id.as_str());

    // The submission page renders the configured question, and the
    // monday_column value resolved at intake shows up as a rating label.
    let page = client
        .get(&form_url)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Correu tudo bem?"));
    assert!(page.contains("Trip A"));
    assert!(page.contains("Hotel Mar"));

    // Submitting answers returns the success page immediately...
    let resp = client
        .post(format!("{base}/submit_form/{form_id}"))
        .form(&[("q1", "yes")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("sucesso"));

    // ...and the board sync lands in the background: one created item, the
    // mapped answer in the display language, and the monday_column
    // pass-through.
    let calls = wait_for_calls(&board, 4).await;
    assert_eq!(
        calls[1],
        Call::CreateItem {
            board_id: "123".into(),
            name: "Trip A".into(),
        }
    );
    assert_eq!(
        calls[2],
        Call::UpdateColumn {
            board_id: "123".into(),
            item_id: "item-1".into(),
            column_id: "colA".into(),
            value: "Sim".into(),
        }
    );
    assert_eq!(
        calls[3],
        Call::UpdateColumn {
            board_id: "123".into(),
            item_id: "item-1".into(),
            column_id: "colM".into(),
            value: "Hotel Mar".into(),
        }
    );

    // Deleting the form is idempotent at the API level: 200 then 404.
    let resp = client
        .delete(format!("{base}/api/forms/{form_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let resp = client
        .delete(format!("{base}/api/forms/{form_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
