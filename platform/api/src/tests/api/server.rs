use std::time::Duration;

use serde_json::{json, Value};

use crate::api;
use crate::config::{ApiConfig, AppConfig};
use crate::tests::global::{mock_global_state, MockGlobal};

#[tokio::test]
async fn test_server_serves_and_shuts_down() {
	let port = std::net::TcpListener::bind("127.0.0.1:0")
		.and_then(|l| l.local_addr())
		.expect("failed to pick port")
		.port();

	let MockGlobal { global, handler, .. } = mock_global_state(AppConfig {
		api: ApiConfig {
			bind_address: format!("127.0.0.1:{port}").parse().unwrap(),
			..Default::default()
		},
		..Default::default()
	});

	let handle = tokio::spawn(api::run(global.clone()));

	let client = reqwest::Client::new();

	let mut body = None;
	for _ in 0..50 {
		if let Ok(resp) = client.get(format!("http://127.0.0.1:{port}/v1/health")).send().await {
			assert_eq!(resp.status(), reqwest::StatusCode::OK);
			body = Some(resp.json::<Value>().await.expect("failed to read body"));
			break;
		}

		// The listener may not be bound yet.
		tokio::time::sleep(Duration::from_millis(20)).await;
	}

	assert_eq!(body, Some(json!({ "status": "ok" })));

	// The client uses Keep-Alive, so we need to drop it to release the global context
	drop(global);
	drop(client);

	tokio::time::timeout(Duration::from_secs(1), handler.cancel())
		.await
		.expect("failed to cancel context");

	tokio::time::timeout(Duration::from_secs(1), handle)
		.await
		.expect("failed to stop api")
		.expect("api panicked")
		.expect("api failed");
}
