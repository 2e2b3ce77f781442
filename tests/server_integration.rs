use anyhow::Result;
use formdesk_api::{AppConfig, AppError, LoggingConfig, ServerConfig};
use std::net::TcpListener;
use std::time::Duration;
use tokio::time::timeout;

fn test_config(port: u16) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            port,
            bind: "127.0.0.1".to_string(),
            shutdown_timeout: 5,
        },
        logging: LoggingConfig {
            level: "warn".to_string(),
            format: "json".to_string(),
            ansi: false,
        },
        ..AppConfig::default()
    }
}

fn free_port() -> Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

/// Poll until the server answers, instead of guessing a startup delay
async fn wait_until_up(client: &reqwest::Client, port: u16) -> Result<()> {
    for _ in 0..50 {
        if client
            .get(format!("http://127.0.0.1:{}/health", port))
            .send()
            .await
            .is_ok()
        {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    anyhow::bail!("server on port {} never came up", port)
}

/// Test that server starts and binds to configured port
#[tokio::test]
async fn test_server_starts_and_binds() -> Result<()> {
    let port = free_port()?;
    let server_handle = tokio::spawn(formdesk_api::run_server_with(test_config(port)));

    let client = reqwest::Client::new();
    wait_until_up(&client, port).await?;

    let response = timeout(
        Duration::from_secs(5),
        client.get(format!("http://127.0.0.1:{}/health", port)).send(),
    )
    .await??;

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await?, "OK");

    server_handle.abort();
    Ok(())
}

/// Test server returns clear error when port is already in use
#[tokio::test]
async fn test_port_conflict_error() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();

    let result = timeout(
        Duration::from_secs(2),
        formdesk_api::run_server_with(test_config(port)),
    )
    .await;

    let err = result.expect("bind failure should return promptly").unwrap_err();
    assert!(err.to_string().contains("Failed to bind"));
    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::Server(_))
    ));

    drop(listener);
    Ok(())
}

/// Test readiness reports JSON once the listener is bound
#[tokio::test]
async fn test_readiness_endpoint() -> Result<()> {
    let port = free_port()?;
    let server_handle = tokio::spawn(formdesk_api::run_server_with(test_config(port)));

    let client = reqwest::Client::new();
    wait_until_up(&client, port).await?;

    let response = timeout(
        Duration::from_secs(5),
        client.get(format!("http://127.0.0.1:{}/health/ready", port)).send(),
    )
    .await??;
    assert_eq!(response.status(), 200);

    let report: serde_json::Value = response.json().await?;
    assert_eq!(report["status"], "ready");
    assert!(report["uptime_seconds"].is_u64());

    server_handle.abort();
    Ok(())
}

/// Test that responses carry a request id header
#[tokio::test]
async fn test_request_ids_in_responses() -> Result<()> {
    let port = free_port()?;
    let server_handle = tokio::spawn(formdesk_api::run_server_with(test_config(port)));

    let client = reqwest::Client::new();
    wait_until_up(&client, port).await?;

    let response = timeout(
        Duration::from_secs(5),
        client
            .get(format!("http://127.0.0.1:{}/health", port))
            .header("user-agent", "javascript:alert(1)")
            .send(),
    )
    .await??;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("request id header")
        .to_str()?;
    assert_eq!(request_id.len(), 36);
    assert!(request_id.contains('-'));

    server_handle.abort();
    Ok(())
}
