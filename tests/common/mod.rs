//! Mock endpoints shared by the integration tests.
#![allow(dead_code)]

use mccard::protocol::codec::{frame, read_frame, status_response_packet};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// What the mock Minecraft server does after reading the status request.
#[derive(Clone)]
pub enum Behavior {
    /// Answers with a well-formed status response carrying this JSON.
    Reply(String),
    /// Answers with a frame whose packet id is not a status response.
    WrongPacket,
    /// Reads the request and never answers.
    Silent,
    /// Closes the connection without answering.
    Hangup,
}

/// Spawns a mock Minecraft server on an ephemeral port.
///
/// Returns the `127.0.0.1:port` address to query and the server task.
pub async fn spawn_mc_server(behavior: Behavior) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let handle = tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let behavior = behavior.clone();
            tokio::spawn(async move {
                // Handshake, then status request.
                if read_frame(&mut stream).await.is_err() {
                    return;
                }
                if read_frame(&mut stream).await.is_err() {
                    return;
                }
                match behavior {
                    Behavior::Reply(json) => {
                        let _ = stream.write_all(&status_response_packet(&json)).await;
                    }
                    Behavior::WrongPacket => {
                        let _ = stream.write_all(&frame(5, b"nope")).await;
                    }
                    Behavior::Silent => {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                    }
                    Behavior::Hangup => {}
                }
            });
        }
    });

    (addr, handle)
}

/// Status JSON as a vanilla server would send it.
pub fn status_json(players: &[&str], online: u32, favicon: Option<&str>) -> String {
    let sample: Vec<serde_json::Value> = players
        .iter()
        .map(|name| serde_json::json!({ "name": name, "id": "00000000-0000-0000-0000-000000000000" }))
        .collect();
    let mut reply = serde_json::json!({
        "version": { "name": "Paper 1.20.4", "protocol": 765 },
        "players": { "max": 20, "online": online, "sample": sample },
        "description": { "text": "A Minecraft Server" }
    });
    if let Some(favicon) = favicon {
        reply["favicon"] = serde_json::Value::String(favicon.to_string());
    }
    reply.to_string()
}

/// Spawns a one-route HTTP server answering every request with `status` and
/// `body`. Returns the URL to fetch.
pub async fn spawn_roster_server(status: u16, body: &str) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/players", listener.local_addr().unwrap());
    let body = body.to_string();

    let handle = tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let body = body.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buffer = [0u8; 1024];
                loop {
                    match stream.read(&mut buffer).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => {
                            request.extend_from_slice(&buffer[..n]);
                            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                    }
                }
                let response = format!(
                    "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    (url, handle)
}

/// An address nothing listens on.
pub async fn closed_port_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);
    addr
}

pub fn bundled_resource_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resource")
}
