//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::response::Response;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use storefront::events::{EventBatch, EventPublisher, PublishError};
use storefront::store::{InventoryItem, InventoryStore, Migrate, NewInventoryItem, StoreError};

/// In-memory inventory with a scripted sequence of migration results.
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<Vec<InventoryItem>>,
    migrate_script: Mutex<VecDeque<Result<(), StoreError>>>,
    migrate_calls: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Results returned by successive `migrate` calls. Once drained, migration succeeds.
    pub fn with_migrate_script(script: Vec<Result<(), StoreError>>) -> Self {
        Self {
            migrate_script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    pub fn migrate_calls(&self) -> u32 {
        self.migrate_calls.load(Ordering::SeqCst)
    }

    pub fn items(&self) -> Vec<InventoryItem> {
        self.items.lock().unwrap().clone()
    }
}

#[async_trait]
impl Migrate for MemoryStore {
    async fn migrate(&self) -> Result<(), StoreError> {
        self.migrate_calls.fetch_add(1, Ordering::SeqCst);
        self.migrate_script.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn list_items(&self) -> Result<Vec<InventoryItem>, StoreError> {
        Ok(self.items())
    }

    async fn get_item(&self, id: i32) -> Result<Option<InventoryItem>, StoreError> {
        Ok(self.items.lock().unwrap().iter().find(|i| i.id == id).cloned())
    }

    async fn create_item(&self, item: NewInventoryItem) -> Result<InventoryItem, StoreError> {
        let mut items = self.items.lock().unwrap();
        let created = InventoryItem {
            id: items.len() as i32 + 1,
            name: item.name,
            quantity: item.quantity,
            price: item.price,
        };
        items.push(created.clone());
        Ok(created)
    }
}

/// Store whose every query fails with the given error.
pub struct FailingStore(pub fn() -> StoreError);

#[async_trait]
impl Migrate for FailingStore {
    async fn migrate(&self) -> Result<(), StoreError> {
        Err((self.0)())
    }
}

#[async_trait]
impl InventoryStore for FailingStore {
    async fn list_items(&self) -> Result<Vec<InventoryItem>, StoreError> {
        Err((self.0)())
    }

    async fn get_item(&self, _id: i32) -> Result<Option<InventoryItem>, StoreError> {
        Err((self.0)())
    }

    async fn create_item(&self, _item: NewInventoryItem) -> Result<InventoryItem, StoreError> {
        Err((self.0)())
    }
}

pub fn connection_refused() -> StoreError {
    StoreError::Connect("could not open a connection: connection refused".into())
}

pub fn starting_up() -> StoreError {
    StoreError::Database {
        code: Some("57P03".into()),
        message: "the database system is starting up".into(),
    }
}

pub fn syntax_error() -> StoreError {
    StoreError::Database {
        code: Some("42601".into()),
        message: "syntax error at or near \"TABLE\"".into(),
    }
}

/// Publisher that keeps every sent payload in memory.
pub struct RecordingPublisher {
    max_batch_bytes: usize,
    fail_send: bool,
    sent: Mutex<Vec<Vec<u8>>>,
}

impl RecordingPublisher {
    pub fn new(max_batch_bytes: usize) -> Self {
        Self {
            max_batch_bytes,
            fail_send: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_send: true,
            ..Self::new(1024 * 1024)
        }
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn create_batch(&self) -> Result<EventBatch, PublishError> {
        Ok(EventBatch::new(self.max_batch_bytes))
    }

    async fn send(&self, batch: EventBatch) -> Result<(), PublishError> {
        if self.fail_send {
            return Err(PublishError::Send("connection closed".into()));
        }
        self.sent.lock().unwrap().extend(batch.into_events());
        Ok(())
    }
}

/// Start a programmable mock upstream on an ephemeral port.
///
/// `f` receives the request path and returns status and JSON body.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }

                let request = String::from_utf8_lossy(&buf);
                let path = request
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("/")
                    .to_string();

                let (status, body) = f(path).await;
                let status_text = match status {
                    200 => "200 OK",
                    404 => "404 Not Found",
                    500 => "500 Internal Server Error",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
