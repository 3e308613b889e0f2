//! In-memory page source for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pagetrie_core::Error;

use crate::fetch::PageSource;

enum Reply {
    Body(String),
    Status(u16, String),
    Panic,
}

/// Serves canned bodies and counts requests per URL.
#[derive(Default)]
pub struct StubSource {
    replies: HashMap<String, Reply>,
    calls: Mutex<HashMap<String, usize>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.replies.insert(url.to_string(), Reply::Body(body.to_string()));
        self
    }

    pub fn status(mut self, url: &str, status: u16, message: &str) -> Self {
        self.replies
            .insert(url.to_string(), Reply::Status(status, message.to_string()));
        self
    }

    /// Make requests for `url` panic inside the fetch.
    pub fn panics(mut self, url: &str) -> Self {
        self.replies.insert(url.to_string(), Reply::Panic);
        self
    }

    /// Make every request take a little while.
    pub fn delayed(mut self) -> Self {
        self.delay = Some(Duration::from_millis(30));
        self
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageSource for StubSource {
    async fn fetch_body(&self, url: &str) -> Result<String, Error> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.replies.get(url) {
            Some(Reply::Body(body)) => Ok(body.clone()),
            Some(Reply::Status(status, message)) => Err(Error::fetch_status(*status, message)),
            Some(Reply::Panic) => panic!("stub source asked to panic for {url}"),
            None => Err(Error::HttpError(format!("network error: no route to {url}"))),
        }
    }
}
