#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use trending_engine::{FailureKind, FetchError, FetchResult, Fetcher, Login};

pub const BASE: &str = "https://reports.test/ASPECT";

/// Serves canned pages; anything unknown answers 404.
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, (u16, String)>,
    broken: Vec<String>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<(String, Option<String>)>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), (200, body.to_string()));
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(url.to_string(), (status, String::new()));
        self
    }

    /// Requests to `url` fail at the transport level.
    pub fn broken(mut self, url: &str) -> Self {
        self.broken.push(url.to_string());
        self
    }

    pub fn delayed(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    /// Requested URLs in order, with the login sent along.
    pub fn requests(&self) -> Vec<(String, Option<String>)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|(url, _)| url).collect()
    }
}

#[async_trait::async_trait]
impl Fetcher for FakeFetcher {
    async fn get(&self, url: &str, login: Option<&Login>) -> Result<FetchResult, FetchError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), login.map(|l| l.login.clone())));
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        if self.broken.iter().any(|b| b == url) {
            return Err(FetchError::new(url, FailureKind::Network, "connection refused"));
        }
        let (status, body) = self
            .pages
            .get(url)
            .cloned()
            .unwrap_or((404, "not found".to_string()));
        Ok(FetchResult::new(url, status, body))
    }
}

/// A quarterly report page: a summary table, then the period table.
pub fn report_page(tstart: &str, tstop: &str) -> String {
    format!(
        r#"<html><body>
<h2>Report</h2>
<table><tr><td>summary</td></tr></table>
<table>
  <tr><th>TSTART</th><th>TSTOP</th></tr>
  <tr><td>{tstart}</td><td>{tstop}</td></tr>
</table>
</body></html>"#
    )
}

pub fn quarter(page: &str, year: i32, q: u8) -> String {
    format!("{BASE}/{page}/{year}/Q{q}/")
}
