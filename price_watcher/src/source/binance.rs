//! Exchange ticker-price source.
//!
//! One blocking GET per `fetch`, with a per-request timeout. Non-200 answers
//! become `RequestFailed`, transport failures become `Http`.

use crate::source::QuoteSource;
use log::debug;
use price_common::endpoint::price_url;
use price_common::{Result, Symbol, Tick, WatchError};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use std::time::Duration;

/// Ticker-price poller for one symbol on the futures REST API.
pub struct BinanceQuoteSource {
    client: Client,
    url: String,
}

impl BinanceQuoteSource {
    /// Build a client for `symbol` under `base_url`; every request gives up after `timeout`.
    pub fn new(base_url: &str, symbol: Symbol, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| WatchError::Http(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            url: price_url(base_url, symbol),
        })
    }

    /// Request URL, including the symbol query.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl QuoteSource for BinanceQuoteSource {
    fn fetch(&self) -> Result<Tick> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| WatchError::Http(format!("price request failed: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!("Price request headers: {:?}", response.headers());
            let body = response.text().unwrap_or_default();
            return Err(WatchError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .map_err(|e| WatchError::Http(format!("price body read failed: {e}")))?;
        Tick::from_json_slice(&body)
    }
}
