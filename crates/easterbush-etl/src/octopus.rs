//! Octopus Agile tariff client.
//!
//! The `agileout.csv` export used by the price loader originates from
//! the Octopus Energy API; this client fetches the same half-hourly
//! standard unit rates directly so a data directory can be refreshed
//! without leaving the CLI. Responses are paginated; each page's
//! `valid_from` stamps become the series index.

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use easterbush_core::series::Series;

use crate::error::{EtlError, EtlResult};
use crate::resilience::RateLimiter;

const DEFAULT_BASE_URL: &str = "https://api.octopus.energy";

/// One half-hour unit rate from the API.
#[derive(Debug, Clone, Deserialize)]
struct UnitRate {
    valid_from: DateTime<Utc>,
    value_inc_vat: f64,
}

/// A page of unit rates.
#[derive(Debug, Deserialize)]
struct UnitRatesPage {
    results: Vec<UnitRate>,
    next: Option<String>,
}

/// Octopus Energy API client.
///
/// Wraps a [`reqwest::Client`] pre-configured with the project
/// user-agent and a [`RateLimiter`] (~4 req/sec, comfortably inside the
/// published API guidance), with exponential retry on transient
/// failures.
#[derive(Debug, Clone)]
pub struct OctopusClient {
    http: Client,
    rate_limiter: RateLimiter,
    base_url: String,
}

impl OctopusClient {
    /// Create a new client against the public API.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> EtlResult<Self> {
        let http = Client::builder()
            .user_agent("easterbush/0.1.0 (https://github.com/oxur/easter-bush-energy)")
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(EtlError::from)?;

        Ok(Self {
            http,
            rate_limiter: RateLimiter::per_second(4),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different base URL (used by tests and
    /// mirrored deployments).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch half-hourly unit rates for `[from, to)` as a price series
    /// in p/kWh, following pagination.
    ///
    /// # Errors
    /// Returns an error on HTTP failure, rate limiting that outlasts the
    /// retry budget, or an unparseable response.
    pub async fn fetch_unit_rates(
        &self,
        product: &str,
        tariff: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> EtlResult<Series> {
        let mut url = format!(
            "{}/v1/products/{}/electricity-tariffs/{}/standard-unit-rates/?period_from={}&period_to={}&page_size=1500",
            self.base_url,
            product,
            tariff,
            from.to_rfc3339(),
            to.to_rfc3339()
        );

        let mut index = Vec::new();
        let mut values = Vec::new();

        loop {
            let page = (|| async { self.fetch_page(&url).await })
                .retry(ExponentialBuilder::default().with_max_times(3))
                .when(|e: &EtlError| e.is_transient())
                .await?;

            log::debug!("Fetched {} unit rates from {url}", page.results.len());

            for rate in page.results {
                index.push(rate.valid_from);
                values.push(rate.value_inc_vat);
            }

            match page.next {
                Some(next) => url = next,
                None => break,
            }
        }

        Series::new(index, values).map_err(Into::into)
    }

    async fn fetch_page(&self, url: &str) -> EtlResult<UnitRatesPage> {
        self.rate_limiter.acquire().await;

        let response = self.http.get(url).send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(EtlError::RateLimited {
                source_name: "Octopus".to_string(),
            });
        }

        let response = response.error_for_status().map_err(|e| EtlError::Http {
            source_name: "Octopus".to_string(),
            message: e.to_string(),
        })?;

        let page: UnitRatesPage = response.json().await?;
        Ok(page)
    }
}
