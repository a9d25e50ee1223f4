//! Fixed-window request quota per client

use super::error::Problem;
use crate::config::RateLimitConfig;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

const LIMIT_HEADER: HeaderName = HeaderName::from_static("x-rate-limit-limit");
const REMAINING_HEADER: HeaderName = HeaderName::from_static("x-rate-limit-remaining");
const RESET_HEADER: HeaderName = HeaderName::from_static("x-rate-limit-reset");
const FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Windows kept before expired ones are swept
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Outcome of admitting one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32, reset_after: Duration },
    Limited { retry_after: Duration },
}

/// In-process limiter keyed by client identity
pub struct RateLimiter {
    limit: u32,
    period: Duration,
    windows: DashMap<String, Window>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            limit: config.limit,
            period: Duration::from_secs(config.period_secs.max(1)),
            windows: DashMap::new(),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn check(&self, client: &str) -> RateDecision {
        self.check_at(client, Instant::now())
    }

    pub fn check_at(&self, client: &str, now: Instant) -> RateDecision {
        if self.windows.len() > SWEEP_THRESHOLD {
            self.windows
                .retain(|_, window| now.duration_since(window.started) < self.period);
        }

        let mut window = self.windows.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= self.period {
            *window = Window {
                started: now,
                count: 0,
            };
        }

        let reset_after = self
            .period
            .saturating_sub(now.duration_since(window.started));

        if window.count >= self.limit {
            return RateDecision::Limited {
                retry_after: reset_after,
            };
        }

        window.count += 1;
        RateDecision::Allowed {
            remaining: self.limit - window.count,
            reset_after,
        }
    }
}

/// First `X-Forwarded-For` hop, else the peer address
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "anonymous".to_string())
}

fn header_number(value: impl ToString) -> HeaderValue {
    HeaderValue::from_str(&value.to_string()).unwrap_or(HeaderValue::from_static("0"))
}

fn reset_timestamp(reset_after: Duration) -> HeaderValue {
    let reset = Utc::now()
        + chrono::Duration::from_std(reset_after).unwrap_or_else(|_| chrono::Duration::zero());
    HeaderValue::from_str(&reset.to_rfc3339()).unwrap_or(HeaderValue::from_static(""))
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request,
    next: Next,
) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_key(req.headers(), peer);

    match limiter.check(&client) {
        RateDecision::Allowed {
            remaining,
            reset_after,
        } => {
            let mut response = next.run(req).await;
            let headers = response.headers_mut();
            headers.insert(LIMIT_HEADER, header_number(limiter.limit()));
            headers.insert(REMAINING_HEADER, header_number(remaining));
            headers.insert(RESET_HEADER, reset_timestamp(reset_after));
            response
        }
        RateDecision::Limited { retry_after } => {
            let seconds = retry_after.as_secs().max(1);
            tracing::warn!(client = %client, retry_after = seconds, "rate limit exceeded");

            let mut response = Problem::new(StatusCode::TOO_MANY_REQUESTS, "Too Many Requests")
                .with_detail(format!(
                    "API calls quota exceeded! maximum admitted {} per {}s.",
                    limiter.limit(),
                    limiter.period.as_secs()
                ))
                .into_response();
            let headers = response.headers_mut();
            headers.insert(header::RETRY_AFTER, header_number(seconds));
            headers.insert(LIMIT_HEADER, header_number(limiter.limit()));
            headers.insert(REMAINING_HEADER, HeaderValue::from_static("0"));
            headers.insert(RESET_HEADER, reset_timestamp(retry_after));
            response
        }
    }
}
