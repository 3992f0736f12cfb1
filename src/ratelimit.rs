//! Per-client-IP request throttling, one bucket per rate class. Purely
//! rejecting: an over-limit request gets a 429 envelope, nothing queues.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    num::NonZeroU32,
    sync::Arc,
    time::Duration,
};

use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{Quota, RateLimiter, clock::DefaultClock, state::keyed::DefaultKeyedStateStore};
use serde_json::json;

use crate::AppState;

type KeyedLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

struct ClassLimiter {
    limiter: KeyedLimiter,
    message: &'static str,
    retry_after: &'static str,
}

impl ClassLimiter {
    fn new(max: u32, window: Duration, message: &'static str, retry_after: &'static str) -> Self {
        let burst = NonZeroU32::new(max.max(1)).unwrap_or(NonZeroU32::MIN);
        let quota = match Quota::with_period(window / burst.get()) {
            Some(q) => q.allow_burst(burst),
            None => Quota::per_second(burst),
        };
        Self { limiter: RateLimiter::keyed(quota), message, retry_after }
    }

    fn check(&self, ip: IpAddr) -> Result<(), Response> {
        if self.limiter.check_key(&ip).is_ok() {
            return Ok(());
        }
        let body = json!({
            "success": false,
            "message": self.message,
            "retryAfter": self.retry_after,
        });
        Err((StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response())
    }
}

/// The three throttle buckets from the route table: general covers every API
/// route, write and search stack on top for their route classes.
pub struct RateGate {
    general: ClassLimiter,
    write: ClassLimiter,
    search: ClassLimiter,
}

impl RateGate {
    pub fn new() -> Self {
        Self {
            general: ClassLimiter::new(
                100,
                Duration::from_secs(15 * 60),
                "Too many requests from this IP, please try again later.",
                "15 minutes",
            ),
            write: ClassLimiter::new(
                20,
                Duration::from_secs(15 * 60),
                "Too many write requests from this IP, please try again later.",
                "15 minutes",
            ),
            search: ClassLimiter::new(
                30,
                Duration::from_secs(60),
                "Too many search requests from this IP, please try again later.",
                "1 minute",
            ),
        }
    }
}

impl Default for RateGate {
    fn default() -> Self {
        Self::new()
    }
}

fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

pub async fn enforce(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(&request);
    let gate = &state.rate;

    if let Err(rejected) = gate.general.check(ip) {
        return rejected;
    }

    let method = request.method();
    let class = if request.uri().path().ends_with("/entries/search") {
        Some(&gate.search)
    } else if method == Method::POST || method == Method::PUT || method == Method::DELETE {
        Some(&gate.write)
    } else {
        None
    };
    if let Some(class) = class {
        if let Err(rejected) = class.check(ip) {
            return rejected;
        }
    }

    next.run(request).await
}
