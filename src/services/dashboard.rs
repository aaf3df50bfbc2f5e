//! Dashboard counters and the statistics page.

use rand::Rng;

use crate::api::calls;
use crate::api::errors::ApiError;
use crate::api::toast::ToastScope;
use crate::api::AdminBackend;
use crate::domain::stats::{ChartPoint, DashboardStats, MONTH_LABELS};
use crate::normalize::Raw;
use crate::services::ServiceResult;

/// Counters plus the (throttled) message of a failed fetch.
#[derive(Debug)]
pub struct StatsLoad {
    pub stats: DashboardStats,
    pub error: Option<String>,
}

/// Fetches the dashboard counters. Failures render zeros; only an expired
/// session is returned as an error.
pub async fn load_stats<B>(backend: &B, throttle: &ToastScope<'_>) -> ServiceResult<StatsLoad>
where
    B: AdminBackend + ?Sized,
{
    match backend.send(calls::dashboard_stats()).await {
        Ok(body) => {
            let raw = Raw::new(&body);
            let scope = raw.nested("data").unwrap_or(raw);
            Ok(StatsLoad {
                stats: DashboardStats::normalize(scope),
                error: None,
            })
        }
        Err(err @ ApiError::Unauthorized(_)) => Err(err.into()),
        Err(err) => {
            log::error!("Failed to load dashboard stats: {err}");
            Ok(StatsLoad {
                stats: DashboardStats::default(),
                error: throttle.should_show(&err).then(|| err.user_message()),
            })
        }
    }
}

/// Monthly chart series. The backend offers no history, so the values are
/// synthesized.
pub fn synthesize_chart<R: Rng + ?Sized>(rng: &mut R) -> Vec<ChartPoint> {
    MONTH_LABELS
        .iter()
        .map(|label| ChartPoint {
            label,
            users: rng.random_range(10..60),
            revenue: rng.random_range(1_000_000..11_000_000),
            products: rng.random_range(10..110),
        })
        .collect()
}
