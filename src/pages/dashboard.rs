//! Dashboard page: summary statistics and chart series.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use crate::net::ApiClient;
use crate::net::types::{DashboardStats, PolicyStatusSlice, RevenuePoint};

use super::{LoadState, format_kes, format_thousands};

pub const LOAD_FAILED: &str = "Failed to load dashboard data. Please check your connection and try again.";
pub const DEVELOPMENT_BANNER: &str =
    "The application is running with mock data since the API server is not available.";

/// One summary tile.
#[derive(Clone, Debug, PartialEq)]
pub struct StatCard {
    pub name: &'static str,
    pub value: String,
    /// Percentage change, when the server reports one.
    pub change: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub cards: Vec<StatCard>,
    /// Show the development banner; mock data may be on screen.
    pub development_mode: bool,
}

#[must_use]
pub fn stat_cards(stats: &DashboardStats) -> Vec<StatCard> {
    vec![
        StatCard { name: "Total Users", value: format_thousands(stats.total_users), change: Some(stats.user_growth) },
        StatCard { name: "Active Policies", value: format_thousands(stats.active_policies), change: None },
        StatCard { name: "Total Products", value: stats.total_products.to_string(), change: None },
        StatCard { name: "Monthly Revenue", value: format_kes(stats.monthly_revenue), change: None },
    ]
}

/// Fetch the stats and build the view.
pub async fn load(client: &ApiClient) -> LoadState<DashboardView> {
    let development_mode = client.fallback_mode().is_enabled();
    let result = client.dashboard().stats().await.map(|stats| DashboardView {
        cards: stat_cards(&stats),
        stats,
        development_mode,
    });
    LoadState::from_result(result, LOAD_FAILED)
}

/// Chart series for the revenue and status panels, fetched together.
///
/// # Errors
///
/// Returns the first failing fetch.
pub async fn load_charts(
    client: &ApiClient,
) -> Result<(Vec<RevenuePoint>, Vec<PolicyStatusSlice>), crate::net::ApiError> {
    let dashboard = client.dashboard();
    let (revenue, status) = tokio::join!(dashboard.revenue(), dashboard.policy_status());
    Ok((revenue?, status?))
}
