use serde::Serialize;

/// Dashboard figures. `recent_payments` is the total payment count, kept
/// under its historical wire name.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_users: i64,
    pub total_subscribers: i64,
    pub total_messages: i64,
    pub total_revenue: f64,
    pub recent_payments: i64,
}
