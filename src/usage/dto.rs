use serde::Serialize;

use super::ledger::UsageSnapshot;

#[derive(Debug, Serialize)]
pub struct UsageResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub usage: UsageSnapshot,
}
