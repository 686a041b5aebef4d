use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(ToSchema, IntoParams, Debug, Deserialize)]
#[into_params(style = Form)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRequest {
    #[param(example = 1640995200)]
    pub start_ts: Option<i64>,
    #[param(example = 1640998800)]
    pub end_ts: Option<i64>,
    /// Maximum number of records to return
    #[param(example = 500)]
    pub limit: Option<i64>,
}
