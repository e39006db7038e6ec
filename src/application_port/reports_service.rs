use crate::client::ApiError;
use serde_json::Value;

/// Read-only progress and activity views for the admin and teacher dashboards.
#[async_trait::async_trait]
pub trait ReportsService: Send + Sync {
    async fn progress_all(&self) -> Result<Value, ApiError>;
    async fn progress_of_user(&self, user_id: &str) -> Result<Value, ApiError>;
    async fn teacher_students(&self) -> Result<Value, ApiError>;
    async fn teacher_progress(&self) -> Result<Value, ApiError>;

    async fn dashboard_stats(&self) -> Result<Value, ApiError>;
    async fn recent_activities(&self, limit: u32) -> Result<Value, ApiError>;
    async fn leaderboard(&self, limit: u32) -> Result<Value, ApiError>;
}
