use crate::application_port::ReportsService;
use crate::client::{ApiError, AuthenticatedClient};
use crate::domain_model::ApiRequest;
use crate::domain_model::endpoint::*;
use serde_json::Value;

pub struct RealReportsService {
    client: AuthenticatedClient,
}

impl RealReportsService {
    pub fn new(client: AuthenticatedClient) -> RealReportsService {
        RealReportsService { client }
    }

    async fn limited(&self, path: &str, limit: u32) -> Result<Value, ApiError> {
        self.client
            .send_json(ApiRequest::get(path).query("limit", limit))
            .await
    }
}

#[async_trait::async_trait]
impl ReportsService for RealReportsService {
    async fn progress_all(&self) -> Result<Value, ApiError> {
        self.client.get_json(REPORTS_PROGRESS_ALL).await
    }

    async fn progress_of_user(&self, user_id: &str) -> Result<Value, ApiError> {
        let path = build_path(REPORTS_PROGRESS_USER, &[("id", user_id)]);
        self.client.get_json(&path).await
    }

    async fn teacher_students(&self) -> Result<Value, ApiError> {
        self.client.get_json(REPORTS_TEACHER_STUDENTS).await
    }

    async fn teacher_progress(&self) -> Result<Value, ApiError> {
        self.client.get_json(REPORTS_TEACHER_PROGRESS).await
    }

    async fn dashboard_stats(&self) -> Result<Value, ApiError> {
        self.client.get_json(ACTIVITIES_DASHBOARD_STATS).await
    }

    async fn recent_activities(&self, limit: u32) -> Result<Value, ApiError> {
        self.limited(ACTIVITIES_RECENT, limit).await
    }

    async fn leaderboard(&self, limit: u32) -> Result<Value, ApiError> {
        self.limited(PROGRESSION_LEADERBOARD, limit).await
    }
}
