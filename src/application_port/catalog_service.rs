use crate::client::ApiError;
use serde_json::Value;

/// Lesson content managed from the console. Records are passed through as the
/// backend shapes them.
#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_lessons(&self) -> Result<Value, ApiError>;
    async fn get_lesson(&self, id: &str) -> Result<Value, ApiError>;
    async fn create_lesson(&self, lesson: &Value) -> Result<Value, ApiError>;
    async fn update_lesson(&self, id: &str, lesson: &Value) -> Result<Value, ApiError>;
    async fn delete_lesson(&self, id: &str) -> Result<(), ApiError>;
    async fn publish_lesson(&self, id: &str, published: bool) -> Result<Value, ApiError>;

    async fn topics_by_lesson(&self, lesson_id: &str) -> Result<Value, ApiError>;
    async fn create_topic(&self, topic: &Value) -> Result<Value, ApiError>;
    async fn delete_topic(&self, id: &str) -> Result<(), ApiError>;

    async fn quizzes_by_topic(&self, topic_id: &str) -> Result<Value, ApiError>;
    async fn create_quiz(&self, quiz: &Value) -> Result<Value, ApiError>;
    async fn update_quiz(&self, id: &str, quiz: &Value) -> Result<Value, ApiError>;
    async fn delete_quiz(&self, id: &str) -> Result<(), ApiError>;

    async fn vocab_by_topic(&self, topic_id: &str) -> Result<Value, ApiError>;
    async fn create_vocab(&self, entry: &Value) -> Result<Value, ApiError>;
    async fn bulk_create_vocab(&self, entries: &[Value]) -> Result<Value, ApiError>;
    async fn update_vocab(&self, id: &str, entry: &Value) -> Result<Value, ApiError>;
    async fn delete_vocab(&self, id: &str) -> Result<(), ApiError>;

    async fn list_videos(&self) -> Result<Value, ApiError>;
    async fn create_video(&self, video: &Value) -> Result<Value, ApiError>;
    async fn update_video(&self, id: &str, video: &Value) -> Result<Value, ApiError>;
    async fn delete_video(&self, id: &str) -> Result<(), ApiError>;

    async fn list_users(&self) -> Result<Value, ApiError>;
    async fn create_user(&self, user: &Value) -> Result<Value, ApiError>;
    async fn update_user(&self, id: &str, user: &Value) -> Result<Value, ApiError>;
    async fn delete_user(&self, id: &str) -> Result<(), ApiError>;
}
