use crate::application_port::CatalogService;
use crate::client::{ApiError, AuthenticatedClient};
use crate::domain_model::ApiRequest;
use crate::domain_model::endpoint::*;
use serde_json::Value;

pub struct RealCatalogService {
    client: AuthenticatedClient,
}

impl RealCatalogService {
    pub fn new(client: AuthenticatedClient) -> RealCatalogService {
        RealCatalogService { client }
    }
}

fn by_id(template: &str, id: &str) -> String {
    build_path(template, &[("id", id)])
}

#[async_trait::async_trait]
impl CatalogService for RealCatalogService {
    async fn list_lessons(&self) -> Result<Value, ApiError> {
        self.client.get_json(LESSONS).await
    }

    async fn get_lesson(&self, id: &str) -> Result<Value, ApiError> {
        self.client.get_json(&by_id(LESSON, id)).await
    }

    async fn create_lesson(&self, lesson: &Value) -> Result<Value, ApiError> {
        self.client.post_json(LESSONS, lesson).await
    }

    async fn update_lesson(&self, id: &str, lesson: &Value) -> Result<Value, ApiError> {
        self.client.put_json(&by_id(LESSON, id), lesson).await
    }

    async fn delete_lesson(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&by_id(LESSON, id)).await
    }

    async fn publish_lesson(&self, id: &str, published: bool) -> Result<Value, ApiError> {
        let request = ApiRequest::patch(by_id(LESSON_PUBLISH, id)).query("value", published);
        self.client.send_json(request).await
    }

    async fn topics_by_lesson(&self, lesson_id: &str) -> Result<Value, ApiError> {
        let path = build_path(TOPICS_BY_LESSON, &[("lessonId", lesson_id)]);
        self.client.get_json(&path).await
    }

    async fn create_topic(&self, topic: &Value) -> Result<Value, ApiError> {
        self.client.post_json(TOPICS, topic).await
    }

    async fn delete_topic(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&by_id(TOPIC, id)).await
    }

    async fn quizzes_by_topic(&self, topic_id: &str) -> Result<Value, ApiError> {
        let path = build_path(QUIZZES_BY_TOPIC, &[("topicId", topic_id)]);
        self.client.get_json(&path).await
    }

    async fn create_quiz(&self, quiz: &Value) -> Result<Value, ApiError> {
        self.client.post_json(QUIZZES, quiz).await
    }

    async fn update_quiz(&self, id: &str, quiz: &Value) -> Result<Value, ApiError> {
        self.client.put_json(&by_id(QUIZ, id), quiz).await
    }

    async fn delete_quiz(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&by_id(QUIZ, id)).await
    }

    async fn vocab_by_topic(&self, topic_id: &str) -> Result<Value, ApiError> {
        let path = build_path(VOCAB_BY_TOPIC, &[("topicId", topic_id)]);
        self.client.get_json(&path).await
    }

    async fn create_vocab(&self, entry: &Value) -> Result<Value, ApiError> {
        self.client.post_json(VOCAB, entry).await
    }

    async fn bulk_create_vocab(&self, entries: &[Value]) -> Result<Value, ApiError> {
        self.client.post_json(VOCAB_BULK, entries).await
    }

    async fn update_vocab(&self, id: &str, entry: &Value) -> Result<Value, ApiError> {
        self.client.put_json(&by_id(VOCAB_ENTRY, id), entry).await
    }

    async fn delete_vocab(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&by_id(VOCAB_ENTRY, id)).await
    }

    async fn list_videos(&self) -> Result<Value, ApiError> {
        self.client.get_json(VIDEOS).await
    }

    async fn create_video(&self, video: &Value) -> Result<Value, ApiError> {
        self.client.post_json(VIDEOS, video).await
    }

    async fn update_video(&self, id: &str, video: &Value) -> Result<Value, ApiError> {
        self.client.put_json(&by_id(VIDEO, id), video).await
    }

    async fn delete_video(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&by_id(VIDEO, id)).await
    }

    async fn list_users(&self) -> Result<Value, ApiError> {
        self.client.get_json(USERS).await
    }

    async fn create_user(&self, user: &Value) -> Result<Value, ApiError> {
        self.client.post_json(USERS, user).await
    }

    async fn update_user(&self, id: &str, user: &Value) -> Result<Value, ApiError> {
        self.client.put_json(&by_id(USER, id), user).await
    }

    async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&by_id(USER, id)).await
    }
}
