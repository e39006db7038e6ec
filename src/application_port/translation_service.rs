use crate::client::ApiError;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait TranslationService: Send + Sync {
    async fn en_to_vi(&self, text: &str) -> Result<Translation, ApiError>;
    async fn vi_to_en(&self, text: &str) -> Result<Translation, ApiError>;
    async fn custom(&self, text: &str, source: &str, target: &str)
    -> Result<Translation, ApiError>;
    async fn languages(&self) -> Result<Vec<Language>, ApiError>;
    async fn vocab(&self, input: &VocabTranslationInput) -> Result<Translation, ApiError>;
    async fn history(&self, query: &HistoryQuery) -> Result<TranslationHistory, ApiError>;
}
