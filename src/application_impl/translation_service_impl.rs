use crate::application_port::TranslationService;
use crate::client::{ApiError, AuthenticatedClient};
use crate::domain_model::endpoint::*;
use crate::domain_model::*;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct TextBody<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct CustomBody<'a> {
    text: &'a str,
    source: &'a str,
    target: &'a str,
}

#[derive(Deserialize)]
struct LanguageList {
    #[serde(default)]
    languages: Vec<Language>,
}

pub struct RealTranslationService {
    client: AuthenticatedClient,
}

impl RealTranslationService {
    pub fn new(client: AuthenticatedClient) -> RealTranslationService {
        RealTranslationService { client }
    }
}

#[async_trait::async_trait]
impl TranslationService for RealTranslationService {
    async fn en_to_vi(&self, text: &str) -> Result<Translation, ApiError> {
        self.client
            .post_json(TRANSLATE_EN_TO_VI, &TextBody { text })
            .await
    }

    async fn vi_to_en(&self, text: &str) -> Result<Translation, ApiError> {
        self.client
            .post_json(TRANSLATE_VI_TO_EN, &TextBody { text })
            .await
    }

    async fn custom(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<Translation, ApiError> {
        let body = CustomBody {
            text,
            source,
            target,
        };
        self.client.post_json(TRANSLATE_CUSTOM, &body).await
    }

    async fn languages(&self) -> Result<Vec<Language>, ApiError> {
        let list: LanguageList = self.client.get_json(TRANSLATE_LANGUAGES).await?;
        Ok(list.languages)
    }

    async fn vocab(&self, input: &VocabTranslationInput) -> Result<Translation, ApiError> {
        self.client.post_json(TRANSLATE_VOCAB, input).await
    }

    async fn history(&self, query: &HistoryQuery) -> Result<TranslationHistory, ApiError> {
        let mut request = ApiRequest::get(TRANSLATE_HISTORY);
        if let Some(page) = query.page {
            request = request.query("page", page);
        }
        if let Some(limit) = query.limit {
            request = request.query("limit", limit);
        }
        if let Some(source) = &query.source {
            request = request.query("source", source);
        }
        if let Some(target) = &query.target {
            request = request.query("target", target);
        }
        self.client.send_json(request).await
    }
}
