//! Provider registry
//!
//! Resolves a user-supplied model name to the provider that serves it and the
//! canonical id to send over the wire.
//!
//! Resolution order:
//!  1. the static Anthropic-style catalog (display name or API id), no network
//!  2. the OpenAI-style catalog, fetched on first need and reused afterwards
//!  3. otherwise [`RegistryError::UnknownModel`]

use crate::ports::llm_gateway::{GatewayError, LlmProvider, ModelCatalog};
use curlgen_domain::{ProviderKind, ProviderModel, anthropic_catalog};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::debug;

/// Errors that can occur while resolving a model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown model: {0} (run `curlgen list-models` to see available models)")]
    UnknownModel(String),

    #[error("Model {model} needs the {kind} provider, which is not configured")]
    ProviderNotConfigured { model: String, kind: ProviderKind },

    #[error("Failed to fetch model catalog: {0}")]
    Catalog(#[source] GatewayError),
}

/// A model name resolved to its provider
#[derive(Clone)]
pub struct ResolvedModel {
    pub model: ProviderModel,
    pub provider: Arc<dyn LlmProvider>,
}

impl std::fmt::Debug for ResolvedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedModel")
            .field("model", &self.model)
            .field("provider", &self.provider.kind())
            .finish()
    }
}

/// Both catalogs, for listing
#[derive(Debug, Clone, Default)]
pub struct ModelListing {
    pub openai: Vec<ProviderModel>,
    pub anthropic: Vec<ProviderModel>,
}

/// Registry of configured providers and their models
pub struct ProviderRegistry {
    openai: Option<Arc<dyn LlmProvider>>,
    openai_catalog: Option<Arc<dyn ModelCatalog>>,
    anthropic: Option<Arc<dyn LlmProvider>>,
    static_models: Vec<ProviderModel>,
    remote_models: OnceCell<Vec<ProviderModel>>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderRegistry {
    /// Registry with the static Anthropic catalog and no providers attached.
    pub fn new() -> Self {
        Self {
            openai: None,
            openai_catalog: None,
            anthropic: None,
            static_models: anthropic_catalog(),
            remote_models: OnceCell::new(),
        }
    }

    pub fn with_openai(
        mut self,
        provider: Arc<dyn LlmProvider>,
        catalog: Arc<dyn ModelCatalog>,
    ) -> Self {
        self.openai = Some(provider);
        self.openai_catalog = Some(catalog);
        self
    }

    pub fn with_anthropic(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.anthropic = Some(provider);
        self
    }

    /// Resolve a model name to its provider and canonical id.
    pub async fn resolve(&self, name: &str) -> Result<ResolvedModel, RegistryError> {
        if let Some(model) = self.static_models.iter().find(|m| m.matches(name)) {
            debug!("Resolved {} from the static catalog", name);
            return self.attach(model.clone());
        }

        let remote = self.remote_models().await?;
        match remote.iter().find(|m| m.matches(name)) {
            Some(model) => {
                debug!("Resolved {} from the remote catalog", name);
                self.attach(model.clone())
            }
            None => Err(RegistryError::UnknownModel(name.to_string())),
        }
    }

    /// List both catalogs. Fetches the remote catalog if it has not been yet.
    pub async fn list(&self) -> Result<ModelListing, RegistryError> {
        Ok(ModelListing {
            openai: self.remote_models().await?.to_vec(),
            anthropic: self.static_models.clone(),
        })
    }

    async fn remote_models(&self) -> Result<&[ProviderModel], RegistryError> {
        let Some(catalog) = &self.openai_catalog else {
            debug!("No OpenAI-style catalog configured");
            return Ok(&[]);
        };
        let models = self
            .remote_models
            .get_or_try_init(|| async {
                debug!("Fetching OpenAI-style model catalog");
                catalog.list_models().await.map_err(RegistryError::Catalog)
            })
            .await?;
        Ok(models)
    }

    fn attach(&self, model: ProviderModel) -> Result<ResolvedModel, RegistryError> {
        let provider = match model.kind() {
            ProviderKind::OpenAiStyle => self.openai.clone(),
            ProviderKind::AnthropicStyle => self.anthropic.clone(),
        };
        match provider {
            Some(provider) => Ok(ResolvedModel { model, provider }),
            None => Err(RegistryError::ProviderNotConfigured {
                model: model.display_name().to_string(),
                kind: model.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::CompletionRequest;
    use async_trait::async_trait;
    use curlgen_domain::LlmResponse;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubProvider(ProviderKind);

    #[async_trait]
    impl LlmProvider for StubProvider {
        fn kind(&self) -> ProviderKind {
            self.0
        }

        async fn complete(
            &self,
            _request: &CompletionRequest<'_>,
        ) -> Result<LlmResponse, GatewayError> {
            Ok(LlmResponse::from_text("stub"))
        }
    }

    struct CountingCatalog {
        ids: Vec<&'static str>,
        fetches: AtomicUsize,
        fail: bool,
    }

    impl CountingCatalog {
        fn new(ids: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                ids,
                fetches: AtomicUsize::new(0),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                ids: vec![],
                fetches: AtomicUsize::new(0),
                fail: true,
            })
        }
    }

    #[async_trait]
    impl ModelCatalog for CountingCatalog {
        async fn list_models(&self) -> Result<Vec<ProviderModel>, GatewayError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(GatewayError::Authentication("invalid key".to_string()));
            }
            Ok(self.ids.iter().map(|id| ProviderModel::openai(*id)).collect())
        }
    }

    fn registry(catalog: Arc<CountingCatalog>) -> ProviderRegistry {
        ProviderRegistry::new()
            .with_openai(Arc::new(StubProvider(ProviderKind::OpenAiStyle)), catalog)
            .with_anthropic(Arc::new(StubProvider(ProviderKind::AnthropicStyle)))
    }

    #[tokio::test]
    async fn test_static_name_resolves_without_fetch() {
        let catalog = CountingCatalog::new(vec!["gpt-4o"]);
        let registry = registry(catalog.clone());

        let resolved = registry.resolve("claude-3-haiku").await.unwrap();
        assert_eq!(resolved.model.canonical_id(), "claude-3-haiku-20240307");
        assert_eq!(resolved.model.kind(), ProviderKind::AnthropicStyle);
        assert_eq!(resolved.provider.kind(), ProviderKind::AnthropicStyle);
        assert_eq!(catalog.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_static_api_id_resolves() {
        let registry = registry(CountingCatalog::new(vec![]));
        let resolved = registry.resolve("claude-3-opus-20240229").await.unwrap();
        assert_eq!(resolved.model.display_name(), "claude-3-opus");
    }

    #[tokio::test]
    async fn test_remote_name_resolves_and_fetch_is_memoized() {
        let catalog = CountingCatalog::new(vec!["gpt-4o", "o1-mini"]);
        let registry = registry(catalog.clone());

        let first = registry.resolve("gpt-4o").await.unwrap();
        assert_eq!(first.model.canonical_id(), "gpt-4o");
        assert_eq!(first.provider.kind(), ProviderKind::OpenAiStyle);

        registry.resolve("o1-mini").await.unwrap();
        let _ = registry.resolve("does-not-exist").await;
        registry.list().await.unwrap();
        assert_eq!(catalog.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_model() {
        let registry = registry(CountingCatalog::new(vec!["gpt-4o"]));
        let err = registry.resolve("llama-3").await.unwrap_err();
        assert_eq!(err, RegistryError::UnknownModel("llama-3".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_model_without_catalog() {
        let registry = ProviderRegistry::new();
        let err = registry.resolve("gpt-4o").await.unwrap_err();
        assert!(matches!(err, RegistryError::UnknownModel(_)));
    }

    #[tokio::test]
    async fn test_provider_not_configured() {
        let registry = ProviderRegistry::new();
        let err = registry.resolve("claude-3-sonnet").await.unwrap_err();
        assert_eq!(
            err,
            RegistryError::ProviderNotConfigured {
                model: "claude-3-sonnet".to_string(),
                kind: ProviderKind::AnthropicStyle,
            }
        );
    }

    #[tokio::test]
    async fn test_catalog_failure_is_reported() {
        let registry = registry(CountingCatalog::failing());
        let err = registry.resolve("gpt-4o").await.unwrap_err();
        assert!(matches!(err, RegistryError::Catalog(GatewayError::Authentication(_))));
    }

    #[tokio::test]
    async fn test_list_returns_both_catalogs() {
        let registry = registry(CountingCatalog::new(vec!["gpt-4o"]));
        let listing = registry.list().await.unwrap();
        assert_eq!(listing.openai.len(), 1);
        assert_eq!(listing.anthropic.len(), 4);
    }
}
