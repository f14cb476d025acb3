//! Generator: the entry point the red-teaming harness calls
//!
//! One generator serves one model. Construction validates the configuration,
//! checks credentials, and routes the model to an endpoint variant; each
//! `generate` call then assembles a request, sends it under the retry
//! controller, and normalizes the response.

use crate::config::{ConfigError, GeneratorConfig, ValidationError, REQUEST_PARAMS};
use crate::http::EndpointVariant;
use crate::protocol::{GenerationResult, Prompt};
use crate::providers::error::{GeneratorError, GeneratorResult};
use crate::providers::family::ProviderFamily;
use crate::providers::lifecycle::ClientLifecycle;
use crate::providers::request::RequestBuilder;
use crate::providers::response::ResponseExtractor;
use crate::providers::retry::{BackoffRetryController, CallOutcome};
use crate::providers::routing::{context_length, ModelRouter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

/// Text generator backed by a remote LLM provider
#[derive(Debug, Serialize, Deserialize)]
pub struct Generator {
    name: String,
    config: GeneratorConfig,
    variant: EndpointVariant,
    lifecycle: ClientLifecycle,
}

impl Generator {
    /// Build a generator for `name` using the family's default router.
    ///
    /// An empty `name` asks the provider for its model list and fails with
    /// the list in the error.
    pub async fn new(
        name: impl Into<String>,
        config: GeneratorConfig,
        family: ProviderFamily,
    ) -> GeneratorResult<Self> {
        let router = ModelRouter::for_family(&family);
        Self::with_router(name, config, family, &router).await
    }

    /// Build a generator with a caller-supplied router
    pub async fn with_router(
        name: impl Into<String>,
        mut config: GeneratorConfig,
        family: ProviderFamily,
        router: &ModelRouter,
    ) -> GeneratorResult<Self> {
        let name = name.into();

        config.validate().map_err(ConfigError::from)?;
        family.validate().map_err(ConfigError::from)?;

        if config.context_len.is_none() {
            config.context_len = context_length(&name);
        }

        let mut lifecycle = ClientLifecycle::new(family);
        lifecycle.acquire(&name, &config.connection).await?;

        let variant = router.resolve(&lifecycle.family().name, &name)?;
        lifecycle.release();

        debug!(
            "Created {} {} generator for the {} endpoint",
            lifecycle.family().name,
            name,
            variant
        );

        Ok(Self {
            name,
            config,
            variant,
            lifecycle,
        })
    }

    /// Model name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Family display name plus model, e.g. "OpenAI gpt-4"
    pub fn fullname(&self) -> String {
        format!("{} {}", self.lifecycle.family().name, self.name)
    }

    pub fn family(&self) -> &ProviderFamily {
        self.lifecycle.family()
    }

    pub fn variant(&self) -> EndpointVariant {
        self.variant
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn context_len(&self) -> Option<usize> {
        self.config.context_len
    }

    /// Stop sending `key` with requests.
    ///
    /// Only request parameter names are accepted, the same set the config
    /// validator allows in `suppressed_params`.
    pub fn suppress_param(&mut self, key: impl Into<String>) -> GeneratorResult<()> {
        let key = key.into();
        if !REQUEST_PARAMS.contains(&key.as_str()) {
            return Err(ConfigError::from(ValidationError::invalid_value(
                "suppressed_params",
                format!("one of {}", REQUEST_PARAMS.join(", ")),
                key,
            ))
            .into());
        }
        self.config.suppressed_params.insert(key);
        Ok(())
    }

    /// Resume sending `key` with requests
    pub fn unsuppress_param(&mut self, key: &str) {
        self.config.suppressed_params.remove(key);
    }

    pub fn is_attached(&self) -> bool {
        self.lifecycle.is_attached()
    }

    /// Drop the client handle; the next `generate` reattaches
    pub fn release(&mut self) {
        self.lifecycle.release();
    }

    /// Generate `generations` outputs for `prompt`.
    ///
    /// Per-call faults do not raise: a prompt of the wrong shape yields an
    /// empty result and a rejected request yields `[None]`.
    pub async fn generate(
        &mut self,
        prompt: &Prompt,
        generations: usize,
    ) -> GeneratorResult<GenerationResult> {
        if generations == 0 {
            return Err(GeneratorError::InvalidGenerationCount);
        }

        let client = self
            .lifecycle
            .acquire(&self.name, &self.config.connection)
            .await?;

        let params = match RequestBuilder::new(self.variant, &self.name, &self.config)
            .build(prompt, generations)
        {
            Ok(params) => params,
            Err(mismatch) => {
                error!("{}. Returning nothing!", mismatch);
                return Ok(Vec::new());
            }
        };

        let variant = self.variant;
        let extractor = ResponseExtractor::new(variant);
        let controller = BackoffRetryController::from_config(&self.config);
        let params = &params;

        let report = controller
            .execute(|| {
                let client = Arc::clone(&client);
                async move {
                    let raw = client.create(variant, params).await?;
                    extractor.extract(raw)
                }
            })
            .await?;

        match report.outcome {
            CallOutcome::Success(result) => Ok(result),
            CallOutcome::Rejected(rejection) => {
                error!("{}", rejection);
                error!("Bad request: {:?}", prompt);
                Ok(vec![None])
            }
        }
    }
}
