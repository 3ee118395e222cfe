use super::client::GeminiClient;
use super::types::ListModelsResponse;
use crate::{Error, Result, config::GeminiConfig};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateMethod {
    GenerateContent,
    GenerateText,
}

impl GenerateMethod {
    pub fn rpc_name(self) -> &'static str {
        match self {
            Self::GenerateContent => "generateContent",
            Self::GenerateText => "generateText",
        }
    }
}

/// One shape the hosted API may present: a version prefix plus the generation
/// RPC that version speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiSurface {
    pub version: &'static str,
    pub method: GenerateMethod,
}

impl ApiSurface {
    pub fn identifier(&self) -> String {
        format!("{}/{}", self.version, self.method.rpc_name())
    }
}

/// Probed in order; the first reachable surface wins. v1beta2 is the legacy
/// PaLM-era surface kept as a last resort.
pub const CANDIDATE_SURFACES: &[ApiSurface] = &[
    ApiSurface {
        version: "v1beta",
        method: GenerateMethod::GenerateContent,
    },
    ApiSurface {
        version: "v1",
        method: GenerateMethod::GenerateContent,
    },
    ApiSurface {
        version: "v1beta2",
        method: GenerateMethod::GenerateText,
    },
];

/// Snapshot of what startup binding discovered. Immutable once produced;
/// served verbatim by `GET /debug`.
#[derive(Debug, Clone, Serialize)]
pub struct BindingReport {
    /// Identifier of the selected API surface, e.g. "v1beta/generateContent".
    #[serde(rename = "imported_module")]
    pub api_surface: Option<String>,
    #[serde(rename = "has_configure")]
    pub has_api_key: bool,
    /// Whether the probe saw the configured model in the surface's listing.
    #[serde(rename = "model_class_found")]
    pub model_found: bool,
    pub runtime_version: String,
}

fn runtime_version() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// The process-wide model binding: a client bound to one API surface, plus
/// the report of how that surface was chosen.
#[derive(Debug)]
pub struct ModelBinding {
    pub handle: GeminiClient,
    pub report: BindingReport,
}

impl ModelBinding {
    /// Direct mode: assume the current surface without probing.
    pub fn direct(config: &GeminiConfig) -> Result<Self> {
        let surface = CANDIDATE_SURFACES[0];
        let handle = GeminiClient::new(config, surface)?;

        Ok(Self {
            handle,
            report: BindingReport {
                api_surface: Some(surface.identifier()),
                has_api_key: config.api_key.is_some(),
                model_found: false,
                runtime_version: runtime_version(),
            },
        })
    }

    /// Diagnostic mode: try each candidate surface's model-listing endpoint
    /// in order and bind the first one that exists. A 401/403 still selects
    /// the surface: the endpoint is there, only the credentials are not,
    /// and credential problems are deferred to request time.
    pub async fn probe(config: &GeminiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let base_url = config.base_url.trim_end_matches('/');
        let mut last_error: Option<String> = None;

        for surface in CANDIDATE_SURFACES {
            let url = format!("{}/{}/models", base_url, surface.version);
            debug!(surface = %surface.identifier(), "Probing API surface");

            let mut request = http.get(&url);
            if let Some(key) = &config.api_key {
                request = request.query(&[("key", key.as_str())]);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => {
                    warn!(surface = %surface.identifier(), error = %e, "Probe failed");
                    last_error = Some(e.to_string());
                    continue;
                }
            };

            if response.status() == reqwest::StatusCode::NOT_FOUND {
                last_error = Some(format!("{} returned 404", url));
                continue;
            }

            let model_found = if response.status().is_success() {
                match response.json::<ListModelsResponse>().await {
                    Ok(list) => list
                        .models
                        .iter()
                        .any(|m| m.name == format!("models/{}", config.model)),
                    Err(_) => false,
                }
            } else {
                false
            };

            info!(
                surface = %surface.identifier(),
                model = %config.model,
                model_found,
                "Bound Gemini API surface"
            );

            let handle = GeminiClient::new(config, *surface)?;
            return Ok(Self {
                handle,
                report: BindingReport {
                    api_surface: Some(surface.identifier()),
                    has_api_key: config.api_key.is_some(),
                    model_found,
                    runtime_version: runtime_version(),
                },
            });
        }

        let tried: Vec<&str> = CANDIDATE_SURFACES.iter().map(|s| s.version).collect();
        Err(Error::config(format!(
            "No usable Gemini API surface. Tried: {}. Last error: {}",
            tried.join(", "),
            last_error.unwrap_or_else(|| "none recorded".to_string())
        )))
    }
}
