//! Analysis entrypoint: admission, detection, parsing, features, inference,
//! and fusion wired into one call.

use std::sync::Arc;

use sentinel_core::config::{AdmissionConfig, SentinelConfig};
use sentinel_core::errors::{AdmissionError, ArtifactError, ClassifierError, PipelineError};
use sentinel_core::tracing::metrics;
use serde::{Deserialize, Serialize};

use crate::classifier::{Classifier, MlpModel, ModelArtifact, ModelHandle};
use crate::features::{align, AlignedVector, FeatureExtractor, FeatureSchema};
use crate::fusion::{sanitize, FusionInput, RiskFusionEngine, ScanVerdict};
use crate::language::detect_language;
use crate::parsers::ParserRegistry;

/// One snippet to analyze.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub code: String,
    #[serde(default)]
    pub filename: Option<String>,
}

impl AnalysisRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Shared, read-mostly state for every analysis call.
#[derive(Clone)]
pub struct AnalysisContext {
    pub registry: Arc<ParserRegistry>,
    pub schema: Arc<FeatureSchema>,
    pub model: ModelHandle,
    /// Produces the appended NN column for stacking models.
    pub augmenter: Option<Arc<MlpModel>>,
    pub fusion: Arc<RiskFusionEngine>,
    pub admission: AdmissionConfig,
    pub hot_reload: bool,
}

impl AnalysisContext {
    /// Context with the built-in pattern table and default settings.
    pub fn new(schema: FeatureSchema, model: ModelHandle) -> Result<Self, PipelineError> {
        Self::from_parts(&SentinelConfig::default(), schema, model)
    }

    /// Load every artifact named in `config`.
    ///
    /// Malformed artifacts fail here. A missing model file does not: the
    /// handle starts empty and every prediction falls back.
    pub fn from_config(config: &SentinelConfig) -> Result<Self, PipelineError> {
        let schema = match &config.model.schema_path {
            Some(path) => FeatureSchema::load(path)?,
            None => {
                tracing::warn!("no feature schema configured; classifier input will be empty");
                FeatureSchema::new(Vec::new())?
            }
        };
        let model = match &config.model.model_path {
            Some(path) => ModelHandle::load(path)?,
            None => ModelHandle::empty(),
        };
        let mut ctx = Self::from_parts(config, schema, model)?;

        if let Some(path) = &config.model.augmenter_path {
            match ModelArtifact::load(path)? {
                ModelArtifact::Mlp(mlp) => ctx.augmenter = Some(Arc::new(mlp)),
                other => {
                    return Err(ArtifactError::Malformed {
                        path: path.clone(),
                        message: format!("augmenter must be an mlp model, found {}", other.kind()),
                    }
                    .into())
                }
            }
        }
        Ok(ctx)
    }

    fn from_parts(
        config: &SentinelConfig,
        schema: FeatureSchema,
        model: ModelHandle,
    ) -> Result<Self, PipelineError> {
        Ok(Self {
            registry: Arc::new(ParserRegistry::new()),
            schema: Arc::new(schema),
            model,
            augmenter: None,
            fusion: Arc::new(RiskFusionEngine::from_config(&config.fusion)?),
            admission: config.admission.clone(),
            hot_reload: config.model.effective_hot_reload(),
        })
    }

    pub fn with_augmenter(mut self, augmenter: MlpModel) -> Self {
        self.augmenter = Some(Arc::new(augmenter));
        self
    }

    pub fn with_admission(mut self, admission: AdmissionConfig) -> Self {
        self.admission = admission;
        self
    }

    pub fn with_fusion(mut self, fusion: RiskFusionEngine) -> Self {
        self.fusion = Arc::new(fusion);
        self
    }

    pub fn with_hot_reload(mut self, hot_reload: bool) -> Self {
        self.hot_reload = hot_reload;
        self
    }
}

/// Reject input before any parsing happens.
pub fn admit(code: &str, admission: &AdmissionConfig) -> Result<(), AdmissionError> {
    if code.trim().is_empty() {
        return Err(AdmissionError::EmptyInput);
    }
    let max = admission.effective_max_input_chars();
    let length = code.chars().count();
    if length > max {
        return Err(AdmissionError::TooLarge { length, max });
    }
    Ok(())
}

/// Analyze one snippet. Only admission failures are errors; every other
/// outcome, unparseable input included, is a verdict.
pub fn analyze(ctx: &AnalysisContext, request: &AnalysisRequest) -> Result<ScanVerdict, AdmissionError> {
    let code = request.code.as_str();
    admit(code, &ctx.admission)?;

    let detection = detect_language(code, request.filename.as_deref());
    tracing::debug!(
        language = %detection.language,
        { metrics::DETECTION_CONFIDENCE } = detection.confidence,
        "language detected"
    );

    let Some(tree) = ctx.registry.parse(code, detection.language) else {
        return Ok(ctx
            .fusion
            .invalid(code, detection.language, detection.confidence));
    };

    let sanitized = sanitize(code, &tree, detection.language);
    let features =
        FeatureExtractor::new(ctx.registry.categories()).normalize(&tree, detection.language);
    let aligned = augment(ctx, align(&features, &ctx.schema));
    tracing::debug!(
        { metrics::NODES_SCANNED } = aligned.nodes_scanned,
        dropped = aligned.dropped,
        "features aligned"
    );

    if ctx.hot_reload {
        ctx.model.reload_if_modified();
    }
    let prediction: Result<[f64; 2], ClassifierError> = ctx.model.predict_proba(&aligned);

    Ok(ctx.fusion.decide(FusionInput {
        raw_code: code,
        sanitized_code: &sanitized,
        language: detection.language,
        language_confidence: detection.confidence,
        nodes_scanned: aligned.nodes_scanned,
        prediction,
    }))
}

/// Append the NN probability column when an augmenter is configured.
fn augment(ctx: &AnalysisContext, aligned: AlignedVector) -> AlignedVector {
    let Some(mlp) = &ctx.augmenter else {
        return aligned;
    };
    match mlp.p_malicious(&aligned) {
        Ok(p) if p.is_finite() => aligned.with_extra(p),
        Ok(_) => {
            tracing::warn!("augmenter produced a non-finite probability; column omitted");
            aligned
        }
        Err(e) => {
            tracing::warn!(error = %e, "augmenter failed; column omitted");
            aligned
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admission_rejects_blank_and_oversized_input() {
        let admission = AdmissionConfig {
            max_input_chars: Some(5),
        };
        assert_eq!(admit("", &admission), Err(AdmissionError::EmptyInput));
        assert_eq!(admit("  \n\t", &admission), Err(AdmissionError::EmptyInput));
        assert_eq!(
            admit("abcdef", &admission),
            Err(AdmissionError::TooLarge { length: 6, max: 5 })
        );
        assert_eq!(admit("abcde", &admission), Ok(()));
    }

    #[test]
    fn limit_counts_characters_not_bytes() {
        let admission = AdmissionConfig {
            max_input_chars: Some(3),
        };
        assert_eq!(admit("äöü", &admission), Ok(()));
    }

    #[test]
    fn request_deserializes_without_filename() {
        let req: AnalysisRequest = serde_json::from_str(r#"{"code": "x = 1"}"#).unwrap();
        assert_eq!(req.code, "x = 1");
        assert!(req.filename.is_none());
    }
}
