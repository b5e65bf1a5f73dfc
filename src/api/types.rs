//! Shared state for the HTTP API.

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::model_service::ModelService;
use crate::pipeline::extraction::{default_ocr_engine, OcrEngine, PdfExtractor, PdfTextExtractor};
use crate::pipeline::inference::{ConfiguredModels, ModelFactory};

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<ServiceConfig>,
    pub models: Arc<dyn ModelFactory>,
    pub model_service: Arc<ModelService>,
    pub pdf: Arc<dyn PdfExtractor>,
    /// `None` when the build or host has no OCR.
    pub ocr: Option<Arc<dyn OcrEngine>>,
}

impl ApiContext {
    /// Production context: configured model backends, pdf-extract, and
    /// Tesseract when available.
    pub fn new(config: ServiceConfig) -> Self {
        let config = Arc::new(config);
        Self {
            models: Arc::new(ConfiguredModels::new(Arc::clone(&config))),
            model_service: Arc::new(ModelService::new()),
            pdf: Arc::new(PdfTextExtractor),
            ocr: default_ocr_engine(&config.tessdata_dir),
            config,
        }
    }

    pub fn with_models(mut self, models: Arc<dyn ModelFactory>) -> Self {
        self.models = models;
        self
    }

    pub fn with_ocr(mut self, ocr: Option<Arc<dyn OcrEngine>>) -> Self {
        self.ocr = ocr;
        self
    }
}
