use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::ExtractionPipeline;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: Arc<ExtractionPipeline>,
}

impl AppState {
    pub fn new(config: Config, pipeline: ExtractionPipeline) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
        }
    }

    /// State wired with the backends named in `config`.
    pub fn from_config(config: Config) -> Self {
        let pipeline = ExtractionPipeline::from_config(&config);
        Self::new(config, pipeline)
    }
}
