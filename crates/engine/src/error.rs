use data_loader::ProviderError;
use pipeline::PipelineError;
use thiserror::Error;

/// Why a training run did not produce a model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrainError {
    #[error("metadata provider failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("no usable movies from {source_name}")]
    EmptyCatalog { source_name: String },

    #[error("training pipeline failed: {0}")]
    Pipeline(PipelineError),
}

pub type Result<T> = std::result::Result<T, TrainError>;
