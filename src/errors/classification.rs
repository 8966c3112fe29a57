use super::types::OpscastError;

/// Where an error sits in the run's failure taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid parameters; aborts before any work is done.
    Configuration,
    /// Forecasting or recommendation failure; recovered by skipping or substituting.
    ExternalService,
    /// Output files could not be written; aborts the run.
    Output,
    Internal,
}

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub category: ErrorCategory,
    pub retryable: bool,
}

impl ErrorClassification {
    fn new(error_type: &'static str, category: ErrorCategory, retryable: bool) -> Self {
        Self { error_type, category, retryable }
    }
}

impl OpscastError {
    /// Classify this error to determine its type, category and whether it can be retried.
    pub fn classify(&self) -> ErrorClassification {
        use ErrorCategory::*;
        match self {
            // Retryable service errors
            OpscastError::RateLimit(_) => ErrorClassification::new("RateLimitError", ExternalService, true),
            OpscastError::Network(_) => ErrorClassification::new("NetworkError", ExternalService, true),
            OpscastError::Timeout(_) => ErrorClassification::new("TimeoutError", ExternalService, true),
            OpscastError::LLMApi(_) => ErrorClassification::new("LLMApiError", ExternalService, true),

            // Service errors a retry cannot fix
            OpscastError::OutputValidation(_) => {
                ErrorClassification::new("OutputValidationError", ExternalService, false)
            }
            OpscastError::Authentication(_) => {
                ErrorClassification::new("AuthenticationError", ExternalService, false)
            }
            OpscastError::Forecast(_) => ErrorClassification::new("ForecastError", ExternalService, false),
            OpscastError::InsufficientData { .. } => {
                ErrorClassification::new("InsufficientDataError", ExternalService, false)
            }

            OpscastError::Config(_) => ErrorClassification::new("ConfigError", Configuration, false),

            OpscastError::Output { .. } => ErrorClassification::new("OutputError", Output, false),
            OpscastError::Io(_) => ErrorClassification::new("IoError", Output, false),

            OpscastError::Json(_) => ErrorClassification::new("JsonError", Internal, false),
            OpscastError::Yaml(_) => ErrorClassification::new("YamlError", Internal, false),
            OpscastError::Internal(_) => ErrorClassification::new("InternalError", Internal, false),
        }
    }
}
