//! Model operations and their command-line encoding.

use std::collections::BTreeMap;
use std::fmt;

use custlysis_core::reports::TrainingOutcome;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelOperation {
    Train,
    Predict,
    ListSegments,
}

impl ModelOperation {
    /// Value passed to the script's `--action` flag.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Predict => "predict",
            Self::ListSegments => "get_segments",
        }
    }

    /// Prefix of the transport message when the script exits non-zero.
    pub fn failure_prefix(&self) -> &'static str {
        match self {
            Self::Train => "Training failed: ",
            Self::Predict => "Prediction failed: ",
            Self::ListSegments => "Failed to get segments: ",
        }
    }

    /// Renders an outcome as the plain-text body returned to API callers.
    pub fn response_text(&self, outcome: &TrainingOutcome) -> String {
        if outcome.succeeded {
            outcome.combined_output.clone()
        } else if outcome.exit_code.is_some() {
            format!("{}{}", self.failure_prefix(), outcome.combined_output)
        } else {
            format!("Error: {}", outcome.combined_output)
        }
    }
}

impl fmt::Display for ModelOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

/// An operation plus extra script arguments, each rendered as `--key value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    pub operation: ModelOperation,
    pub args: BTreeMap<String, String>,
}

impl ModelRequest {
    pub fn new(operation: ModelOperation) -> Self {
        Self {
            operation,
            args: BTreeMap::new(),
        }
    }

    pub fn train() -> Self {
        Self::new(ModelOperation::Train)
    }

    pub fn predict(customer_id: i64) -> Self {
        Self::new(ModelOperation::Predict).with_arg("customer_id", customer_id.to_string())
    }

    pub fn list_segments() -> Self {
        Self::new(ModelOperation::ListSegments)
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    /// Script arguments following the script path.
    pub fn script_args(&self) -> Vec<String> {
        let mut out = vec!["--action".to_string(), self.operation.action().to_string()];
        for (key, value) in &self.args {
            out.push(format!("--{key}"));
            out.push(value.clone());
        }
        out
    }
}
