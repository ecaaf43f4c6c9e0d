use crate::error::WorkflowError;
use serde::Serialize;

/// Envelope handed to the presentation layer. Exactly one of `data` and
/// `error` is present, mirrored by `success`.
#[derive(Debug, Serialize)]
pub struct OperationResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
}

#[derive(Debug, Serialize)]
pub struct OperationError {
    pub kind: &'static str,
    pub message: String,
}

impl<T> From<Result<T, WorkflowError>> for OperationResult<T> {
    fn from(result: Result<T, WorkflowError>) -> Self {
        match result {
            Ok(data) => Self {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(error) => Self {
                success: false,
                data: None,
                error: Some(OperationError {
                    kind: error.kind(),
                    message: error.to_string(),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_carries_data_only() {
        let result = OperationResult::from(Ok::<_, WorkflowError>(7));
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"success":true,"data":7}"#);
    }

    #[test]
    fn test_error_envelope_carries_kind_and_message() {
        let result: OperationResult<i32> =
            OperationResult::from(Err(WorkflowError::Capacity("the batch is full".to_owned())));
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"success":false,"error":{"kind":"capacity","message":"the batch is full"}}"#
        );
    }
}
