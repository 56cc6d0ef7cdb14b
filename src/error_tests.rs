//! Tests for error types

#[cfg(test)]
mod tests {
    use super::super::error::*;

    #[test]
    fn test_invalid_week_message() {
        let err = PredictorError::InvalidWeek(30);
        assert_eq!(err.to_string(), "Invalid week: 30. Must be between 1-22");
    }

    #[test]
    fn test_api_error_message() {
        let err = PredictorError::Api("ESPN returned 503".to_string());
        assert_eq!(err.to_string(), "API error: ESPN returned 503");
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: PredictorError = parse.unwrap_err().into();
        assert!(matches!(err, PredictorError::Json(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: PredictorError = io.into();
        assert!(err.to_string().starts_with("IO error"));
    }
}
