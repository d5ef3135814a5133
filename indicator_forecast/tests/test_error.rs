use indicator_forecast::error::ForecastError;
use series_math::MathError;
use std::io;

#[test]
fn test_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    assert!(matches!(ForecastError::from(io_error), ForecastError::IoError(_)));

    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(matches!(
        ForecastError::from(json_error),
        ForecastError::SerializationError(_)
    ));

    let singular = MathError::CalculationError("Matrix is singular".to_string());
    assert!(matches!(ForecastError::from(singular), ForecastError::FitFailed(_)));

    let bad_window = MathError::InvalidInput("Period must be greater than zero".to_string());
    assert!(matches!(
        ForecastError::from(bad_window),
        ForecastError::InvalidParameter(_)
    ));
}

#[test]
fn test_error_display() {
    let error = ForecastError::InsufficientHistory {
        required: 24,
        actual: 10,
    };
    let text = error.to_string();
    assert!(text.contains("24"));
    assert!(text.contains("10"));
    assert!(error.is_insufficient_history());

    let error = ForecastError::UndefinedVariation { points: 1 };
    assert!(error.to_string().contains("1 point"));
    assert!(!error.is_insufficient_history());

    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let text = ForecastError::from(io_error).to_string();
    assert!(text.contains("IO error"));
    assert!(text.contains("permission denied"));
}
