//! Conversions from external infrastructure errors into domain errors.

use std::io::{Error as IoError, ErrorKind};

use famcal_domain::FamcalError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub FamcalError);

impl From<InfraError> for FamcalError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<FamcalError> for InfraError {
    fn from(value: FamcalError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoFamcalError {
    fn into_famcal(self) -> FamcalError;
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → FamcalError */
/* -------------------------------------------------------------------------- */

impl IntoFamcalError for IoError {
    fn into_famcal(self) -> FamcalError {
        match self.kind() {
            ErrorKind::NotFound => FamcalError::NotFound(format!("file not found: {self}")),
            ErrorKind::PermissionDenied => {
                FamcalError::Storage(format!("permission denied: {self}"))
            }
            _ => FamcalError::Storage(self.to_string()),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_famcal())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → FamcalError */
/* -------------------------------------------------------------------------- */

impl IntoFamcalError for JsonError {
    fn into_famcal(self) -> FamcalError {
        if self.is_io() {
            return FamcalError::Storage(format!("JSON I/O failure: {self}"));
        }
        FamcalError::Internal(format!("invalid JSON: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_famcal())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → FamcalError */
/* -------------------------------------------------------------------------- */

impl IntoFamcalError for HttpError {
    fn into_famcal(self) -> FamcalError {
        if self.is_timeout() {
            return FamcalError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return FamcalError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return FamcalError::Network(format!("failed to decode HTTP response: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => FamcalError::Auth(message),
                404 => FamcalError::NotFound(message),
                429 => FamcalError::Network(message),
                400..=499 => FamcalError::InvalidInput(message),
                _ => FamcalError::Network(message),
            };
        }

        FamcalError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_famcal())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn missing_file_maps_to_not_found() {
        let err = IoError::new(ErrorKind::NotFound, "history.json");
        let mapped: FamcalError = InfraError::from(err).into();
        assert!(matches!(mapped, FamcalError::NotFound(_)));
    }

    #[test]
    fn other_io_errors_map_to_storage() {
        let err = IoError::new(ErrorKind::Other, "disk full");
        let mapped: FamcalError = InfraError::from(err).into();
        match mapped {
            FamcalError::Storage(msg) => assert!(msg.contains("disk full")),
            other => panic!("expected storage error, got {:?}", other),
        }
    }

    #[test]
    fn syntax_errors_map_to_internal() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let mapped: FamcalError = InfraError::from(err).into();
        assert!(matches!(mapped, FamcalError::Internal(_)));
    }

    #[tokio::test]
    async fn http_status_401_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: FamcalError = InfraError::from(error).into();
        match mapped {
            FamcalError::Auth(msg) => assert!(msg.contains("401")),
            other => panic!("expected auth error, got {:?}", other),
        }
    }
}
