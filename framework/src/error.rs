//! Errors and their HTTP mapping
//!
//! Everything funnels into [`FrameworkError`], which renders as
//! `{"detail": ...}` (or the validation shape for 422s).

use std::collections::BTreeMap;
use thiserror::Error;

/// An error that knows its HTTP status
///
/// `#[domain_error]` implements this; hand-written errors can too.
pub trait HttpError: std::error::Error + Send + Sync + 'static {
    fn status_code(&self) -> u16 {
        500
    }

    fn error_message(&self) -> String {
        self.to_string()
    }
}

/// Ad-hoc error with a status, for cases not worth a dedicated type
///
/// ```rust,ignore
/// return Err(AppError::bad_request("Unsupported range").into());
/// ```
#[derive(Debug, Clone)]
pub struct AppError {
    message: String,
    status_code: u16,
}

impl AppError {
    /// A 500 until [`AppError::status`] says otherwise
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: 500,
        }
    }

    pub fn status(mut self, code: u16) -> Self {
        self.status_code = code;
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message).status(404)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message).status(400)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AppError {}

impl HttpError for AppError {
    fn status_code(&self) -> u16 {
        self.status_code
    }
}

impl From<AppError> for FrameworkError {
    fn from(e: AppError) -> Self {
        FrameworkError::Domain {
            message: e.message,
            status_code: e.status_code,
        }
    }
}

/// Field-level validation errors
///
/// Serialized as:
///
/// ```json
/// {
///     "message": "The given data was invalid.",
///     "errors": {
///         "email": ["The email field must be a valid email address."]
///     }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    /// Map of field names to their validation error messages
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Create a new empty ValidationErrors
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error for a specific field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert from validator crate's ValidationErrors
    pub fn from_validator(errors: validator::ValidationErrors) -> Self {
        let mut result = Self::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Validation failed for field '{}'", field));
                result.add(field.to_string(), message);
            }
        }
        result
    }

    /// Convert to JSON Value for response
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "message": "The given data was invalid.",
            "errors": self.errors
        })
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Validation failed: {:?}", self.errors)
    }
}

impl std::error::Error for ValidationErrors {}

/// Framework-wide error type
///
/// Every variant maps to an HTTP status through [`FrameworkError::status_code`],
/// and `HttpResponse` implements `From<FrameworkError>`, so handlers can
/// propagate with `?`:
///
/// ```rust,ignore
/// pub async fn show(req: Request) -> Response {
///     let db = DB::connection()?;
///     let workflow = workflows::Entity::find_by_id(id).one(db.inner()).await?;
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Error)]
pub enum FrameworkError {
    /// Service not found in the dependency injection container
    #[error("Service '{type_name}' not registered in container")]
    ServiceNotFound {
        /// The type name of the service that was not found
        type_name: &'static str,
    },

    /// Parameter extraction failed (missing or invalid parameter)
    #[error("Missing required parameter: {param_name}")]
    ParamError {
        /// The name of the parameter that failed extraction
        param_name: String,
    },

    /// Single-field validation error
    #[error("Validation error for '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// The validation error message
        message: String,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Generic internal server error
    #[error("Internal server error: {message}")]
    Internal {
        /// The error message
        message: String,
    },

    /// Domain/application error with custom status code
    #[error("{message}")]
    Domain {
        /// The error message
        message: String,
        /// HTTP status code
        status_code: u16,
    },

    /// Form validation errors (422 Unprocessable Entity)
    #[error("Validation failed")]
    Validation(ValidationErrors),

    /// Authorization failed (403 Forbidden)
    ///
    /// Used when FormRequest::authorize() returns false.
    #[error("This action is unauthorized.")]
    Unauthorized,

    /// Request body could not be decoded (422)
    #[error("{0}")]
    InvalidBody(String),

    /// Request body exceeded the configured limit (413)
    #[error("Request body exceeds the limit of {limit} bytes")]
    PayloadTooLarge {
        /// Configured maximum body size in bytes
        limit: usize,
    },

    /// Parameter parse error (400 Bad Request)
    #[error("Invalid parameter '{param}': expected {expected_type}")]
    ParamParse {
        /// The parameter value that failed to parse
        param: String,
        /// The expected type (e.g., "i32", "uuid")
        expected_type: &'static str,
    },
}

impl FrameworkError {
    /// Create a ServiceNotFound error for a given type
    pub fn service_not_found<T: ?Sized>() -> Self {
        Self::ServiceNotFound {
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Create a ParamError for a missing parameter
    pub fn param(name: impl Into<String>) -> Self {
        Self::ParamError {
            param_name: name.into(),
        }
    }

    /// Create a ValidationError
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a DatabaseError
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a Domain error with custom status code
    pub fn domain(message: impl Into<String>, status_code: u16) -> Self {
        Self::Domain {
            message: message.into(),
            status_code,
        }
    }

    /// Create an InvalidBody error
    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::InvalidBody(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ServiceNotFound { .. } => 500,
            Self::ParamError { .. } => 400,
            Self::ValidationError { .. } => 422,
            Self::Database(_) => 500,
            Self::Internal { .. } => 500,
            Self::Domain { status_code, .. } => *status_code,
            Self::Validation(_) => 422,
            Self::Unauthorized => 403,
            Self::InvalidBody(_) => 422,
            Self::PayloadTooLarge { .. } => 413,
            Self::ParamParse { .. } => 400,
        }
    }

    /// Create a Validation error from ValidationErrors struct
    pub fn validation_errors(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }

    /// Create a ParamParse error (400)
    pub fn param_parse(param: impl Into<String>, expected_type: &'static str) -> Self {
        Self::ParamParse {
            param: param.into(),
            expected_type,
        }
    }

    /// JSON body for this error
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Validation(errors) => errors.to_json(),
            Self::ValidationError { field, message } => {
                let mut errors = ValidationErrors::new();
                errors.add(field.clone(), message.clone());
                errors.to_json()
            }
            _ => serde_json::json!({ "detail": self.to_string() }),
        }
    }
}

impl From<sea_orm::DbErr> for FrameworkError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_app_error_keeps_status() {
        let err: FrameworkError = AppError::bad_request("No update data provided").into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.to_json(),
            serde_json::json!({ "detail": "No update data provided" })
        );
    }

    #[test]
    fn test_validation_errors_shape() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "invalid");
        errors.add("email", "taken");
        let err = FrameworkError::validation_errors(errors);

        assert_eq!(err.status_code(), 422);
        assert_eq!(
            err.to_json(),
            serde_json::json!({
                "message": "The given data was invalid.",
                "errors": { "email": ["invalid", "taken"] }
            })
        );
    }

    #[test]
    fn test_single_field_validation_uses_same_shape() {
        let err = FrameworkError::validation("range", "must be one of 24h, 7d, 30d, 90d");
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.to_json()["errors"]["range"][0], "must be one of 24h, 7d, 30d, 90d");
    }

    #[test]
    fn test_payload_too_large_status() {
        let err = FrameworkError::PayloadTooLarge { limit: 16 };
        assert_eq!(err.status_code(), 413);
    }
}
