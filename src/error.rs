use std::collections::BTreeMap;
use std::fmt;

use sea_orm::DbErr;
use serde::Serialize;

/// Field name -> messages, the shape every 400 response body takes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), CinemaError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CinemaError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CinemaError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("{field} references missing ids: {ids:?}")]
    ReferenceNotFound { field: &'static str, ids: Vec<i64> },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("{entity} with this {field} already exists")]
    UniquenessViolation {
        entity: &'static str,
        field: &'static str,
    },
    #[error("Store error: {0}")]
    Store(#[from] DbErr),
}

impl CinemaError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Field-keyed messages for errors that belong to the request payload.
    pub fn field_errors(&self) -> Option<ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors.clone()),
            Self::ReferenceNotFound { field, ids } => {
                let mut errors = ValidationErrors::new();
                for id in ids {
                    errors.add(field, format!("Invalid pk \"{id}\" - object does not exist."));
                }
                Some(errors)
            }
            Self::UniquenessViolation { entity, field } => {
                let mut errors = ValidationErrors::new();
                errors.add(field, format!("{entity} with this {field} already exists."));
                Some(errors)
            }
            Self::NotFound { .. } | Self::Store(_) => None,
        }
    }
}

pub type CinemaResult<T> = Result<T, CinemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_collect_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "This field is required.");
        errors.add("duration", "A valid integer is required.");
        errors.add("duration", "Ensure this value is greater than or equal to 0.");

        assert_eq!(errors.field("duration").map(|m| m.len()), Some(2));
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({
                "duration": [
                    "A valid integer is required.",
                    "Ensure this value is greater than or equal to 0."
                ],
                "title": ["This field is required."]
            })
        );
    }

    #[test]
    fn test_empty_validation_errors_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_reference_not_found_field_errors() {
        let err = CinemaError::ReferenceNotFound {
            field: "actors",
            ids: vec![7, 9],
        };
        let errors = err.field_errors().unwrap();
        assert_eq!(
            errors.field("actors").unwrap(),
            [
                "Invalid pk \"7\" - object does not exist.".to_string(),
                "Invalid pk \"9\" - object does not exist.".to_string(),
            ]
        );
    }

    #[test]
    fn test_not_found_has_no_field_errors() {
        assert!(CinemaError::not_found("movie", 3).field_errors().is_none());
    }
}
