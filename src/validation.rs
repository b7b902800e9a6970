//! Required-field validation of parsed arguments

use thiserror::Error;

use crate::cli::Arguments;
use crate::schema::FieldDescriptor;

/// A required field is still unset after binding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("-{field} {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

/// Reports every required field left unset, in declaration order.
///
/// Never stops at the first failure; an empty result means `args` is usable.
pub fn validate(schema: &[FieldDescriptor], args: &Arguments) -> Vec<ValidationError> {
    schema
        .iter()
        .filter(|descriptor| descriptor.required && !descriptor.is_set(args))
        .map(|descriptor| ValidationError {
            field: descriptor.name.to_string(),
            message: descriptor.error.to_string(),
        })
        .collect()
}
