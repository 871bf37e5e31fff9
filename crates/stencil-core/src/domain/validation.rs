use crate::domain::{
    entities::{ParameterDeclaration, ParameterSet},
    error::DomainError,
};

/// Centralized domain validation.
pub struct DomainValidator;

impl DomainValidator {
    /// A chain must name at least one template, and no identifier may be blank.
    pub fn validate_chain(identifiers: &[String]) -> Result<(), DomainError> {
        if identifiers.is_empty() {
            return Err(DomainError::EmptyChain);
        }
        for identifier in identifiers {
            Self::validate_identifier(identifier)?;
        }
        Ok(())
    }

    pub fn validate_identifier(identifier: &str) -> Result<(), DomainError> {
        if identifier.trim().is_empty() {
            return Err(DomainError::InvalidIdentifier {
                identifier: identifier.to_string(),
                reason: "identifier is empty".into(),
            });
        }
        if identifier.contains('\0') {
            return Err(DomainError::InvalidIdentifier {
                identifier: identifier.escape_default().to_string(),
                reason: "identifier contains a NUL byte".into(),
            });
        }
        Ok(())
    }

    /// Every declared key must map to a non-empty value before rendering.
    pub fn validate_resolved(
        declarations: &[ParameterDeclaration],
        parameters: &ParameterSet,
    ) -> Result<(), DomainError> {
        for declaration in declarations {
            match parameters.get(declaration.key()) {
                Some(value) if !value.is_empty() => {}
                _ => {
                    return Err(DomainError::UnresolvedParameter {
                        key: declaration.key().to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
