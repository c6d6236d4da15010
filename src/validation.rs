use crate::constants::MAX_RULE_FIELD_LEN;
use crate::error::AppError;
use crate::models::CategoryRule;

/// Validate that a count or duration setting is non-zero.
pub fn validate_positive(field: &'static str, value: u64) -> Result<(), AppError> {
    if value == 0 {
        return Err(AppError::InvalidInput {
            field,
            reason: "must be positive".into(),
        });
    }
    Ok(())
}

/// Validate a user-supplied category rule.
pub fn validate_category_rule(rule: &CategoryRule) -> Result<(), AppError> {
    let check = |field: &'static str, value: &str| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidInput {
                field,
                reason: "cannot be empty".into(),
            });
        }
        if trimmed.len() > MAX_RULE_FIELD_LEN {
            return Err(AppError::InvalidInput {
                field,
                reason: format!("cannot exceed {MAX_RULE_FIELD_LEN} characters"),
            });
        }
        Ok(())
    };

    check("keyword", &rule.keyword)?;
    check("category", &rule.category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("tick_interval_ms", 500).is_ok());
        assert!(validate_positive("tick_interval_ms", 0).is_err());
    }

    #[test]
    fn test_validate_category_rule() {
        assert!(validate_category_rule(&CategoryRule::new("figma", "Design")).is_ok());
        assert!(validate_category_rule(&CategoryRule::new("  ", "Design")).is_err());
        assert!(validate_category_rule(&CategoryRule::new("figma", "")).is_err());

        let long = "x".repeat(MAX_RULE_FIELD_LEN + 1);
        let err = validate_category_rule(&CategoryRule::new(&long, "Design")).unwrap_err();
        assert!(err.to_string().contains("keyword"));
    }
}
