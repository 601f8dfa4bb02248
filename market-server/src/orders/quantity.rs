//! Quantity Validator
//!
//! Cap enforcement over a fully resolved cart. Validation runs to
//! completion before any write happens, so a late quantity violation can
//! never leave a partially written order. Any single violation aborts the
//! whole operation with an error naming the offending id, kind and limit.

use shared::error::{AppError, ErrorCode};
use shared::types::ModifierKind;

/// Requested quantity and resolved cap for one cart line
#[derive(Debug, Clone)]
pub struct LineQuantity {
    pub item_id: i64,
    pub requested: i64,
    pub cap: Option<i64>,
    pub modifiers: Vec<ModifierQuantity>,
}

/// Requested quantity and resolved cap for one modifier
#[derive(Debug, Clone)]
pub struct ModifierQuantity {
    pub selection_id: i64,
    pub kind: ModifierKind,
    pub requested: i64,
    pub cap: Option<i64>,
}

/// Check every line and modifier against its cap; a null cap means
/// unlimited.
pub fn validate_quantities(lines: &[LineQuantity]) -> Result<(), AppError> {
    for line in lines {
        if let Some(cap) = line.cap
            && line.requested > cap
        {
            return Err(AppError::with_message(
                ErrorCode::QuantityExceedsCap,
                format!(
                    "Quantity {} for item {} exceeds the maximum of {}",
                    line.requested, line.item_id, cap
                ),
            )
            .with_detail("item_id", line.item_id)
            .with_detail("requested", line.requested)
            .with_detail("max_quantity", cap));
        }
        for modifier in &line.modifiers {
            if let Some(cap) = modifier.cap
                && modifier.requested > cap
            {
                return Err(AppError::with_message(
                    ErrorCode::QuantityExceedsCap,
                    format!(
                        "Quantity {} for {} {} exceeds the maximum of {}",
                        modifier.requested, modifier.kind, modifier.selection_id, cap
                    ),
                )
                .with_detail("selection_id", modifier.selection_id)
                .with_detail("kind", modifier.kind.as_str())
                .with_detail("requested", modifier.requested)
                .with_detail("max_quantity", cap));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_line(item_id: i64, requested: i64, cap: Option<i64>) -> LineQuantity {
        LineQuantity {
            item_id,
            requested,
            cap,
            modifiers: vec![],
        }
    }

    #[test]
    fn quantities_at_the_cap_pass() {
        let lines = [bare_line(7, 3, Some(3)), bare_line(8, 1, Some(1))];
        assert!(validate_quantities(&lines).is_ok());
    }

    #[test]
    fn missing_cap_means_unlimited() {
        let lines = [bare_line(7, 9999, None)];
        assert!(validate_quantities(&lines).is_ok());
    }

    #[test]
    fn over_cap_names_the_item_and_limit() {
        let lines = [bare_line(7, 5, Some(3))];
        let err = validate_quantities(&lines).unwrap_err();
        assert_eq!(err.code, ErrorCode::QuantityExceedsCap);
        assert!(err.message.contains("item 7"));
        assert!(err.message.contains('3'));

        let details = err.details.unwrap();
        assert_eq!(details.get("item_id").unwrap(), 7);
        assert_eq!(details.get("max_quantity").unwrap(), 3);
    }

    #[test]
    fn modifier_over_cap_names_kind_and_limit() {
        let lines = [LineQuantity {
            item_id: 7,
            requested: 1,
            cap: None,
            modifiers: vec![ModifierQuantity {
                selection_id: 3,
                kind: ModifierKind::Side,
                requested: 4,
                cap: Some(2),
            }],
        }];
        let err = validate_quantities(&lines).unwrap_err();
        assert_eq!(err.code, ErrorCode::QuantityExceedsCap);
        assert!(err.message.contains("side 3"));
        assert!(err.message.contains('2'));

        let details = err.details.unwrap();
        assert_eq!(details.get("selection_id").unwrap(), 3);
        assert_eq!(details.get("kind").unwrap(), "side");
    }

    #[test]
    fn later_lines_are_still_checked() {
        let lines = [bare_line(1, 1, Some(5)), bare_line(2, 10, Some(5))];
        let err = validate_quantities(&lines).unwrap_err();
        assert!(err.message.contains("item 2"));
    }
}
