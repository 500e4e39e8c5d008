//! Venue type / capacity validation against the rule table

use crate::domain::venue::VenueType;
use crate::domain::DomainResult;
use crate::shared::errors::DomainError;

/// Accept `capacity` only if it lies within the bounds of `venue_type`.
pub fn validate_capacity(venue_type: VenueType, capacity: u32) -> DomainResult<()> {
    let rule = venue_type.rule();

    if rule.admits(capacity) {
        Ok(())
    } else {
        Err(DomainError::InvalidCapacity { capacity, rule })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(venue_type: VenueType, capacity: u32) -> bool {
        matches!(
            validate_capacity(venue_type, capacity),
            Err(DomainError::InvalidCapacity { .. })
        )
    }

    #[test]
    fn small_boundary() {
        assert!(validate_capacity(VenueType::Small, 50).is_ok());
        assert!(rejected(VenueType::Small, 51));
    }

    #[test]
    fn medium_boundary() {
        assert!(validate_capacity(VenueType::Medium, 200).is_ok());
        assert!(validate_capacity(VenueType::Medium, 10).is_ok());
        assert!(rejected(VenueType::Medium, 201));
    }

    #[test]
    fn large_boundary() {
        assert!(rejected(VenueType::Large, 200));
        assert!(validate_capacity(VenueType::Large, 201).is_ok());
        assert!(validate_capacity(VenueType::Large, 5_000).is_ok());
    }

    #[test]
    fn zero_capacity_is_never_valid() {
        for t in [VenueType::Small, VenueType::Medium, VenueType::Large] {
            assert!(rejected(t, 0));
        }
    }

    #[test]
    fn every_table_rule_admits_its_own_bounds() {
        use crate::domain::venue::CAPACITY_RULES;
        for rule in CAPACITY_RULES {
            assert!(validate_capacity(rule.venue_type, rule.min).is_ok());
            if let Some(max) = rule.max {
                assert!(rejected(rule.venue_type, max + 1));
            }
        }
    }

    #[test]
    fn error_carries_violated_rule() {
        let err = validate_capacity(VenueType::Small, 51).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidCapacity {
                capacity: 51,
                rule: VenueType::Small.rule(),
            }
        );
        assert_eq!(
            err.to_string(),
            "Invalid capacity 51: SMALL venues require capacity between 1 and 50"
        );
    }
}
