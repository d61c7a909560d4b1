//! Bounds checks for timestamps and untrusted string fields

use crate::error::{Error, Result};
use crate::limits::{MAX_TIMESTAMP, MIN_TIMESTAMP};

/// Reject timestamps before the epoch or after 2100
pub(crate) fn validate_timestamp_bounds(value: i64) -> Result<()> {
    if !(MIN_TIMESTAMP..=MAX_TIMESTAMP).contains(&value) {
        return Err(Error::TimestampOutOfBounds {
            value,
            min: MIN_TIMESTAMP,
            max: MAX_TIMESTAMP,
        });
    }
    Ok(())
}

/// Widen `timestamp` by `skew_seconds`, forward when `later` is set
pub(crate) fn apply_clock_skew(timestamp: i64, skew_seconds: u64, later: bool) -> Result<i64> {
    let skew = i64::try_from(skew_seconds).map_err(|_| Error::TimestampOverflow)?;
    if later {
        timestamp.checked_add(skew)
    } else {
        timestamp.checked_sub(skew)
    }
    .ok_or(Error::TimestampOverflow)
}

/// Reject header fields longer than `max` bytes
pub(crate) fn validate_header_field(field: &str, value: &str, max: usize) -> Result<()> {
    if value.len() > max {
        return Err(Error::HeaderFieldTooLong {
            field: field.into(),
            length: value.len(),
            max,
        });
    }
    Ok(())
}

/// Reject claim values longer than `max` bytes
pub(crate) fn validate_claim_length(claim: &str, value: &str, max: usize) -> Result<()> {
    if value.len() > max {
        return Err(Error::ClaimStringTooLong {
            claim: claim.into(),
            length: value.len(),
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_bounds() {
        assert!(validate_timestamp_bounds(0).is_ok());
        assert!(validate_timestamp_bounds(MAX_TIMESTAMP).is_ok());
        assert!(matches!(
            validate_timestamp_bounds(-1),
            Err(Error::TimestampOutOfBounds { value: -1, .. })
        ));
        assert!(validate_timestamp_bounds(MAX_TIMESTAMP + 1).is_err());
    }

    #[test]
    fn test_apply_clock_skew() {
        assert_eq!(apply_clock_skew(1000, 300, true), Ok(1300));
        assert_eq!(apply_clock_skew(1000, 300, false), Ok(700));
        assert_eq!(
            apply_clock_skew(i64::MAX, 1, true),
            Err(Error::TimestampOverflow)
        );
        assert_eq!(
            apply_clock_skew(0, u64::MAX, false),
            Err(Error::TimestampOverflow)
        );
    }

    #[test]
    fn test_field_lengths() {
        assert!(validate_header_field("kid", "abc", 3).is_ok());
        assert!(matches!(
            validate_header_field("kid", "abcd", 3),
            Err(Error::HeaderFieldTooLong { length: 4, max: 3, .. })
        ));
        assert!(matches!(
            validate_claim_length("sender", "abcd", 3),
            Err(Error::ClaimStringTooLong { claim, .. }) if claim == "sender"
        ));
    }
}
