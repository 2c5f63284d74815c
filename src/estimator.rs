//! Block height estimation from a known (height, time) reference point.

use crate::error::{LuckyMintError, Result};
use chrono::NaiveDateTime;

/// Date-time format accepted by [`estimate_height_at_datetime`].
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Estimate the block height at `target_time`, assuming one block every
/// `seconds_per_block` seconds since `known_time`.
///
/// The result may be fractional, and negative for targets before genesis.
pub fn estimate_height_at(
    known_height: u64,
    known_time: i64,
    target_time: i64,
    seconds_per_block: f64,
) -> Result<f64> {
    if !seconds_per_block.is_finite() || seconds_per_block <= 0.0 {
        return Err(LuckyMintError::invalid(format!(
            "seconds per block should be greater than 0, got {}",
            seconds_per_block
        )));
    }

    // In f64 so distant timestamps cannot overflow
    let elapsed = known_time as f64 - target_time as f64;
    Ok(known_height as f64 - elapsed / seconds_per_block)
}

/// Same as [`estimate_height_at`] with both times given as
/// `"%Y-%m-%d %H:%M:%S"` strings in the same (unspecified) zone.
pub fn estimate_height_at_datetime(
    known_height: u64,
    known_time: &str,
    target_time: &str,
    seconds_per_block: f64,
) -> Result<f64> {
    let known = parse_datetime(known_time)?;
    let target = parse_datetime(target_time)?;

    estimate_height_at(
        known_height,
        known.and_utc().timestamp(),
        target.and_utc().timestamp(),
        seconds_per_block,
    )
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), DATETIME_FORMAT)
        .map_err(|e| LuckyMintError::invalid(format!("bad date time {:?}: {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_estimate() {
        // 10 blocks of 12s before the known point
        let height = estimate_height_at(1000, 1_700_000_120, 1_700_000_000, 12.0).unwrap();
        assert_eq!(height, 990.0);

        // Targets after the known point extrapolate forward
        let height = estimate_height_at(1000, 1_700_000_000, 1_700_000_006, 12.0).unwrap();
        assert_eq!(height, 1000.5);
    }

    #[test]
    fn test_may_go_negative() {
        let height = estimate_height_at(5, 1200, 0, 60.0).unwrap();
        assert_eq!(height, -15.0);
    }

    #[test]
    fn test_extreme_timestamps() {
        let height = estimate_height_at(0, i64::MAX, -1, 12.0).unwrap();
        assert!(height.is_finite());
        assert!(height < -7.6e17);

        let height = estimate_height_at(0, i64::MIN, i64::MAX, 1.0).unwrap();
        assert!(height > 1.8e19);
    }

    #[test]
    fn test_rejects_bad_interval() {
        assert!(estimate_height_at(1, 0, 0, 0.0).is_err());
        assert!(estimate_height_at(1, 0, 0, -12.0).is_err());
        assert!(estimate_height_at(1, 0, 0, f64::NAN).is_err());
    }

    #[test]
    fn test_datetime_reference_values() {
        // 2024-01-02 17:35:42 minus 2023-12-19 13:38:00 = 1_223_862 seconds
        let height = estimate_height_at_datetime(
            18_918_830,
            "2024-01-02 17:35:42",
            "2023-12-19 13:38:00",
            12.0,
        )
        .unwrap();
        assert!((height - (18_918_830.0 - 1_223_862.0 / 12.0)).abs() < 1e-6);
    }

    #[test]
    fn test_datetime_bad_format() {
        let err = estimate_height_at_datetime(1, "2024/01/02", "2023-12-19 13:38:00", 12.0)
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
