//! Eligibility rule and forward scan over future block heights.

use crate::error::{LuckyMintError, Result};
use crate::lucky::time_format::TimestampFormatter;
use crate::types::{ChainSnapshot, LuckyMintEvent};
use tracing::{debug, instrument};

/// Whether `block_height` is a lucky mint for an address with `fingerprint`.
///
/// Eligible iff `(block_height + fingerprint) % threshold == 0`.
pub fn is_lucky_mint(fingerprint: u64, block_height: u64, threshold: u64) -> Result<bool> {
    if threshold == 0 {
        return Err(LuckyMintError::invalid("threshold should be greater than 0"));
    }
    Ok(eligible(fingerprint, block_height, threshold))
}

/// The rule itself; `threshold` must be non-zero.
fn eligible(fingerprint: u64, block_height: u64, threshold: u64) -> bool {
    // Reduced before adding so large heights cannot overflow
    let sum = (block_height % threshold) + (fingerprint % threshold);
    sum % threshold == 0
}

/// Lazy forward scan yielding lucky mint events after a snapshot.
///
/// Offsets start at 1 and advance by one block per step. Each event is
/// stamped `snapshot.timestamp + block_interval_seconds * offset`. The scan
/// stops after `limit` offsets when a limit is set, or at the first
/// arithmetic overflow (yielded as an error).
pub struct LuckyMintScan<'a> {
    fingerprint: u64,
    snapshot: ChainSnapshot,
    threshold: u64,
    block_interval_seconds: u64,
    formatter: &'a TimestampFormatter,
    offset: u64,
    limit: Option<u64>,
    done: bool,
}

impl<'a> LuckyMintScan<'a> {
    pub fn new(
        fingerprint: u64,
        snapshot: ChainSnapshot,
        threshold: u64,
        block_interval_seconds: u64,
        formatter: &'a TimestampFormatter,
    ) -> Result<Self> {
        if threshold == 0 {
            return Err(LuckyMintError::invalid("threshold should be greater than 0"));
        }
        if block_interval_seconds == 0 {
            return Err(LuckyMintError::invalid(
                "block interval should be greater than 0 seconds",
            ));
        }

        Ok(Self {
            fingerprint,
            snapshot,
            threshold,
            block_interval_seconds,
            formatter,
            offset: 0,
            limit: None,
            done: false,
        })
    }

    /// Stop after scanning `limit` heights past the snapshot.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Number of heights tested so far.
    pub fn scanned(&self) -> u64 {
        self.offset
    }

    fn event_at(&self, offset: u64, block_height: u64) -> Result<LuckyMintEvent> {
        let predicted_timestamp = self
            .block_interval_seconds
            .checked_mul(offset)
            .and_then(|delta| i64::try_from(delta).ok())
            .and_then(|delta| self.snapshot.timestamp.checked_add(delta))
            .ok_or_else(|| {
                LuckyMintError::invalid(format!("predicted timestamp overflows at offset {}", offset))
            })?;

        Ok(LuckyMintEvent {
            block_height,
            predicted_timestamp,
            timestamp_str: self.formatter.format(predicted_timestamp)?,
        })
    }
}

impl Iterator for LuckyMintScan<'_> {
    type Item = Result<LuckyMintEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            if self.limit.is_some_and(|limit| self.offset >= limit) {
                self.done = true;
                break;
            }
            self.offset += 1;

            let Some(block_height) = self.snapshot.height.checked_add(self.offset) else {
                self.done = true;
                return Some(Err(LuckyMintError::invalid(format!(
                    "block height overflows past {}",
                    self.snapshot.height
                ))));
            };

            // threshold was validated in new()
            if eligible(self.fingerprint, block_height, self.threshold) {
                let event = self.event_at(self.offset, block_height);
                if event.is_err() {
                    self.done = true;
                }
                return Some(event);
            }
        }
        None
    }
}

/// Find the next `n` lucky mint heights after `snapshot`.
///
/// Without `max_scan_offset` the scan is bounded by `n * threshold`, the
/// worst case for a correct input. With it, fewer than `n` matches within
/// that many heights fails with `ScanLimitExceeded`.
#[instrument(skip(formatter))]
pub fn next_n_lucky_mints(
    fingerprint: u64,
    n: usize,
    snapshot: ChainSnapshot,
    threshold: u64,
    block_interval_seconds: u64,
    max_scan_offset: Option<u64>,
    formatter: &TimestampFormatter,
) -> Result<Vec<LuckyMintEvent>> {
    if n == 0 {
        return Err(LuckyMintError::invalid("n should be greater than 0"));
    }

    let limit = max_scan_offset.unwrap_or_else(|| (n as u64).saturating_mul(threshold));
    let mut scan = LuckyMintScan::new(
        fingerprint,
        snapshot,
        threshold,
        block_interval_seconds,
        formatter,
    )?
    .with_limit(limit);

    let mut events = Vec::with_capacity(n);
    while events.len() < n {
        match scan.next() {
            Some(event) => events.push(event?),
            None => {
                return Err(LuckyMintError::ScanLimitExceeded {
                    limit,
                    found: events.len(),
                    wanted: n,
                })
            }
        }
    }

    debug!("found {} lucky mints in {} blocks", events.len(), scan.scanned());
    Ok(events)
}
