use crate::claims::ClaimSet;
use crate::error::{Error, Result};
use crate::limits::MAX_CLOCK_SKEW_SECONDS;
use crate::utils::bounds::apply_clock_skew;
use std::time::{SystemTime, UNIX_EPOCH};

/// Current Unix time in seconds
pub(crate) fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Validity window checks on `exp`, `nbf` and `iat`
///
/// A token is current when `now < exp` and neither `nbf` nor `iat` lies in
/// the future. The clock skew widens each bound by the same amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemporalValidation {
    clock_skew: u64,
}

impl TemporalValidation {
    /// Window with no skew
    pub fn new() -> Self {
        Self::default()
    }

    /// Tolerate clocks that disagree by up to `seconds` (at most 300)
    pub fn with_clock_skew(seconds: u64) -> Result<Self> {
        if seconds > MAX_CLOCK_SKEW_SECONDS {
            return Err(Error::ConfigurationInvalid(format!(
                "clock skew {seconds}s exceeds maximum of {MAX_CLOCK_SKEW_SECONDS}s"
            )));
        }
        Ok(Self {
            clock_skew: seconds,
        })
    }

    pub fn clock_skew(&self) -> u64 {
        self.clock_skew
    }

    pub fn check(&self, claims: &ClaimSet, now: i64) -> Result<()> {
        let skew = self.clock_skew;

        let exp = claims.expiration()?;
        if now >= apply_clock_skew(exp, skew, true) {
            return Err(Error::TokenExpired {
                expired_at: exp,
                now,
                skew,
            });
        }

        let latest_start = apply_clock_skew(now, skew, true);

        if let Some(nbf) = claims.not_before()? {
            if nbf > latest_start {
                return Err(Error::TokenNotYetValid {
                    not_before: nbf,
                    now,
                    skew,
                });
            }
        }

        // A token issued in the future cannot be valid yet either
        if let Some(iat) = claims.issued_at()? {
            if iat > latest_start {
                return Err(Error::TokenNotYetValid {
                    not_before: iat,
                    now,
                    skew,
                });
            }
        }

        Ok(())
    }
}
