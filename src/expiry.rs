//! Expiration input forms and the arithmetic that turns them into stamps.
//!
//! Every entry carries one absolute expiration stamp in cache-clock
//! milliseconds, with `0` reserved for "never expires". [`Expiry`] is the set
//! of input forms callers can supply; [`Expiry::resolve`] converts a form into
//! a stamp against the cache clock's current reading.
//!
//! ## Forms
//!
//! | Form             | Meaning                                               |
//! |------------------|-------------------------------------------------------|
//! | `Never`          | no expiration                                         |
//! | `Ttl(d)`         | relative; truncated to whole ms; 0 ms ⇒ no expiration |
//! | `AtMillis(t)`    | absolute on the cache clock; 0 ⇒ no expiration        |
//! | `At(instant)`    | absolute wall-clock; converted via a delta at insert  |
//!
//! Relative TTLs saturate: `now + ttl` is clamped to `u64::MAX`, which reads
//! as "effectively never" rather than wrapping into the past.
//!
//! Wall-clock instants are converted by reading the wall clock and the cache
//! clock back to back and carrying the delta over. The skew equal to the gap
//! between the two readings is inherent to the conversion. An instant at or
//! before the wall-clock "now" resolves to stamp `1`, i.e. already expired
//! for any future scan.

use std::time::{Duration, SystemTime};

/// When an entry should expire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// The entry never expires.
    Never,
    /// Relative time to live. Fractional milliseconds are truncated; a
    /// duration under one millisecond means no expiration.
    Ttl(Duration),
    /// Absolute stamp on the cache's own clock. `0` means no expiration.
    AtMillis(u64),
    /// Absolute wall-clock instant, converted to the cache clock at insert.
    At(SystemTime),
}

impl Expiry {
    /// Builds an `Expiry` from the raw `(ttl_ms, expires_at_ms)` pair.
    ///
    /// When both are non-zero the relative TTL takes priority over the
    /// absolute stamp; when both are zero the entry never expires.
    ///
    /// ```
    /// use std::time::Duration;
    /// use ttlkit::expiry::Expiry;
    ///
    /// assert_eq!(
    ///     Expiry::from_millis(2_000, 10_000),
    ///     Expiry::Ttl(Duration::from_millis(2_000)),
    /// );
    /// assert_eq!(Expiry::from_millis(0, 10_000), Expiry::AtMillis(10_000));
    /// assert_eq!(Expiry::from_millis(0, 0), Expiry::Never);
    /// ```
    pub fn from_millis(ttl_ms: u64, expires_at_ms: u64) -> Self {
        if ttl_ms > 0 {
            Expiry::Ttl(Duration::from_millis(ttl_ms))
        } else if expires_at_ms > 0 {
            Expiry::AtMillis(expires_at_ms)
        } else {
            Expiry::Never
        }
    }

    /// Resolves this form into an absolute stamp, given the cache clock's
    /// current reading. Returns `0` for "never expires".
    pub(crate) fn resolve(&self, now_ms: u64) -> u64 {
        match *self {
            Expiry::Never => 0,
            Expiry::Ttl(ttl) => {
                let ttl_ms = duration_to_millis(ttl);
                if ttl_ms == 0 {
                    0
                } else {
                    now_ms.saturating_add(ttl_ms)
                }
            }
            Expiry::AtMillis(stamp) => stamp,
            Expiry::At(target) => match target.duration_since(SystemTime::now()) {
                Ok(delta) => {
                    let delta_ms = duration_to_millis(delta);
                    if delta_ms == 0 {
                        1
                    } else {
                        now_ms.saturating_add(delta_ms)
                    }
                }
                // Target at or before wall-clock now: already expired.
                Err(_) => 1,
            },
        }
    }
}

/// Whole milliseconds of `d`, clamped to `u64::MAX`.
fn duration_to_millis(d: Duration) -> u64 {
    d.as_millis().min(u128::from(u64::MAX)) as u64
}

/// An entry with stamp `expires_at` is expired at time `t` iff the stamp is
/// set and has been reached.
#[inline]
pub(crate) fn is_expired(expires_at: u64, t: u64) -> bool {
    expires_at != 0 && expires_at <= t
}
