//! Eviction notices emitted by the session cache

use crate::codegen_type::CacheKey;
use moka::notification::RemovalCause;
use std::fmt;
use std::time::{Duration, Instant};

/// Why a session left the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvictionCause {
    /// Time-to-live since insertion elapsed
    ExpiredWrite,
    /// Time-to-idle since last read elapsed
    ExpiredAccess,
    /// Dropped to respect the capacity bound
    Size,
    /// Invalidated by a caller
    Explicit,
    /// Overwritten by a newer session for the same key
    Replaced,
}

impl EvictionCause {
    /// Lower-case name for logs
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExpiredWrite => "expired_write",
            Self::ExpiredAccess => "expired_access",
            Self::Size => "size",
            Self::Explicit => "explicit",
            Self::Replaced => "replaced",
        }
    }

    /// Map a cache removal to a cause.
    ///
    /// The cache reports a single "expired" cause, so the two deadlines are
    /// recomputed and the earlier one wins; a tie counts as write expiry.
    #[must_use]
    pub fn classify(
        cause: RemovalCause,
        inserted_at: Instant,
        last_access: Instant,
        time_to_live: Duration,
        time_to_idle: Duration,
    ) -> Self {
        match cause {
            RemovalCause::Expired => {
                let write_deadline = inserted_at + time_to_live;
                let idle_deadline = last_access + time_to_idle;
                if idle_deadline < write_deadline {
                    Self::ExpiredAccess
                } else {
                    Self::ExpiredWrite
                }
            }
            RemovalCause::Size => Self::Size,
            RemovalCause::Explicit => Self::Explicit,
            RemovalCause::Replaced => Self::Replaced,
        }
    }
}

impl fmt::Display for EvictionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One removal from the session cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictionNotice {
    /// Key of the removed session
    pub key: CacheKey,
    /// Why it was removed
    pub cause: EvictionCause,
}
