//! Core identifier and timestamp types.

use std::time::{SystemTime, UNIX_EPOCH};

pub type VfsUid = u32;
pub type VfsGid = u32;

/// Point in time as seconds and nanoseconds since the UNIX epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VfsTimespec {
    pub secs: i64,
    pub nanos: u32,
}

impl VfsTimespec {
    pub fn now() -> Self {
        Self::from(SystemTime::now())
    }

    pub fn as_nanos(&self) -> i128 {
        i128::from(self.secs) * 1_000_000_000 + i128::from(self.nanos)
    }
}

impl From<SystemTime> for VfsTimespec {
    fn from(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(dur) => Self {
                secs: dur.as_secs() as i64,
                nanos: dur.subsec_nanos(),
            },
            // Before the epoch: borrow a second so `nanos` stays positive.
            Err(err) => {
                let dur = err.duration();
                let mut secs = -(dur.as_secs() as i64);
                let mut nanos = dur.subsec_nanos();
                if nanos > 0 {
                    secs -= 1;
                    nanos = 1_000_000_000 - nanos;
                }
                Self { secs, nanos }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn pre_epoch_times_keep_positive_nanos() {
        let ts = VfsTimespec::from(UNIX_EPOCH - Duration::from_millis(1500));
        assert_eq!(
            ts,
            VfsTimespec {
                secs: -2,
                nanos: 500_000_000
            }
        );
        assert_eq!(ts.as_nanos(), -1_500_000_000);
    }
}
