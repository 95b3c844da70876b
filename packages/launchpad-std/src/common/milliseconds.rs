use cosmwasm_schema::cw_serde;
use cosmwasm_std::{BlockInfo, Timestamp};

#[cw_serde]
#[derive(Default, Eq, PartialOrd, Ord, Copy)]
/// Represents time in milliseconds.
pub struct Milliseconds(pub u64);

impl Milliseconds {
    #[inline]
    pub fn zero() -> Milliseconds {
        Milliseconds(0)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn from_seconds(seconds: u64) -> Milliseconds {
        if seconds > u64::MAX / 1000 {
            panic!("Overflow: Cannot convert seconds to milliseconds")
        }

        Milliseconds(seconds * 1000)
    }

    #[inline]
    pub fn from_nanos(nanos: u64) -> Milliseconds {
        Milliseconds(nanos / 1000000)
    }

    /// The block's current time in milliseconds.
    #[inline]
    pub fn from_block_time(block: &BlockInfo) -> Milliseconds {
        Milliseconds::from_nanos(block.time.nanos())
    }

    #[inline]
    pub fn milliseconds(&self) -> u64 {
        self.0
    }

    #[inline]
    pub fn seconds(&self) -> u64 {
        self.0 / 1000
    }

    #[inline]
    pub fn nanos(&self) -> u64 {
        if self.0 > u64::MAX / 1000000 {
            panic!("Overflow: Cannot convert milliseconds time to nanoseconds")
        }
        self.0 * 1000000
    }

    pub fn is_in_past(&self, block: &BlockInfo) -> bool {
        let now = Milliseconds::from_block_time(block);
        self.0 < now.0
    }
}

impl From<Milliseconds> for String {
    fn from(time: Milliseconds) -> String {
        time.0.to_string()
    }
}

impl From<Milliseconds> for Timestamp {
    fn from(time: Milliseconds) -> Timestamp {
        Timestamp::from_nanos(time.nanos())
    }
}

impl std::fmt::Display for Milliseconds {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
