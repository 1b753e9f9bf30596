pub mod key;
pub mod raw;
pub mod record;

pub use key::IdentityKey;
pub use raw::{MemorySource, RawRow, RawSource};
pub use record::{RadioType, Record};
