mod classify;
mod core;
mod fallback;

pub use self::classify::is_decommissioned_payload;
pub use self::core::*;
pub use self::fallback::*;
