// The scoring side of the system: ranked champion recommendations for the
// acting slot, and post-pick composition analysis. Both are pure functions
// of a session snapshot plus read-only reference data.

pub mod composition;
pub mod recommend;
