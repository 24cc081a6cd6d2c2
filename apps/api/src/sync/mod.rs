// Profile synchronization: extracted experiences → durations → positions →
// the external profile store, best-effort per item.

pub mod duration;
pub mod handlers;
pub mod workflow;
