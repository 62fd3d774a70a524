// User profile API: storage seam and the authenticated profile handlers.

pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod store;
