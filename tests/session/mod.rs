//! Session tests
//!
//! The `NoProject -> Indexed <-> Filtered` state machine driven through
//! host notifications, and sessions sharing one store.
