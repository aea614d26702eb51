//! Edge cases and error handling
