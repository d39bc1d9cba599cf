//! CLI Exit Code Registry
//!
//! Single source of truth for `sqsum` exit codes. Exit codes are part
//! of the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                          |
//! |------|--------------------------------------------------|
//! | 0    | Success                                          |
//! | 2    | Usage or puzzle validation error                 |
//! | 10   | Network failure reaching the solver service      |
//! | 11   | Service rejected the request (non-2xx)           |
//! | 12   | Counting job reached a terminal `failed` state   |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, or puzzle input failed validation.
pub const EXIT_USAGE: u8 = 2;

/// Transport-level failure (connect, timeout, decode).
pub const EXIT_NETWORK: u8 = 10;

/// The service answered with an error response.
pub const EXIT_SERVICE: u8 = 11;

/// A watched counting job terminated as `failed`.
pub const EXIT_JOB_FAILED: u8 = 12;
