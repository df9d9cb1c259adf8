//! Shared constants for end-to-end tests
//!
//! When the songs known to the fake metadata service change, update only this file.

// ============================================================================
// Songs known to the fake metadata service
// ============================================================================

pub const MUSE: &str = "Muse";

pub const SUPERMASSIVE_BLACK_HOLE: &str = "Supermassive Black Hole";

/// Release date as the metadata service formats it
pub const SUPERMASSIVE_RELEASE_DATE: &str = "16.07.2006";

/// Release date as the catalog serializes it
pub const SUPERMASSIVE_RELEASE_DATE_ISO: &str = "2006-07-16";

pub const SUPERMASSIVE_TEXT: &str = "Ooh baby, don't you know I suffer?\nOoh baby, can you hear me moan?\n\nYou caught me under false pretenses\nHow long before you let me go?\n\nOoh\nYou set my soul alight\n\nOoh\nYou set my soul alight\n\nGlaciers melting in the dead of night\nAnd the superstars sucked into the supermassive";

/// Number of verses in [`SUPERMASSIVE_TEXT`]
pub const SUPERMASSIVE_VERSES: usize = 5;

pub const SUPERMASSIVE_LINK: &str = "https://www.youtube.com/watch?v=Xsp3_a-PMTw";

pub const UPRISING: &str = "Uprising";

pub const UPRISING_RELEASE_DATE: &str = "07.09.2009";

pub const UPRISING_TEXT: &str = "Paranoia is in bloom\n\nThe PR transmissions will resume";

pub const UPRISING_LINK: &str = "https://www.youtube.com/watch?v=w8KQmps-Sog";

pub const QUEEN: &str = "Queen";

pub const BOHEMIAN_RHAPSODY: &str = "Bohemian Rhapsody";

pub const BOHEMIAN_RHAPSODY_RELEASE_DATE: &str = "31.10.1975";

pub const BOHEMIAN_RHAPSODY_TEXT: &str = "Is this the real life?\nIs this just fantasy?";

pub const BOHEMIAN_RHAPSODY_LINK: &str = "https://www.youtube.com/watch?v=fJ9rUzIMcZQ";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;

/// Metadata lookup timeout of the server under test (seconds)
pub const METADATA_TIMEOUT_SECS: u64 = 5;
