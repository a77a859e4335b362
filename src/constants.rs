// src/constants.rs
//
// Application-wide constants shared by the client, the cache and the CLI.

/// Notes service used when no config file or `--base-url` names another one.
pub const DEFAULT_BASE_URL: &str = "https://mockapi.io/clone/684ed48bf0c9c9848d293c42/api/v1";

/// Resource path under the base URL, also the root segment of every cache key.
pub const NOTES_RESOURCE: &str = "notes";

pub const FIRST_PAGE: u32 = 1;

pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Form rule: minimum title length in characters.
pub const TITLE_MIN_CHARS: usize = 2;

/// Form rule: minimum content length in characters.
pub const CONTENT_MIN_CHARS: usize = 5;

/// How long a paged list result counts as fresh.
///
/// Zero means every read after a completed load goes back to the server;
/// concurrent reads still share one request.
pub const LIST_STALE_TIME_SECS: u64 = 0;

/// Minimum interval between refetches of an infinite list.
pub const INFINITE_STALE_TIME_SECS: u64 = 30;

/// Idle time after which an unobserved cache entry is evicted.
pub const CACHE_GC_TIME_SECS: u64 = 5 * 60;

/// Width of the content preview in list output.
pub const PREVIEW_WIDTH: usize = 60;
