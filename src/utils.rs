use deunicode::deunicode;
use serde::Deserialize;

// Default limit for pagination
const DEFAULT_PAGE_LIMIT: u64 = 25;
// Max limit to prevent excessive requests
const MAX_PAGE_LIMIT: u64 = 100;

// Words per minute assumed when estimating read time
const READING_RATE_WPM: usize = 200;

/// Derives a URL-safe slug from a title.
///
/// Lowercases, folds diacritics to ASCII, drops everything outside
/// `[a-z0-9\s-]`, collapses whitespace and hyphen runs into single hyphens
/// and trims leading/trailing hyphens. Deterministic and idempotent. The
/// result may be empty (e.g. an all-symbol title); callers must treat an
/// empty slug as a validation failure.
pub fn slugify(input: &str) -> String {
    let folded = deunicode(input).to_lowercase();
    let mut slug = String::with_capacity(folded.len());
    let mut pending_hyphen = false;
    for ch in folded.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch);
            pending_hyphen = false;
        } else if ch.is_whitespace() || ch == '-' {
            pending_hyphen = true;
        }
    }
    slug
}

/// Estimates reading time in whole minutes from a word count at 200 wpm,
/// rounded up, never below one minute.
pub fn estimate_read_time(content: &str) -> i32 {
    let words = content.split_whitespace().count();
    let minutes = (words + READING_RATE_WPM - 1) / READING_RATE_WPM;
    minutes.max(1) as i32
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationParams {
    // Use serde default for both. Default for u64 is 0.
    #[serde(default)]
    limit: u64,
    #[serde(default)]
    offset: u64,
}

impl PaginationParams {
    pub fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }

    pub fn limit(&self) -> u64 {
        if self.limit == 0 {
            // If limit wasn't provided (or explicitly 0), use default
            DEFAULT_PAGE_LIMIT
        } else {
            // Enforce max limit and ensure it's at least 1
            self.limit.min(MAX_PAGE_LIMIT).max(1)
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            limit: 0,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic_title() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Hello   World  "), "hello-world");
    }

    #[test]
    fn slugify_strips_symbols_and_folds_diacritics() {
        assert_eq!(slugify("Crème Brûlée!"), "creme-brulee");
        assert_eq!(slugify("C++ & Rust: a comparison"), "c-rust-a-comparison");
        assert_eq!(slugify("100% Coverage?"), "100-coverage");
    }

    #[test]
    fn slugify_collapses_hyphen_runs() {
        assert_eq!(slugify("a -- b --- c"), "a-b-c");
        assert_eq!(slugify("--edge--"), "edge");
    }

    #[test]
    fn slugify_may_yield_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!! ???"), "");
    }

    #[test]
    fn slugify_is_idempotent() {
        for input in ["Hello World", "Crème Brûlée!", "a -- b", "already-a-slug"] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once);
        }
    }

    #[test]
    fn read_time_rounds_up_at_200_wpm() {
        assert_eq!(estimate_read_time(&"word ".repeat(250)), 2);
        assert_eq!(estimate_read_time(&"word ".repeat(200)), 1);
        assert_eq!(estimate_read_time(&"word ".repeat(201)), 2);
    }

    #[test]
    fn read_time_has_a_floor_of_one_minute() {
        assert_eq!(estimate_read_time("short"), 1);
        assert_eq!(estimate_read_time(""), 1);
    }

    #[test]
    fn pagination_defaults_and_caps() {
        let params = PaginationParams::default();
        assert_eq!(params.limit(), 25);
        assert_eq!(params.offset(), 0);

        let params = PaginationParams::new(500, 10);
        assert_eq!(params.limit(), 100);
        assert_eq!(params.offset(), 10);
    }
}
