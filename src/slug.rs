//! URL slug generation for equipment titles.
//!
//! Titles are mostly Russian, so Cyrillic letters are transliterated through a
//! fixed table before everything outside `[a-z0-9-]` is squeezed into hyphens.

use std::future::Future;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::error::{AppError, AppResult};

/// Used when a title contains nothing that survives slugification
pub const FALLBACK_SLUG: &str = "equipment";

/// Width of the `equipment.slug` column
pub const MAX_SLUG_LEN: usize = 255;

static NON_SLUG_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9-]+").unwrap());
static HYPHEN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").unwrap());

/// Latin replacement for a lower-case Cyrillic letter
fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "c",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' => "",
        'ы' => "y",
        'ь' => "",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

/// Build the base slug for a title.
pub fn slugify(title: &str) -> String {
    slugify_or(title, FALLBACK_SLUG)
}

/// Like [`slugify`], with a caller-chosen replacement for empty results
pub fn slugify_or(title: &str, fallback: &str) -> String {
    let mut latin = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        match transliterate(c) {
            Some(s) => latin.push_str(s),
            None => latin.push(c),
        }
    }

    // "é" -> "e" + combining acute, then drop the mark
    let folded: String = latin.nfkd().filter(|c| !is_combining_mark(*c)).collect();

    let hyphenated = NON_SLUG_RUN.replace_all(&folded, "-");
    let collapsed = HYPHEN_RUN.replace_all(&hyphenated, "-");
    let slug = collapsed.trim_matches('-');

    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug.to_string()
    }
}

/// Cut `slug` to at most `max_len` bytes on a char boundary, without a trailing `-`
pub fn truncate(slug: &str, max_len: usize) -> &str {
    if slug.len() <= max_len {
        return slug;
    }
    let mut end = max_len;
    while !slug.is_char_boundary(end) {
        end -= 1;
    }
    slug[..end].trim_end_matches('-')
}

/// Base slug shortened so that every suffix up to `max_attempts` still fits the column
pub fn fit_base(base: &str, max_attempts: u32) -> &str {
    let largest = max_attempts.saturating_sub(1);
    let reserved = if largest == 0 { 0 } else { 1 + largest.to_string().len() };
    truncate(base, MAX_SLUG_LEN.saturating_sub(reserved))
}

/// Candidate number `attempt` for `base`: `base`, `base-1`, `base-2`, ...
pub fn candidate(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{}-{}", base, attempt)
    }
}

/// Try successive candidates until `try_store` accepts one.
///
/// `try_store` returns `Ok(None)` when the candidate collides with an existing
/// slug (unique index violation) and `Ok(Some(_))` once the write succeeded.
/// Gives up with a conflict after `max_attempts` candidates.
pub async fn resolve_unique<T, F, Fut>(base: &str, max_attempts: u32, mut try_store: F) -> AppResult<T>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = AppResult<Option<T>>>,
{
    let base = fit_base(base, max_attempts);
    for attempt in 0..max_attempts {
        let slug = candidate(base, attempt);
        match try_store(slug.clone()).await? {
            Some(stored) => return Ok(stored),
            None => tracing::debug!(slug = %slug, attempt, "slug taken, trying next candidate"),
        }
    }

    Err(AppError::Conflict(format!(
        "Could not find a free slug for '{}' after {} attempts",
        base, max_attempts
    )))
}
