//! String inflection utilities for collection and field names.
//!
//! The ISBNdb service names its collections in lowercase plural form
//! (`books`, `categories`) but keys its response envelope with the
//! singular capitalized form (`BookList`, `CategoryData`), and mixes
//! `CamelCase` and `snake_case` field names freely. These helpers map
//! between the forms deterministically.
//!
//! The rules are intentionally minimal: they only need to round-trip the
//! vocabulary the service actually uses (`books` ↔ `Book`,
//! `categories` ↔ `Category`), not general English.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // A run of capitals followed by a capital+lowercase pair splits before
    // the final capital: "ISBNList" -> "ISBN_List".
    static ref ACRONYM_BOUNDARY: Regex = Regex::new(r"([A-Z\d]+)([A-Z][a-z])").unwrap();
    // A lowercase letter or digit followed by a capital: "TitleLong" -> "Title_Long".
    static ref CAMEL_BOUNDARY: Regex = Regex::new(r"([a-z\d])([A-Z])").unwrap();
}

/// Return the plural form of a collection word.
///
/// Words ending in `y` pluralize by replacing `y` with `ies`; words already
/// ending in `s` are returned unchanged; everything else appends `s`.
///
/// # Examples
///
/// ```
/// use isbndb::inflect::pluralize;
///
/// assert_eq!(pluralize("book"), "books");
/// assert_eq!(pluralize("category"), "categories");
/// assert_eq!(pluralize("authors"), "authors");
/// ```
#[must_use]
pub fn pluralize(word: &str) -> String {
    if word.ends_with('s') {
        word.to_string()
    } else if let Some(stem) = word.strip_suffix('y') {
        format!("{stem}ies")
    } else {
        format!("{word}s")
    }
}

/// Return the singular form of a collection word.
///
/// Inverse of [`pluralize`] for the `ies`/`s` cases; already-singular words
/// are returned unchanged.
///
/// # Examples
///
/// ```
/// use isbndb::inflect::singularize;
///
/// assert_eq!(singularize("books"), "book");
/// assert_eq!(singularize("categories"), "category");
/// assert_eq!(singularize("publisher"), "publisher");
/// ```
#[must_use]
pub fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        format!("{stem}y")
    } else if let Some(stem) = word.strip_suffix('s') {
        stem.to_string()
    } else {
        word.to_string()
    }
}

/// Uppercase the first ASCII character of a word.
#[must_use]
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Convert a `CamelCase` word to lowercase `snake_case`.
///
/// Handles acronym-then-capital boundaries as a separate rule, so
/// `ISBNList` becomes `isbn_list` rather than `i_s_b_n_list`.
/// Already-lowercase or already-underscored input passes through unchanged.
///
/// # Examples
///
/// ```
/// use isbndb::inflect::underscore;
///
/// assert_eq!(underscore("TitleLong"), "title_long");
/// assert_eq!(underscore("ISBNList"), "isbn_list");
/// assert_eq!(underscore("book_id"), "book_id");
/// ```
#[must_use]
pub fn underscore(word: &str) -> String {
    let step1 = ACRONYM_BOUNDARY.replace_all(word, "${1}_${2}");
    let step2 = CAMEL_BOUNDARY.replace_all(&step1, "${1}_${2}");
    step2.to_lowercase()
}

/// The capitalized singular form of a collection name, as used in the
/// response envelope: `books` -> `Book`, `categories` -> `Category`.
#[must_use]
pub fn envelope_name(collection: &str) -> String {
    capitalize(&singularize(collection))
}
