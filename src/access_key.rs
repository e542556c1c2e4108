//! Ordered access-key management with a rotation cursor.
//!
//! The ISBNdb service throttles per access key, and rejects overloaded and
//! invalid keys with the same payload. [`AccessKeySet`] keeps an ordered
//! list of keys plus a cursor, so the client can walk forward through the
//! set on authorization failure and resume from wherever it stopped on the
//! next call.

use std::fmt;

/// An ordered set of API access keys with a rotation cursor.
///
/// The cursor is always either a valid index into the key list or one past
/// the end (the exhausted position). [`AccessKeySet::current`] returns
/// `None` when the set is empty or exhausted.
///
/// # Examples
///
/// ```
/// use isbndb::AccessKeySet;
///
/// let mut keys = AccessKeySet::new(["ABC123", "DEF456"]);
/// assert_eq!(keys.current(), Some("ABC123"));
/// assert_eq!(keys.advance(), Some("DEF456"));
/// assert_eq!(keys.advance(), None); // exhausted
/// assert_eq!(keys.advance(), None); // safe to call again
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessKeySet {
    keys: Vec<String>,
    cursor: usize,
}

impl AccessKeySet {
    /// Create a set from an ordered list of keys, cursor at the first key.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AccessKeySet {
            keys: keys.into_iter().map(Into::into).collect(),
            cursor: 0,
        }
    }

    /// Total number of keys in the set.
    #[must_use]
    pub fn size(&self) -> usize {
        self.keys.len()
    }

    /// `true` if the set holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The cursor position (one past the last index once exhausted).
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.cursor
    }

    /// The key at the cursor, or `None` if the set is empty or the cursor
    /// has advanced past the last key.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.keys.get(self.cursor).map(String::as_str)
    }

    /// Move the cursor forward by one and return the new current key.
    ///
    /// Once exhausted, further calls stay at the exhausted position and
    /// keep returning `None`.
    pub fn advance(&mut self) -> Option<&str> {
        if self.cursor < self.keys.len() {
            self.cursor += 1;
        }
        self.current()
    }

    /// The key after the cursor, without moving it.
    #[must_use]
    pub fn peek_next(&self) -> Option<&str> {
        self.keys.get(self.cursor + 1).map(String::as_str)
    }

    /// Move the cursor back by one and return the new current key.
    ///
    /// The cursor floors at the first key; retreating from index 0 is a
    /// no-op.
    pub fn retreat(&mut self) -> Option<&str> {
        self.cursor = self.cursor.saturating_sub(1);
        self.current()
    }

    /// The key before the cursor, without moving it.
    #[must_use]
    pub fn peek_prev(&self) -> Option<&str> {
        if self.cursor == 0 {
            return None;
        }
        self.keys.get(self.cursor - 1).map(String::as_str)
    }

    /// Jump the cursor to the given key, appending it first if it is not
    /// already in the set. Returns the now-current key.
    pub fn use_key(&mut self, key: &str) -> &str {
        match self.keys.iter().position(|k| k == key) {
            Some(index) => self.cursor = index,
            None => {
                self.keys.push(key.to_string());
                self.cursor = self.keys.len() - 1;
            }
        }
        &self.keys[self.cursor]
    }

    /// Remove the first occurrence of the given key; no-op if absent.
    ///
    /// The cursor position is preserved by index, not by value: removing a
    /// key before the cursor shifts which key the cursor now refers to.
    pub fn remove_key(&mut self, key: &str) {
        if let Some(index) = self.keys.iter().position(|k| k == key) {
            self.keys.remove(index);
        }
    }
}

// Key values are credentials; the display form only exposes the count.
impl fmt::Display for AccessKeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessKeySet({} keys, cursor at {})", self.keys.len(), self.cursor)
    }
}
