//! Convention-based finder calls.
//!
//! A finder is a call name of the shape
//! `find_<collection>_by_<field>[_and_<field>...]`, e.g.
//! `find_book_by_isbn` or `find_books_by_title_and_author`. The collection
//! part may be singular or plural; the field list pairs positionally with
//! the supplied argument values.
//!
//! Rather than dispatching on arbitrary names, the grammar is an explicit
//! parser: [`FinderCall::parse`] returns `None` for names that do not match
//! the shape at all (the caller decides how to surface an unknown
//! operation), while a matching name with the wrong number of arguments
//! fails with [`IsbndbError::InvalidQuery`].

use crate::error::{IsbndbError, Result};
use crate::inflect;
use crate::query::Query;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Collection is a single word; everything after "by" is the field list.
    static ref FINDER_SHAPE: Regex = Regex::new(r"^find_([a-z0-9]+)_by_(.+)$").unwrap();
}

/// A parsed finder call: the target collection and the fields to search by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderCall {
    collection: String,
    fields: Vec<String>,
}

impl FinderCall {
    /// Parse a call name against the finder grammar.
    ///
    /// The name is lowercased first. Returns `None` when the name does not
    /// match the `find_<collection>_by_<field>[_and_<field>...]` shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use isbndb::FinderCall;
    ///
    /// let call = FinderCall::parse("find_book_by_title_and_author").unwrap();
    /// assert_eq!(call.collection(), "books");
    /// assert_eq!(call.fields(), ["title", "author"]);
    ///
    /// assert!(FinderCall::parse("delete_books").is_none());
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Option<FinderCall> {
        let name = name.to_lowercase();
        let captures = FINDER_SHAPE.captures(&name)?;
        let collection = inflect::pluralize(&captures[1]);
        let fields: Vec<String> = captures[2]
            .split("_and_")
            .map(str::to_string)
            .collect();
        if fields.iter().any(String::is_empty) {
            return None;
        }
        Some(FinderCall { collection, fields })
    }

    /// The pluralized collection this finder targets.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The field names to search by, in call order.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Pair the fields with positional argument values and build the query.
    ///
    /// # Errors
    ///
    /// Returns [`IsbndbError::InvalidQuery`] naming the expected and actual
    /// counts when the argument count does not match the field count.
    pub fn into_query(self, args: &[&str]) -> Result<Query> {
        if args.len() != self.fields.len() {
            return Err(IsbndbError::InvalidQuery(format!(
                "wrong number of arguments ({} for {})",
                args.len(),
                self.fields.len()
            )));
        }
        let mut query = Query::new(self.collection);
        for (field, value) in self.fields.iter().zip(args) {
            query = query.condition(field, value);
        }
        Ok(query)
    }
}
