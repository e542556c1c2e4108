//! XML response parsing into a loosely-typed payload tree.
//!
//! The service answers every request with an XML document rooted at an
//! `<ISBNdb>` envelope. This module converts that document into a
//! [`serde_json::Value`] tree:
//!
//! - element attributes become keys of the element's object;
//! - repeated child elements collect into an array;
//! - an element with both attributes and text stores the text under
//!   `__content__`;
//! - an element with only text becomes a plain string;
//! - an empty element becomes `Null`.
//!
//! The tree keeps the service's original key casing; normalization is a
//! separate, later step (see [`crate::normalize`]).

use crate::error::{IsbndbError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

/// One element being assembled while its end tag is still pending.
struct PendingElement {
    name: String,
    entries: Map<String, Value>,
    text: String,
}

impl PendingElement {
    fn root() -> Self {
        PendingElement {
            name: String::new(),
            entries: Map::new(),
            text: String::new(),
        }
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).to_string();
        let mut entries = Map::new();
        for attribute in start.attributes() {
            let attribute = attribute
                .map_err(|e| IsbndbError::MalformedResponse(format!("bad attribute: {e}")))?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).to_string();
            let value = attribute
                .unescape_value()
                .map_err(|e| IsbndbError::MalformedResponse(format!("bad attribute value: {e}")))?
                .to_string();
            entries.insert(key, Value::String(value));
        }
        Ok(PendingElement {
            name,
            entries,
            text: String::new(),
        })
    }

    /// Collapse this element into a value once its end tag is seen.
    fn finish(mut self) -> (String, Value) {
        let text = self.text.trim();
        let value = if self.entries.is_empty() {
            if text.is_empty() {
                Value::Null
            } else {
                Value::String(text.to_string())
            }
        } else {
            if !text.is_empty() {
                self.entries
                    .insert("__content__".to_string(), Value::String(text.to_string()));
            }
            Value::Object(self.entries)
        };
        (self.name, value)
    }

    /// Attach a finished child, collecting repeated names into an array.
    fn attach(&mut self, name: String, value: Value) {
        match self.entries.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                self.entries.insert(name, value);
            }
        }
    }
}

/// Parse an XML response body into a payload tree.
///
/// The result maps the root element's name to its value, e.g.
/// `{"ISBNdb": {...}}`.
///
/// # Errors
///
/// Returns [`IsbndbError::MalformedResponse`] if the body is not
/// well-formed XML or contains no element at all.
///
/// # Examples
///
/// ```
/// use isbndb::xml::parse_payload;
/// use serde_json::json;
///
/// let payload = parse_payload(
///     r#"<ISBNdb server_time="2012-06-16T20:10:13Z">
///          <BookList total_results="2"><BookData book_id="x"><Title>X</Title></BookData></BookList>
///        </ISBNdb>"#,
/// ).unwrap();
/// assert_eq!(payload["ISBNdb"]["BookList"]["total_results"], json!("2"));
/// assert_eq!(payload["ISBNdb"]["BookList"]["BookData"]["Title"], json!("X"));
/// ```
pub fn parse_payload(xml: &str) -> Result<Value> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack = vec![PendingElement::root()];
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(start)) => stack.push(PendingElement::from_start(&start)?),
            Ok(Event::Empty(start)) => {
                let (name, value) = PendingElement::from_start(&start)?.finish();
                top(&mut stack)?.attach(name, value);
            }
            Ok(Event::Text(text)) => {
                let text = text
                    .unescape()
                    .map_err(|e| IsbndbError::MalformedResponse(format!("bad text: {e}")))?;
                top(&mut stack)?.text.push_str(&text);
            }
            Ok(Event::CData(cdata)) => {
                top(&mut stack)?
                    .text
                    .push_str(&String::from_utf8_lossy(&cdata.into_inner()));
            }
            Ok(Event::End(_)) => {
                let (name, value) = stack
                    .pop()
                    .ok_or_else(|| {
                        IsbndbError::MalformedResponse("unbalanced end tag".to_string())
                    })?
                    .finish();
                top(&mut stack)?.attach(name, value);
            }
            Ok(Event::Eof) => break,
            Ok(Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_)) => {}
            Err(e) => {
                return Err(IsbndbError::MalformedResponse(format!(
                    "XML parse error at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
        }
        buf.clear();
    }

    match stack.pop() {
        Some(root) if stack.is_empty() && !root.entries.is_empty() => {
            Ok(Value::Object(root.entries))
        }
        Some(_) | None => Err(IsbndbError::MalformedResponse(
            "document contains no complete root element".to_string(),
        )),
    }
}

fn top<'a>(stack: &'a mut [PendingElement]) -> Result<&'a mut PendingElement> {
    stack
        .last_mut()
        .ok_or_else(|| IsbndbError::MalformedResponse("unbalanced document".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attributes_become_keys() {
        let payload = parse_payload(
            r#"<ISBNdb><BookList total_results="1664" page_size="10"/></ISBNdb>"#,
        )
        .unwrap();
        assert_eq!(
            payload,
            json!({"ISBNdb": {"BookList": {"total_results": "1664", "page_size": "10"}}})
        );
    }

    #[test]
    fn test_text_only_element_becomes_string() {
        let payload =
            parse_payload("<ISBNdb><Title>100th Day of School</Title></ISBNdb>").unwrap();
        assert_eq!(payload["ISBNdb"]["Title"], json!("100th Day of School"));
    }

    #[test]
    fn test_text_with_attributes_stored_under_content() {
        let payload = parse_payload(
            r#"<ISBNdb><PublisherText publisher_id="cartwheel">Cartwheel</PublisherText></ISBNdb>"#,
        )
        .unwrap();
        assert_eq!(
            payload["ISBNdb"]["PublisherText"],
            json!({"publisher_id": "cartwheel", "__content__": "Cartwheel"})
        );
    }

    #[test]
    fn test_repeated_children_collect_into_array() {
        let payload = parse_payload(
            r#"<ISBNdb><List><Data id="a"/><Data id="b"/><Data id="c"/></List></ISBNdb>"#,
        )
        .unwrap();
        assert_eq!(
            payload["ISBNdb"]["List"]["Data"],
            json!([{"id": "a"}, {"id": "b"}, {"id": "c"}])
        );
    }

    #[test]
    fn test_single_child_stays_object() {
        let payload =
            parse_payload(r#"<ISBNdb><List><Data id="only"/></List></ISBNdb>"#).unwrap();
        assert_eq!(payload["ISBNdb"]["List"]["Data"], json!({"id": "only"}));
    }

    #[test]
    fn test_empty_element_is_null() {
        let payload = parse_payload("<ISBNdb><Nothing/></ISBNdb>").unwrap();
        assert_eq!(payload["ISBNdb"]["Nothing"], Value::Null);
    }

    #[test]
    fn test_entities_are_unescaped() {
        let payload =
            parse_payload("<ISBNdb><Title>Cats &amp; Dogs</Title></ISBNdb>").unwrap();
        assert_eq!(payload["ISBNdb"]["Title"], json!("Cats & Dogs"));
    }

    #[test]
    fn test_malformed_xml_is_rejected() {
        for bad in ["", "not xml at all", "<ISBNdb>", "<a><b></a></b>", "<<<>>>"] {
            let err = parse_payload(bad).unwrap_err();
            assert!(
                matches!(err, IsbndbError::MalformedResponse(_)),
                "expected MalformedResponse for {bad:?}"
            );
        }
    }

    #[test]
    fn test_xml_declaration_is_skipped() {
        let payload =
            parse_payload(r#"<?xml version="1.0" encoding="UTF-8"?><ISBNdb server_time="t"/>"#)
                .unwrap();
        assert_eq!(payload, json!({"ISBNdb": {"server_time": "t"}}));
    }
}
