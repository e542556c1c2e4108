//! Shared helpers for the integration tests.
#![allow(dead_code)]

use isbndb::{xml, IsbndbError, Request, Result, Transport};
use serde_json::Value;
use std::cell::RefCell;
use std::fs;

/// Parse a fixture file under `tests/data/` into a payload tree.
pub fn fixture(name: &str) -> Value {
    let body = fs::read_to_string(format!("tests/data/{name}"))
        .unwrap_or_else(|e| panic!("could not read fixture {name}: {e}"));
    xml::parse_payload(&body).unwrap_or_else(|e| panic!("could not parse fixture {name}: {e}"))
}

/// Transport that answers every request with the same payload, recording
/// each request it sees. Mirrors an HTTP stub pinned to one response body.
pub struct FixtureTransport {
    payload: Value,
    requests: RefCell<Vec<Request>>,
}

impl FixtureTransport {
    pub fn new(payload: Value) -> Self {
        FixtureTransport {
            payload,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn from_fixture(name: &str) -> Self {
        Self::new(fixture(name))
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }
}

impl Transport for FixtureTransport {
    fn execute(&self, request: &Request) -> Result<Value> {
        self.requests.borrow_mut().push(request.clone());
        Ok(self.payload.clone())
    }
}

/// Transport that serves a scripted sequence of payloads, one per request.
pub struct SequenceTransport {
    responses: RefCell<Vec<Value>>,
    requests: RefCell<Vec<Request>>,
}

impl SequenceTransport {
    pub fn new(responses: Vec<Value>) -> Self {
        SequenceTransport {
            responses: RefCell::new(responses),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }
}

impl Transport for SequenceTransport {
    fn execute(&self, request: &Request) -> Result<Value> {
        self.requests.borrow_mut().push(request.clone());
        let mut responses = self.responses.borrow_mut();
        if responses.is_empty() {
            return Err(IsbndbError::Transport(format!(
                "no scripted response left for {request:?}"
            )));
        }
        Ok(responses.remove(0))
    }
}
