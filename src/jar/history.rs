// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Navigation history

use crate::browser::State;

/// Last-in-first-out stack of visited states.
///
/// The top of the stack is the page the session is on. Growth is unbounded.
#[derive(Debug, Clone, Default)]
pub struct History {
    states: Vec<State>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a state, making it the top
    pub fn push(&mut self, state: State) {
        self.states.push(state);
    }

    /// Remove and return the top state, `None` when empty
    pub fn pop(&mut self) -> Option<State> {
        self.states.pop()
    }

    /// The top state, `None` when empty
    pub fn top(&self) -> Option<&State> {
        self.states.last()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Drop every state
    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Visited states, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Response;
    use bytes::Bytes;
    use reqwest::header::HeaderMap;
    use reqwest::{Method, StatusCode};
    use url::Url;

    fn state(url: &str) -> State {
        let response = Response::new(
            StatusCode::OK,
            HeaderMap::new(),
            Bytes::new(),
            Url::parse(url).unwrap(),
        );
        State::without_document(Method::GET, response)
    }

    #[test]
    fn test_push_pop() {
        let mut stack = History::new();

        stack.push(state("http://example.com/1"));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top().unwrap().url.path(), "/1");

        stack.push(state("http://example.com/2"));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.top().unwrap().url.path(), "/2");

        assert_eq!(stack.pop().unwrap().url.path(), "/2");
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top().unwrap().url.path(), "/1");

        assert_eq!(stack.pop().unwrap().url.path(), "/1");
        assert!(stack.is_empty());
    }

    #[test]
    fn test_pop_empty() {
        let mut stack = History::new();
        assert!(stack.pop().is_none());
        assert!(stack.top().is_none());
    }

    #[test]
    fn test_clear() {
        let mut stack = History::new();
        stack.push(state("http://example.com/1"));
        stack.push(state("http://example.com/2"));
        assert_eq!(stack.iter().count(), 2);
        stack.clear();
        assert_eq!(stack.len(), 0);
    }
}
