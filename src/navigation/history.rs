use crate::auth::AuthSnapshot;

use super::{NavigationError, NavigationOutcome, NavigationRequest, RouteTable, navigate};

/// Upper bound on redirects followed for a single navigation.
pub const MAX_REDIRECTS: usize = 8;

/// NavigationHistory
///
/// Browser-style history: a list of visited paths and a cursor. Pushing
/// discards any forward entries; replacing overwrites the entry under the
/// cursor, which is how redirects keep the back button from returning to the
/// path that bounced.
#[derive(Debug, Clone, Default)]
pub struct NavigationHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn push(&mut self, path: impl Into<String>) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
            self.cursor += 1;
        }
        self.entries.push(path.into());
    }

    pub fn replace(&mut self, path: impl Into<String>) {
        match self.entries.get_mut(self.cursor) {
            Some(slot) => *slot = path.into(),
            None => self.push(path),
        }
    }

    pub fn back(&mut self) -> Option<&str> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    pub fn forward(&mut self) -> Option<&str> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    /// follow
    ///
    /// Navigates to `path` and keeps applying redirect directives until a
    /// page renders or nothing matches. The outcome of the final hop is
    /// returned. Each call stands on its own; a later call simply supersedes
    /// whatever an earlier one left behind.
    ///
    /// On [`NavigationError::RedirectLoop`] the history is restored to what
    /// it was before the call.
    pub fn follow(
        &mut self,
        table: &RouteTable,
        auth: &AuthSnapshot,
        path: &str,
    ) -> Result<NavigationOutcome, NavigationError> {
        let saved = (self.entries.clone(), self.cursor);
        self.push(path);
        let mut target = path.to_string();

        for _ in 0..=MAX_REDIRECTS {
            let outcome = navigate(table, &NavigationRequest::new(target.clone(), auth.clone()));
            match outcome {
                NavigationOutcome::Redirect { to, replace } => {
                    if replace {
                        self.replace(to.clone());
                    } else {
                        self.push(to.clone());
                    }
                    target = to;
                }
                other => return Ok(other),
            }
        }

        (self.entries, self.cursor) = saved;
        Err(NavigationError::RedirectLoop {
            path: path.to_string(),
            hops: MAX_REDIRECTS,
        })
    }
}
