// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Navigation handoff seam.
//!
//! In the browser the login flow ends by replacing the visible location and
//! resumes by reading the redirect-return fragment. Headless embedders plug
//! in their own `Navigator`; the contract that matters to the state machine
//! is that `take_fragment` is one-shot. Reading the fragment strips it, so
//! a second completion attempt racing on the same session observes nothing
//! and aborts harmlessly.

use std::sync::Mutex;
use tracing::info;

/// Browser-control seam for the login flow
pub trait Navigator: Send + Sync {
    /// Hand control to the authorization URL. In a browser this does not
    /// return; headless implementations record the URL for the caller.
    fn navigate(&self, url: &str);

    /// Read AND clear the current redirect-return fragment. Returns None
    /// when no redirect return is pending.
    fn take_fragment(&self) -> Option<String>;
}

/// In-process navigator: buffers the outgoing URL and an injected fragment
///
/// Used by the CLI (which prints the URL and later feeds back the pasted
/// redirect) and by tests.
#[derive(Default)]
pub struct RedirectBuffer {
    last_url: Mutex<Option<String>>,
    fragment: Mutex<Option<String>>,
}

impl RedirectBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject the fragment of a redirect-return URL (the part after '#')
    pub fn set_fragment(&self, fragment: impl Into<String>) {
        *self.fragment.lock().unwrap() = Some(fragment.into());
    }

    /// Last URL handed to `navigate`, if any
    pub fn last_navigation(&self) -> Option<String> {
        self.last_url.lock().unwrap().clone()
    }
}

impl Navigator for RedirectBuffer {
    fn navigate(&self, url: &str) {
        info!("🔑 Login handoff to identity provider");
        *self.last_url.lock().unwrap() = Some(url.to_string());
    }

    fn take_fragment(&self) -> Option<String> {
        self.fragment.lock().unwrap().take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_fragment_is_one_shot() {
        let buffer = RedirectBuffer::new();
        buffer.set_fragment("id_token=abc");

        assert_eq!(buffer.take_fragment(), Some("id_token=abc".to_string()));
        assert_eq!(buffer.take_fragment(), None);
    }

    #[test]
    fn test_navigate_records_url() {
        let buffer = RedirectBuffer::new();
        assert!(buffer.last_navigation().is_none());

        buffer.navigate("https://accounts.google.com/o/oauth2/v2/auth?x=1");
        assert_eq!(
            buffer.last_navigation().unwrap(),
            "https://accounts.google.com/o/oauth2/v2/auth?x=1"
        );
    }
}
