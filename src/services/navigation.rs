//! Navigation targets and the navigator that follows them.

/// Where the client should go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// An in-app path such as the landing page.
    Internal(String),
    /// A full navigation away from the client, e.g. the OAuth entry point.
    External(String),
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, to: Navigation);
}

/// Terminal navigator: external URLs open in the system browser, internal
/// paths are only logged since there is no in-app router here.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl Navigator for SystemBrowser {
    fn navigate(&self, to: Navigation) {
        match to {
            Navigation::Internal(path) => {
                tracing::info!(%path, "already signed in; continuing to landing page");
            }
            Navigation::External(url) => {
                eprintln!("Opening browser to: {url}");
                if let Err(error) = open::that(&url) {
                    tracing::warn!(%error, "failed to open browser");
                    eprintln!("Open the URL above manually to sign in.");
                }
            }
        }
    }
}
