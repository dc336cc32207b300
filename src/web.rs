use crate::action::{Action, ScreenId};
use crate::app::Context;
use crate::error::{DirectoryError, Result};

/// Presentation of a single repository URL. Owned by the detail screen `owner`.
#[derive(Debug)]
pub struct WebView {
    owner: ScreenId,
    url: String,
    ctx: Context,
}

impl WebView {
    pub fn new(ctx: Context, owner: ScreenId, url: String) -> Self {
        Self { owner, url, ctx }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Ask the owning detail screen to close this view.
    pub fn dismiss(&self) {
        self.ctx.send(Action::WebDismissed(self.owner));
    }

    pub fn open_in_browser(&self) {
        if let Err(e) = open::that(&self.url) {
            self.report(e.into());
        }
    }

    /// Copy the URL to the system clipboard. Returns whether it worked.
    pub fn yank_url(&self) -> bool {
        match copy_to_clipboard(&self.url) {
            Ok(()) => true,
            Err(e) => {
                self.report(e);
                false
            }
        }
    }

    fn report(&self, err: DirectoryError) {
        tracing::warn!(error = %err, url = %self.url, "web view action failed");
        self.ctx.send(err.into());
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| DirectoryError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| DirectoryError::Clipboard(e.to_string()))
}
