//! Clipboard and link requests coming from the native side.
//!
//! The native sink calls back into the bridge with an integer command code
//! and a text payload, and blocks until it gets an answer. There is no error
//! channel on that path: an unknown code yields `None`, and a clipboard
//! without plain text pastes as an empty string.

#[cfg(feature = "arboard")]
use crate::error::Error;
use crate::error::Result;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub const CLIPBOARD_COPY: i32 = 2000;
pub const CLIPBOARD_PASTE: i32 = 2001;
pub const CLIPBOARD_OPEN: i32 = 2002;

/// Recognized clipboard command codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipboardCommand {
    Copy,
    Paste,
    Open,
}

impl ClipboardCommand {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            CLIPBOARD_COPY => Some(ClipboardCommand::Copy),
            CLIPBOARD_PASTE => Some(ClipboardCommand::Paste),
            CLIPBOARD_OPEN => Some(ClipboardCommand::Open),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            ClipboardCommand::Copy => CLIPBOARD_COPY,
            ClipboardCommand::Paste => CLIPBOARD_PASTE,
            ClipboardCommand::Open => CLIPBOARD_OPEN,
        }
    }
}

/// Host clipboard service.
pub trait HostClipboard: Send + Sync {
    /// Replace the primary clip with plain text.
    fn set_plain_text(&self, label: &str, text: &str) -> Result<()>;

    /// Text of the primary clip, or `None` when there is no clip or it is not
    /// plain text.
    fn plain_text(&self) -> Result<Option<String>>;
}

/// MIME type of a clip held by [`MemoryClipboard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipMime {
    PlainText,
    Html,
}

impl ClipMime {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "text/plain" => Some(ClipMime::PlainText),
            "text/html" => Some(ClipMime::Html),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClipMime::PlainText => "text/plain",
            ClipMime::Html => "text/html",
        }
    }
}

/// One clip held by [`MemoryClipboard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clip {
    pub label: String,
    pub mime: ClipMime,
    pub text: String,
}

/// In-process clipboard.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    clip: Mutex<Option<Clip>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a clip of any supported type.
    pub fn put(&self, label: &str, text: &str, mime: ClipMime) {
        let mut clip = match self.clip.lock() {
            Ok(clip) => clip,
            Err(poisoned) => poisoned.into_inner(),
        };
        *clip = Some(Clip {
            label: label.to_string(),
            mime,
            text: text.to_string(),
        });
    }

    /// Current clip, if any.
    pub fn clip(&self) -> Option<Clip> {
        match self.clip.lock() {
            Ok(clip) => clip.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn clear(&self) {
        match self.clip.lock() {
            Ok(mut clip) => *clip = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }
}

impl HostClipboard for MemoryClipboard {
    fn set_plain_text(&self, label: &str, text: &str) -> Result<()> {
        self.put(label, text, ClipMime::PlainText);
        Ok(())
    }

    fn plain_text(&self) -> Result<Option<String>> {
        Ok(self
            .clip()
            .filter(|clip| clip.mime == ClipMime::PlainText)
            .map(|clip| clip.text))
    }
}

/// The operating system clipboard, through `arboard`.
#[cfg(feature = "arboard")]
pub struct SystemClipboard {
    clipboard: Mutex<arboard::Clipboard>,
}

#[cfg(feature = "arboard")]
impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let clipboard = arboard::Clipboard::new()
            .map_err(|e| Error::Clipboard(format!("failed to open system clipboard: {}", e)))?;
        Ok(Self {
            clipboard: Mutex::new(clipboard),
        })
    }
}

#[cfg(feature = "arboard")]
impl HostClipboard for SystemClipboard {
    fn set_plain_text(&self, _label: &str, text: &str) -> Result<()> {
        let mut clipboard = self
            .clipboard
            .lock()
            .map_err(|_| Error::Clipboard("system clipboard mutex poisoned".into()))?;
        clipboard
            .set_text(text)
            .map_err(|e| Error::Clipboard(e.to_string()))
    }

    fn plain_text(&self) -> Result<Option<String>> {
        let mut clipboard = self
            .clipboard
            .lock()
            .map_err(|_| Error::Clipboard("system clipboard mutex poisoned".into()))?;
        match clipboard.get_text() {
            Ok(text) => Ok(Some(text)),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(Error::Clipboard(e.to_string())),
        }
    }
}

/// What an OPEN request points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// A local file or folder (`file:` / `file://` stripped).
    File(PathBuf),
    /// Anything else, passed through untouched.
    Url(String),
}

impl LinkTarget {
    pub fn parse(link: &str) -> Self {
        if let Some(rest) = link.strip_prefix("file:") {
            let path = rest.strip_prefix("//").unwrap_or(rest);
            LinkTarget::File(PathBuf::from(path))
        } else {
            LinkTarget::Url(link.to_string())
        }
    }
}

/// Opens links on behalf of the native side.
pub trait LinkOpener: Send + Sync {
    fn open_link(&self, target: LinkTarget);
}

/// Implement LinkOpener for closures.
impl<F> LinkOpener for F
where
    F: Fn(LinkTarget) + Send + Sync,
{
    fn open_link(&self, target: LinkTarget) {
        self(target);
    }
}

/// Opener used when the host registered none. Only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLinkOpener;

impl LinkOpener for NoLinkOpener {
    fn open_link(&self, target: LinkTarget) {
        log::warn!("no link opener registered, ignoring {:?}", target);
    }
}

/// Synchronous clipboard relay between the native sink and the host.
pub struct ClipboardBridge {
    clipboard: Arc<dyn HostClipboard>,
    opener: Arc<dyn LinkOpener>,
    label: String,
}

impl ClipboardBridge {
    pub fn new(
        clipboard: Arc<dyn HostClipboard>,
        opener: Arc<dyn LinkOpener>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            clipboard,
            opener,
            label: label.into(),
        }
    }

    /// Handle a raw request from the native side.
    ///
    /// Returns the pasted text for PASTE and `None` for every other code,
    /// recognized or not.
    pub fn access(&self, code: i32, payload: &str) -> Option<String> {
        match ClipboardCommand::from_code(code) {
            Some(command) => self.execute(command, payload),
            None => {
                log::debug!("ignoring unknown clipboard command {}", code);
                None
            }
        }
    }

    pub fn execute(&self, command: ClipboardCommand, payload: &str) -> Option<String> {
        match command {
            ClipboardCommand::Copy => {
                if let Err(e) = self.clipboard.set_plain_text(&self.label, payload) {
                    log::warn!("clipboard copy failed: {}", e);
                }
                None
            }
            ClipboardCommand::Paste => Some(self.paste()),
            ClipboardCommand::Open => {
                let target = LinkTarget::parse(payload);
                log::debug!("opening link {:?}", target);
                self.opener.open_link(target);
                None
            }
        }
    }

    fn paste(&self) -> String {
        match self.clipboard.plain_text() {
            Ok(text) => text.unwrap_or_default(),
            Err(e) => {
                log::warn!("clipboard paste failed: {}", e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct BrokenClipboard;

    impl HostClipboard for BrokenClipboard {
        fn set_plain_text(&self, _label: &str, _text: &str) -> Result<()> {
            Err(Error::Clipboard("service gone".into()))
        }

        fn plain_text(&self) -> Result<Option<String>> {
            Err(Error::Clipboard("service gone".into()))
        }
    }

    fn bridge() -> (Arc<MemoryClipboard>, Arc<Mutex<Vec<LinkTarget>>>, ClipboardBridge) {
        let clipboard = Arc::new(MemoryClipboard::new());
        let opened = Arc::new(Mutex::new(Vec::new()));
        let opened_clone = opened.clone();
        let bridge = ClipboardBridge::new(
            clipboard.clone(),
            Arc::new(move |target: LinkTarget| opened_clone.lock().unwrap().push(target)),
            "test-label",
        );
        (clipboard, opened, bridge)
    }

    #[test]
    fn test_copy_then_paste() {
        let (clipboard, _, bridge) = bridge();

        assert_eq!(bridge.access(CLIPBOARD_COPY, "hello"), None);
        assert_eq!(bridge.access(CLIPBOARD_PASTE, ""), Some("hello".to_string()));

        let clip = clipboard.clip().unwrap();
        assert_eq!(clip.label, "test-label");
        assert_eq!(clip.mime, ClipMime::PlainText);
    }

    #[test]
    fn test_paste_empty_clipboard_is_empty_string() {
        let (_, _, bridge) = bridge();
        assert_eq!(bridge.access(CLIPBOARD_PASTE, "ignored"), Some(String::new()));
    }

    #[test]
    fn test_paste_non_text_clip_is_empty_string() {
        let (clipboard, _, bridge) = bridge();
        clipboard.put("x", "<b>bold</b>", ClipMime::Html);
        assert_eq!(bridge.access(CLIPBOARD_PASTE, ""), Some(String::new()));
    }

    #[test]
    fn test_unknown_code_has_no_effect() {
        let (clipboard, opened, bridge) = bridge();
        clipboard.put("x", "keep", ClipMime::PlainText);

        assert_eq!(bridge.access(999, "x"), None);
        assert_eq!(clipboard.clip().unwrap().text, "keep");
        assert!(opened.lock().unwrap().is_empty());
    }

    #[test]
    fn test_open_parses_targets() {
        let (_, opened, bridge) = bridge();

        assert_eq!(bridge.access(CLIPBOARD_OPEN, "https://example.com"), None);
        bridge.access(CLIPBOARD_OPEN, "file:///sdcard/games/screenshots");
        bridge.access(CLIPBOARD_OPEN, "file:relative/log.txt");

        assert_eq!(
            *opened.lock().unwrap(),
            vec![
                LinkTarget::Url("https://example.com".to_string()),
                LinkTarget::File(PathBuf::from("/sdcard/games/screenshots")),
                LinkTarget::File(PathBuf::from("relative/log.txt")),
            ]
        );
    }

    #[test]
    fn test_failing_host_degrades_to_empty() {
        let bridge = ClipboardBridge::new(Arc::new(BrokenClipboard), Arc::new(NoLinkOpener), "x");
        assert_eq!(bridge.access(CLIPBOARD_COPY, "lost"), None);
        assert_eq!(bridge.access(CLIPBOARD_PASTE, ""), Some(String::new()));
    }

    #[test]
    fn test_command_codes() {
        for command in [
            ClipboardCommand::Copy,
            ClipboardCommand::Paste,
            ClipboardCommand::Open,
        ] {
            assert_eq!(ClipboardCommand::from_code(command.code()), Some(command));
        }
        assert_eq!(ClipboardCommand::from_code(2003), None);
        assert_eq!(ClipMime::from_mime("text/plain"), Some(ClipMime::PlainText));
        assert_eq!(ClipMime::Html.as_str(), "text/html");
    }
}
