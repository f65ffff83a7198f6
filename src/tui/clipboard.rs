//! Copy text to the host clipboard through the terminal (OSC 52).

use std::io::{self, Write};
use std::sync::Mutex;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub trait Clipboard: Send + Sync {
    fn copy(&self, text: &str) -> io::Result<()>;
}

/// `ESC ] 52 ; c ; <base64> BEL`
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

/// Asks the terminal emulator to set the system clipboard. Works over SSH
/// when the terminal allows OSC 52.
#[derive(Debug, Default, Clone, Copy)]
pub struct Osc52Clipboard;

impl Clipboard for Osc52Clipboard {
    fn copy(&self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(osc52_sequence(text).as_bytes())?;
        stdout.flush()
    }
}

/// Keeps everything copied, in order. For headless runs.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    copied: Mutex<Vec<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<String> {
        self.copied.lock().ok().and_then(|c| c.last().cloned())
    }

    pub fn len(&self) -> usize {
        self.copied.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&self, text: &str) -> io::Result<()> {
        self.copied
            .lock()
            .map_err(|_| io::Error::other("clipboard lock poisoned"))?
            .push(text.to_string());
        Ok(())
    }
}
