use async_trait::async_trait;

use crate::error::{Result, ScribeError};
use crate::process;

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn copy(&self, text: &str) -> Result<()>;
}

/// Copies through the platform's clipboard utility.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

/// Clipboard command for an OS name as reported by `std::env::consts::OS`.
pub fn clipboard_command(os: &str) -> Result<(&'static str, Vec<String>)> {
    match os {
        "macos" => Ok(("pbcopy", Vec::new())),
        "linux" => Ok(("xclip", process::args(["-selection", "clipboard"]))),
        "windows" => Ok(("clip", Vec::new())),
        other => Err(ScribeError::ClipboardUnsupported(other.to_string())),
    }
}

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn copy(&self, text: &str) -> Result<()> {
        let (program, args) = clipboard_command(std::env::consts::OS)?;
        process::run_with_stdin(program, &args, text).await
    }
}
