use anyhow::{bail, Context, Result};
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Mutex;

/// Something text can be copied to
pub trait Clipboard: Send + Sync {
    fn set_text(&self, text: &str) -> Result<()>;
}

/// Copy text and report whether it worked; failures are logged, never raised
pub fn copy_to_clipboard(clipboard: &dyn Clipboard, text: &str) -> bool {
    match clipboard.set_text(text) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Failed to copy to clipboard: {:#}", e);
            false
        }
    }
}

/// System clipboard reached through the platform's copy utility
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Pick the copy utility for the current platform
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("pbcopy", vec![])
        } else if cfg!(target_os = "windows") {
            Self::new("clip", vec![])
        } else if std::env::var("WAYLAND_DISPLAY").is_ok() {
            Self::new("wl-copy", vec![])
        } else {
            Self::new(
                "xclip",
                vec!["-selection".to_string(), "clipboard".to_string()],
            )
        }
    }
}

impl Clipboard for CommandClipboard {
    fn set_text(&self, text: &str) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start {}", self.program))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                // Reap the utility so a failed copy leaves no zombie behind
                let _ = child.kill();
                let _ = child.wait();
                return Err(e).context("Failed to write to clipboard utility");
            }
        }

        let status = child.wait().context("Clipboard utility did not finish")?;
        if !status.success() {
            bail!("{} exited with {}", self.program, status);
        }
        Ok(())
    }
}

/// Clipboard that just remembers the last copied text
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&self, text: &str) -> Result<()> {
        *self.contents.lock().unwrap_or_else(|e| e.into_inner()) = Some(text.to_string());
        Ok(())
    }
}
