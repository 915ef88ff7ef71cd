use anyhow::Result;
use std::io::Write;

use crate::events::Role;
use crate::prompts::TYPING_INDICATOR;

/// Writes the visible side of the conversation
pub struct Transcript<W: Write> {
    out: W,
    /// Whether output is a terminal that understands carriage-return overwrites
    interactive: bool,
}

impl<W: Write> Transcript<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            interactive: false,
        }
    }

    pub fn interactive(out: W) -> Self {
        Self {
            out,
            interactive: true,
        }
    }

    /// One chat bubble
    pub fn bubble(&mut self, role: Role, label: &str, text: &str) -> Result<()> {
        let marker = match role {
            Role::User => "›",
            Role::Assistant => "‹",
            Role::System => "·",
        };
        writeln!(self.out, "{} {}: {}", marker, label, text)?;
        self.out.flush()?;
        Ok(())
    }

    /// Informational line that is not part of the conversation
    pub fn notice(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()?;
        Ok(())
    }

    /// Input prompt, left open for the user to type on
    pub fn prompt(&mut self, label: &str) -> Result<()> {
        if self.interactive {
            write!(self.out, "{}> ", label)?;
            self.out.flush()?;
        }
        Ok(())
    }

    /// The user's own bubble. A terminal already shows what was typed.
    pub fn user_turn(&mut self, label: &str, text: &str) -> Result<()> {
        if !self.interactive {
            self.bubble(Role::User, label, text)?;
        }
        Ok(())
    }

    /// Echo of the question being sent
    pub fn latest_question(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "Latest question: {}", text)?;
        self.out.flush()?;
        Ok(())
    }

    pub fn typing(&mut self) -> Result<()> {
        if self.interactive {
            write!(self.out, "{}", TYPING_INDICATOR)?;
            self.out.flush()?;
        }
        Ok(())
    }

    pub fn clear_typing(&mut self) -> Result<()> {
        if self.interactive {
            write!(self.out, "\r\x1b[2K")?;
            self.out.flush()?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
