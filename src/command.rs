//! Recognises the text commands that drive hover.
use crate::constants::{CHAT_COMMAND, CONSOLE_COMMAND, SWAP_SEATS_COMMAND};

/// A command relevant to hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverCommandKind {
    /// `/hover` in chat or `helicopterhover.hover` in the console.
    Toggle,
    /// The host's seat swap console command.
    SwapSeats,
}

/// Parses a chat line or console command, ignoring case and surrounding
/// whitespace. Arguments are not accepted.
#[must_use]
pub fn parse_command(line: &str) -> Option<HoverCommandKind> {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case(CHAT_COMMAND) || trimmed.eq_ignore_ascii_case(CONSOLE_COMMAND)
    {
        Some(HoverCommandKind::Toggle)
    } else if trimmed.eq_ignore_ascii_case(SWAP_SEATS_COMMAND) {
        Some(HoverCommandKind::SwapSeats)
    } else {
        None
    }
}
