//! Player event detection on parsed log bodies.

const JOIN_SUFFIX: &str = "joined the game";
const LEAVE_SUFFIX: &str = "left the game";

/// What a log body means to us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent<'a> {
    /// `<user> text`. Never a join or leave, whatever the text says.
    Chat,
    Login(&'a str),
    Logout(&'a str),
    /// UUID lines, entity ids, "lost connection", and everything else.
    Other,
}

/// Classify a log body.
///
/// ```text
/// ricky_ninja joined the game                 -> Login("ricky_ninja")
/// ricky_ninja left the game                   -> Logout("ricky_ninja")
/// <ricky_ninja> rain keeps em from burning =/ -> Chat
/// ricky_ninja lost connection: Disconnected   -> Other
/// ```
pub fn classify(body: &str) -> LineEvent<'_> {
    let Some(first) = body.split_whitespace().next() else {
        return LineEvent::Other;
    };

    if is_chat_token(first) {
        LineEvent::Chat
    } else if body.ends_with(JOIN_SUFFIX) {
        LineEvent::Login(first)
    } else if body.ends_with(LEAVE_SUFFIX) {
        LineEvent::Logout(first)
    } else {
        LineEvent::Other
    }
}

// Chat lines wrap the speaker in angle brackets.
fn is_chat_token(token: &str) -> bool {
    token.starts_with('<') && token.ends_with('>')
}
