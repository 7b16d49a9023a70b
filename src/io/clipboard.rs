use std::io::Write;

use base64::{Engine as _, engine::general_purpose::STANDARD};

/// Largest base64 body most terminals accept in one OSC 52 write
pub const MAX_OSC52_PAYLOAD: usize = 74_994;

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard payload too large ({0} bytes base64)")]
    TooLarge(usize),
    #[error("clipboard write failed: {0}")]
    Write(#[from] std::io::Error),
}

/// Build the OSC 52 "set clipboard" sequence for `text`.
pub fn osc52_sequence(text: &str) -> Result<String, ClipboardError> {
    let encoded = STANDARD.encode(text.as_bytes());
    if encoded.len() > MAX_OSC52_PAYLOAD {
        return Err(ClipboardError::TooLarge(encoded.len()));
    }
    Ok(format!("\x1b]52;c;{encoded}\x07"))
}

/// Write `text` to the terminal clipboard. Inside tmux the sequence is wrapped
/// in DCS passthrough.
pub fn write_clipboard(writer: &mut impl Write, text: &str) -> Result<(), ClipboardError> {
    let seq = osc52_sequence(text)?;
    if std::env::var_os("TMUX").is_some() {
        writer.write_all(b"\x1bPtmux;")?;
        writer.write_all(seq.replace('\x1b', "\x1b\x1b").as_bytes())?;
        writer.write_all(b"\x1b\\")?;
    } else {
        writer.write_all(seq.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Fire-and-forget copy. Failures are logged and otherwise ignored.
pub fn copy_quietly(writer: &mut impl Write, text: &str) {
    if let Err(e) = write_clipboard(writer, text) {
        tracing::debug!(error = %e, "clipboard write failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_base64_in_osc52_frame() {
        assert_eq!(osc52_sequence("hi").unwrap(), "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn oversized_payload_is_refused() {
        let big = "x".repeat(MAX_OSC52_PAYLOAD);
        assert!(matches!(osc52_sequence(&big), Err(ClipboardError::TooLarge(_))));
    }

    #[test]
    fn copy_quietly_swallows_writer_errors() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        copy_quietly(&mut Broken, "mail@example.com");
    }
}
