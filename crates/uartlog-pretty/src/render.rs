use std::fmt::Write;

use crate::framing::{FramingScheme, Frame, ETX, STX, SYNC};

/// Optional rendering variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Delimited frames: drop the last comma-separated field of the text.
    pub trim_last_field: bool,
    /// Length-prefixed frames: also drop the length byte and the trailing byte.
    pub strip_envelope: bool,
}

/// Render a frame's bytes as display text. Never returns an empty string.
pub fn render_frame(frame: &Frame, scheme: FramingScheme, options: RenderOptions) -> String {
    let text = match scheme {
        FramingScheme::Delimited => render_delimited(&frame.bytes, options),
        FramingScheme::LengthPrefixed => render_length_prefixed(&frame.bytes, options),
    };
    if text.is_empty() {
        ".".to_string()
    } else {
        text
    }
}

fn render_delimited(bytes: &[u8], options: RenderOptions) -> String {
    let payload = match bytes {
        [STX, inner @ .., ETX] => inner,
        _ => bytes,
    };

    let mut text = String::with_capacity(payload.len());
    for &b in payload {
        if (0x20..0x7F).contains(&b) {
            text.push(char::from(b));
        } else {
            let _ = write!(text, "\\x{b:02X}");
        }
    }

    if options.trim_last_field {
        if let Some(cut) = text.rfind(',') {
            text.truncate(cut);
        }
    }
    text
}

fn render_length_prefixed(bytes: &[u8], options: RenderOptions) -> String {
    let body = if bytes.len() > 2 && bytes[..2] == SYNC && bytes.len() == usize::from(bytes[2]) {
        if options.strip_envelope {
            bytes.get(3..bytes.len() - 1).unwrap_or(&[])
        } else {
            &bytes[2..]
        }
    } else {
        bytes
    };

    let mut text = String::with_capacity(body.len() * 3);
    for (i, b) in body.iter().enumerate() {
        if i > 0 {
            text.push(' ');
        }
        let _ = write!(text, "{b:02X}");
    }
    text
}
