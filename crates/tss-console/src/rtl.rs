//! Right-to-left rendering for Arabic output.
//!
//! Terminals without bidi support show Arabic letters unjoined and in logical
//! order. With the `rtl` feature the text is reshaped (contextual letter forms)
//! and reordered for visual display; without it, text passes through.

/// Shaping capability, decided once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reshaper {
    available: bool,
}

impl Reshaper {
    pub fn detect() -> Self {
        Self {
            available: cfg!(feature = "rtl"),
        }
    }

    /// A reshaper that never touches its input.
    pub fn passthrough() -> Self {
        Self { available: false }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn apply(&self, text: &str) -> String {
        if !self.available || !contains_arabic(text) {
            return text.to_string();
        }
        shape(text)
    }
}

fn contains_arabic(text: &str) -> bool {
    text.chars()
        .any(|c| matches!(c, '\u{0600}'..='\u{06FF}' | '\u{0750}'..='\u{077F}' | '\u{FB50}'..='\u{FEFF}'))
}

#[cfg(feature = "rtl")]
fn shape(text: &str) -> String {
    use unicode_bidi::BidiInfo;

    let reshaped = ar_reshaper::reshape_line(text);
    let bidi = BidiInfo::new(&reshaped, None);
    let mut out = String::with_capacity(reshaped.len());
    for para in &bidi.paragraphs {
        out.push_str(&bidi.reorder_line(para, para.range.clone()));
    }
    out
}

#[cfg(not(feature = "rtl"))]
fn shape(text: &str) -> String {
    text.to_string()
}
