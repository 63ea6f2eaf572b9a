//! Per-message text direction detection.
//!
//! Conversations with the Edris backend mix Persian and Latin script freely,
//! so every message classifies itself: a single Arabic-block character is
//! enough to render that message right-to-left. Classification is re-run on
//! each message rather than latched once per session.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn is_rtl(self) -> bool {
        self == TextDirection::Rtl
    }

    pub fn toggled(self) -> Self {
        match self {
            TextDirection::Ltr => TextDirection::Rtl,
            TextDirection::Rtl => TextDirection::Ltr,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

/// Classify text by scanning for characters in the Arabic/Persian block
/// (U+0600..=U+06FF). Anything else, including empty input, is LTR.
pub fn detect_direction(text: &str) -> TextDirection {
    if text.chars().any(is_rtl_char) {
        TextDirection::Rtl
    } else {
        TextDirection::Ltr
    }
}

fn is_rtl_char(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_ltr() {
        assert_eq!(detect_direction("hello"), TextDirection::Ltr);
    }

    #[test]
    fn persian_is_rtl() {
        assert_eq!(detect_direction("سلام"), TextDirection::Rtl);
    }

    #[test]
    fn mixed_text_is_rtl() {
        assert_eq!(detect_direction("hello سلام"), TextDirection::Rtl);
    }

    #[test]
    fn empty_text_is_ltr() {
        assert_eq!(detect_direction(""), TextDirection::Ltr);
    }

    #[test]
    fn toggling_flips_direction() {
        assert_eq!(TextDirection::Ltr.toggled(), TextDirection::Rtl);
        assert_eq!(TextDirection::Rtl.toggled(), TextDirection::Ltr);
    }
}
