use crate::error::{TidyError, TidyResult};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use std::{borrow::Cow, str::FromStr};
use tracing::{debug, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// How raw input bytes are turned into text before CSV parsing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputEncoding {
    /// UTF-8 when the bytes are valid UTF-8, otherwise Windows-1252
    /// (the WHATWG reading of ISO-8859-1).
    #[default]
    Auto,
    /// Any WHATWG label known to `encoding_rs`, e.g. `latin1` or `utf-8`.
    Label(&'static Encoding),
}

impl FromStr for InputEncoding {
    type Err = TidyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(InputEncoding::Auto);
        }
        Encoding::for_label(s.as_bytes())
            .map(InputEncoding::Label)
            .ok_or_else(|| TidyError::UnknownEncoding(s.to_string()))
    }
}

/// Decode `bytes` under `policy`. A leading BOM is honoured and stripped.
pub fn decode<'a>(bytes: &'a [u8], policy: &InputEncoding) -> TidyResult<Cow<'a, str>> {
    match policy {
        InputEncoding::Auto => {
            let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
            if !had_errors {
                return Ok(text);
            }
            warn!("input is not valid UTF-8; decoding as {}", WINDOWS_1252.name());
            let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(body);
            Ok(text)
        }
        InputEncoding::Label(enc) => {
            let (text, used, had_errors) = enc.decode(bytes);
            debug!(encoding = used.name(), "decoded input");
            if had_errors {
                warn!(
                    "input contained sequences invalid in {}; replaced with U+FFFD",
                    used.name()
                );
            }
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_passes_through_and_drops_bom() {
        let bytes = "\u{FEFF}caf\u{e9}".as_bytes();
        let text = decode(bytes, &InputEncoding::Auto).unwrap();
        assert_eq!(text, "caf\u{e9}");
    }

    #[test]
    fn invalid_utf8_falls_back_to_latin1() {
        // "café" and a right single quote in Windows-1252
        let bytes = b"caf\xe9 \x92";
        let text = decode(bytes, &InputEncoding::Auto).unwrap();
        assert_eq!(text, "caf\u{e9} \u{2019}");
    }

    #[test]
    fn latin1_fallback_drops_utf8_bom() {
        let bytes = b"\xEF\xBB\xBFHELPED,caf\xe9\n";
        let text = decode(bytes, &InputEncoding::Auto).unwrap();
        assert_eq!(text, "HELPED,caf\u{e9}\n");
    }

    #[test]
    fn labels_parse() {
        assert_eq!("auto".parse::<InputEncoding>().unwrap(), InputEncoding::Auto);
        assert_eq!(
            "ISO-8859-1".parse::<InputEncoding>().unwrap(),
            InputEncoding::Label(WINDOWS_1252)
        );
        assert!(matches!(
            "klingon".parse::<InputEncoding>(),
            Err(TidyError::UnknownEncoding(_))
        ));
    }

    #[test]
    fn forced_label_decodes_high_bytes() {
        let policy: InputEncoding = "latin1".parse().unwrap();
        let text = decode(b"na\xefve", &policy).unwrap();
        assert_eq!(text, "na\u{ef}ve");
    }
}
