//! Text upload decoding
//!
//! Text files arrive in whatever encoding the user's editor produced,
//! commonly GBK for Chinese documents. They are always stored as UTF-8.

use crate::config::TEXT_FALLBACK_ENCODINGS;
use encoding_rs::Encoding;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Result of decoding an uploaded text file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    /// Name of the encoding that decoded the bytes cleanly, or `None` when
    /// the lossy UTF-8 fallback was used
    pub encoding: Option<&'static str>,
}

/// Decode `bytes` trying the declared encoding first, then the fallback list,
/// then UTF-8 with replacement characters.
pub fn decode_text(bytes: &[u8], declared: Option<&str>) -> DecodedText {
    if let Some(stripped) = bytes.strip_prefix(UTF8_BOM) {
        if let Ok(text) = std::str::from_utf8(stripped) {
            return DecodedText {
                text: text.to_string(),
                encoding: Some(encoding_rs::UTF_8.name()),
            };
        }
    }

    let declared = declared.map(str::trim).filter(|label| !label.is_empty());

    for label in declared.into_iter().chain(TEXT_FALLBACK_ENCODINGS.iter().copied()) {
        let Some(encoding) = Encoding::for_label(label.as_bytes()) else {
            tracing::debug!("Ignoring unknown encoding label: {}", label);
            continue;
        };

        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            return DecodedText {
                text: text.into_owned(),
                encoding: Some(encoding.name()),
            };
        }
    }

    tracing::warn!("No candidate encoding matched, decoding as lossy UTF-8");
    DecodedText {
        text: String::from_utf8_lossy(bytes).into_owned(),
        encoding: None,
    }
}
