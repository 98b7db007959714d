use std::fs;
use std::path::Path;
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use log::debug;
use crate::errors::DecodeError;

// @module: Candidate-encoding text loading

// @const: Encodings tried, in order, when no candidate list is supplied
// and after the detector's guess
pub const DEFAULT_ENCODINGS: &[&str] = &["utf-8", "utf-16", "gb18030"];

/// Resolve an encoding label (e.g. "utf-8", "gb18030") to an encoding.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding, DecodeError> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| DecodeError::UnknownEncoding {
        label: label.to_string(),
    })
}

/// Decode raw bytes by trying candidate encodings in order; the first
/// decode with no malformed sequences wins.
///
/// With an empty candidate list, an encoding detector's best guess is
/// tried first, then the built-in default list. A BOM in the data takes
/// precedence over whichever candidate is being tried. Failure is
/// explicit: if nothing decodes cleanly the error names every encoding
/// tried, rather than handing back a garbled string.
pub fn decode_bytes(data: &[u8], encodings: &[String]) -> Result<String, DecodeError> {
    let candidates = if encodings.is_empty() {
        detected_candidates(data)
    } else {
        let mut resolved = Vec::with_capacity(encodings.len());
        for label in encodings {
            resolved.push(resolve_encoding(label)?);
        }
        resolved
    };

    let mut tried = Vec::new();
    for encoding in candidates {
        let (text, actual, had_errors) = encoding.decode(data);
        if !had_errors {
            debug!("decoded {} bytes as {}", data.len(), actual.name());
            return Ok(text.into_owned());
        }
        tried.push(encoding.name().to_string());
    }

    Err(DecodeError::NoEncodingWorked { tried })
}

/// Read a file with unknown encoding.
///
/// `encodings` is the ordered candidate list; empty means detect first,
/// then fall back to [`DEFAULT_ENCODINGS`].
pub fn read_text<P: AsRef<Path>>(path: P, encodings: &[String]) -> Result<String, DecodeError> {
    let data = fs::read(path.as_ref())?;
    decode_bytes(&data, encodings)
}

/// Detector guess first, then the default list, duplicates removed.
fn detected_candidates(data: &[u8]) -> Vec<&'static Encoding> {
    let mut detector = EncodingDetector::new();
    detector.feed(data, true);
    let guess = detector.guess(None, true);
    debug!("encoding detector guessed {}", guess.name());

    let mut candidates = vec![guess];
    for label in DEFAULT_ENCODINGS {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            if !candidates.contains(&encoding) {
                candidates.push(encoding);
            }
        }
    }
    candidates
}
