//! Delimited list codec
//!
//! Lists of strings are persisted as a single value. Items are joined with
//! [`DELIMITER`]; any delimiter or [`ESCAPE`] character inside an item is
//! prefixed with [`ESCAPE`].
//!
//! Decoding never fails. Historical stores contain values written by several
//! generations of the application, so malformed input is read as leniently as
//! possible instead of being rejected.
//!
//! ```rust
//! use jabprefs::list_codec::{decode, encode};
//!
//! let items = vec!["a;b".to_string(), "c\\d".to_string()];
//! let flat = encode(&items);
//! assert_eq!(flat, "a\\;b;c\\\\d");
//! assert_eq!(decode(&flat), items);
//! ```

/// Item separator
pub const DELIMITER: char = ';';

/// Escape prefix for [`DELIMITER`] and for itself
pub const ESCAPE: char = '\\';

/// Encode an ordered list of strings into one flat string
///
/// The single-element list `[""]` encodes to the empty string and therefore
/// decodes to `[]`.
pub fn encode<S: AsRef<str>>(items: &[S]) -> String {
    let mut out = String::new();
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            out.push(DELIMITER);
        }
        for c in item.as_ref().chars() {
            if c == DELIMITER || c == ESCAPE {
                out.push(ESCAPE);
            }
            out.push(c);
        }
    }
    out
}

/// Decode a flat string produced by [`encode`]
///
/// Blank input (empty or whitespace only) yields an empty list. The last item
/// is always emitted, so `"a;"` decodes to `["a", ""]`. A dangling escape at the
/// very end is discarded.
pub fn decode(input: &str) -> Vec<String> {
    if input.trim().is_empty() {
        return Vec::new();
    }

    let mut items = Vec::new();
    let mut current = String::new();
    let mut escaped = false;

    for c in input.chars() {
        if escaped {
            current.push(c);
            escaped = false;
        } else if c == ESCAPE {
            escaped = true;
        } else if c == DELIMITER {
            items.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    items.push(current);

    items
}
