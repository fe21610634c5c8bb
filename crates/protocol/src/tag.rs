//! Tag-delimited record codec
//!
//! Encodes a sequence of text records as `<tag>record</tag>` lines and
//! decodes the same format back into records. This is a legacy wire
//! format, not XML:
//!
//! - Record content is not escaped. A record containing the close
//!   delimiter is truncated at its first occurrence on decode.
//! - Nested same-named tags are not supported; the first close tag
//!   terminates the record.
//! - Tag names are matched literally, byte for byte.
//!
//! Both quirks are part of the format contract and must not be "fixed"
//! here - peers on the other side of the wire rely on them.

/// Encode records as `<tag>record</tag>` lines in input order.
///
/// # Example
///
/// ```
/// let body = baton_protocol::tag::encode(&["a", "b"], "item");
/// assert_eq!(body, "<item>a</item>\n<item>b</item>\n");
/// ```
pub fn encode<S: AsRef<str>>(records: &[S], tag: &str) -> String {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);

    // Rough size hint: delimiters + newline per record.
    let overhead = open.len() + close.len() + 1;
    let mut out = String::with_capacity(
        records
            .iter()
            .map(|r| r.as_ref().len() + overhead)
            .sum(),
    );

    for record in records {
        out.push_str(&open);
        out.push_str(record.as_ref());
        out.push_str(&close);
        out.push('\n');
    }

    out
}

/// Decode tag-delimited text back into records.
///
/// Scans the input linearly with explicit index tracking: find the next
/// `<tag>`, then the first `</tag>` after it, emit the substring in
/// between, and continue after the close delimiter. Runs in time
/// proportional to the input length regardless of how the input is
/// malformed.
///
/// Returns an empty vec when no open tag is present (terminal case,
/// not an error). An open tag with no matching close tag ends the
/// scan - there are no more complete records.
pub fn decode(text: &str, tag: &str) -> Vec<String> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);

    let mut records = Vec::new();
    let mut pos = 0;

    while let Some(start) = text[pos..].find(&open) {
        let body_start = pos + start + open.len();

        let Some(end) = text[body_start..].find(&close) else {
            // Unmatched open tag: no more complete records.
            break;
        };

        records.push(text[body_start..body_start + end].to_string());
        pos = body_start + end + close.len();
    }

    records
}

#[cfg(test)]
#[path = "tag_test.rs"]
mod tag_test;
