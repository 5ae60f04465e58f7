//! Channel message formatting: single-message truncation and multi-chunk
//! splitting against the channel size limit. Lengths are measured in
//! characters, matching how the channel counts them.

/// Hard per-message ceiling imposed by the channel.
pub const MESSAGE_LIMIT: usize = 4096;

/// Split budget for multi-chunk delivery. Leaves headroom under
/// [`MESSAGE_LIMIT`] for the part annotation injected at send time.
pub const CHUNK_BUDGET: usize = 4000;

/// Appended when single-message mode has to cut the text.
pub const TRUNCATION_MARKER: &str = "\n\n... [truncated]";

/// One bounded segment of a formatted digest, tagged with its 1-based
/// position among its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub index: usize,
    pub total: usize,
}

/// Trim the text and force it under `limit` characters, appending the
/// truncation marker when a cut was needed. The result never exceeds
/// `limit`.
pub fn format_single(text: &str, limit: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= limit {
        return trimmed.to_string();
    }

    let keep = limit.saturating_sub(TRUNCATION_MARKER.chars().count());
    let mut out: String = trimmed.chars().take(keep).collect();
    out.push_str(TRUNCATION_MARKER);
    out
}

/// Greedy line packing. Lines keep their separators, so concatenating the
/// chunk texts in order reproduces the input exactly; every chunk stays
/// within `limit` characters. A single line longer than `limit` is
/// hard-split at the limit boundary — no smaller unit exists to preserve.
pub fn split_into_chunks(text: &str, limit: usize) -> Vec<Chunk> {
    assert!(limit > 0, "chunk limit must be positive");

    let mut pieces: Vec<String> = Vec::new();
    let mut acc = String::new();
    let mut acc_chars = 0usize;

    for segment in text.split_inclusive('\n') {
        let seg_chars = segment.chars().count();

        if seg_chars > limit {
            if !acc.is_empty() {
                pieces.push(std::mem::take(&mut acc));
                acc_chars = 0;
            }
            let mut rest = segment;
            let mut rest_chars = seg_chars;
            while rest_chars > limit {
                let cut = byte_offset_of_char(rest, limit);
                pieces.push(rest[..cut].to_string());
                rest = &rest[cut..];
                rest_chars -= limit;
            }
            acc.push_str(rest);
            acc_chars = rest_chars;
            continue;
        }

        if acc_chars + seg_chars > limit {
            pieces.push(std::mem::take(&mut acc));
            acc_chars = 0;
        }
        acc.push_str(segment);
        acc_chars += seg_chars;
    }

    if !acc.is_empty() || pieces.is_empty() {
        pieces.push(acc);
    }

    let total = pieces.len();
    pieces
        .into_iter()
        .enumerate()
        .map(|(i, text)| Chunk {
            text,
            index: i + 1,
            total,
        })
        .collect()
}

fn byte_offset_of_char(s: &str, nth: usize) -> usize {
    s.char_indices().nth(nth).map_or(s.len(), |(i, _)| i)
}
