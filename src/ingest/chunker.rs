//! Sliding-window text chunking

/// Split text into fixed-size character windows with overlap.
///
/// Windows advance by `size - overlap` characters, so consecutive chunks
/// share `overlap` characters of context. The final chunk may be shorter
/// than `size`. Offsets are computed over characters, not bytes, so
/// multi-byte text never splits inside a code point.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    if text.is_empty() || size == 0 {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let step = size.saturating_sub(overlap).max(1);

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        start += step;
    }

    chunks
}
