//! Low-level HTML string helpers.
//!
//! These are deliberately naive and tailored to the server-rendered grid the
//! HR portal emits. Tag and attribute names are matched case-insensitively
//! on ASCII; lowercasing with `to_ascii_lowercase` keeps byte offsets stable
//! so positions found in the lowercased copy index the original text.

/// Inner HTML of the first `<tag>` element whose `id` attribute equals `id`.
///
/// Nested elements of the same tag are skipped over when looking for the
/// matching close tag.
pub fn element_by_id<'a>(html: &'a str, tag: &str, id: &str) -> Option<&'a str> {
    let lc = html.to_ascii_lowercase();
    let id_lc = id.to_ascii_lowercase();

    let mut pos = 0;
    while let Some(start) = find_open_tag(&lc, tag, pos) {
        let open_end = lc[start..].find('>')? + start + 1;

        if attr_value(&lc[start..open_end], "id") == Some(id_lc.as_str()) {
            let close = matching_close(&lc, tag, open_end)?;
            return Some(&html[open_end..close]);
        }
        pos = open_end;
    }
    None
}

/// Inner HTML of every `<tag>` element found scanning `html` left to right.
///
/// An element ends at its close tag or at the next opening of the same tag,
/// whichever comes first, so omitted close tags are tolerated.
pub fn elements<'a>(html: &'a str, tag: &str) -> Vec<&'a str> {
    let lc = html.to_ascii_lowercase();
    let close_pat = format!("</{}", tag);
    let mut out = Vec::new();

    let mut pos = 0;
    while let Some(start) = find_open_tag(&lc, tag, pos) {
        let Some(open_end) = lc[start..].find('>').map(|i| start + i + 1) else {
            break;
        };

        let close = lc[open_end..].find(&close_pat).map(|i| open_end + i);
        let next_open = find_open_tag(&lc, tag, open_end);
        let end = match (close, next_open) {
            (Some(c), Some(n)) => c.min(n),
            (Some(c), None) => c,
            (None, Some(n)) => n,
            (None, None) => html.len(),
        };

        out.push(&html[open_end..end]);
        pos = end;
    }
    out
}

/// Text of the first `<span>` inside `html`, or an empty string if there is
/// none.
pub fn first_span_text(html: &str) -> String {
    elements(html, "span")
        .first()
        .map(|inner| clean_text(inner))
        .unwrap_or_default()
}

/// Strip tags, decode the common entities, and collapse whitespace.
pub fn clean_text(html: &str) -> String {
    normalize_ws(&normalize_entities(&strip_tags(html)))
}

/// Remove all HTML tags `<...>` from the string.
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Minimal HTML entity decoding for what the portal actually emits.
pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&amp;", "&")
}

/// Collapse sequences of whitespace into a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Byte offset of the next `<tag` at or after `from` in a lowercased
/// haystack. The tag name must end at whitespace, `>` or `/`, so `<tr` does
/// not match `<track`.
fn find_open_tag(lc: &str, tag: &str, from: usize) -> Option<usize> {
    let pat = format!("<{}", tag);
    let mut pos = from;

    loop {
        let start = lc.get(pos..)?.find(&pat)? + pos;
        let after = start + pat.len();
        match lc.as_bytes().get(after) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => return Some(start),
            Some(_) => pos = after,
            None => return None,
        }
    }
}

/// Offset of the close tag matching an element opened just before `from`.
fn matching_close(lc: &str, tag: &str, from: usize) -> Option<usize> {
    let close_pat = format!("</{}", tag);
    let mut depth = 0usize;
    let mut pos = from;

    loop {
        let close = lc.get(pos..)?.find(&close_pat)? + pos;
        match find_open_tag(lc, tag, pos) {
            Some(open) if open < close => {
                depth += 1;
                pos = open + 1;
            }
            _ => {
                if depth == 0 {
                    return Some(close);
                }
                depth -= 1;
                pos = close + close_pat.len();
            }
        }
    }
}

/// Value of attribute `name` in an opening tag, quoted or bare.
fn attr_value<'a>(open_tag: &'a str, name: &str) -> Option<&'a str> {
    let pat = format!("{}=", name);
    let mut pos = 0;

    while let Some(rel) = open_tag[pos..].find(&pat) {
        let at = pos + rel;
        pos = at + pat.len();

        let preceded_by_space = at > 0 && open_tag.as_bytes()[at - 1].is_ascii_whitespace();
        if !preceded_by_space {
            continue;
        }

        let rest = &open_tag[pos..];
        let value = match rest.chars().next() {
            Some(q @ ('"' | '\'')) => rest[1..].split(q).next(),
            _ => rest
                .split(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
                .next(),
        };
        return value;
    }
    None
}
