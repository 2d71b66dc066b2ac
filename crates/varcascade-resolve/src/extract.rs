//! Balanced `var()` span extraction.
//!
//! The extractor finds `var(...)` calls at any nesting depth, e.g. inside
//! `calc(1px + var(--x))` or inside another call's fallback, without parsing
//! the surrounding expression.

/// A `var()` call located in a value.
///
/// `pre + "var(" + body + ")" + post` rebuilds the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarMatch {
    /// Text before the call, with the `var` token removed.
    pub pre: String,
    /// Balanced content between the call's parentheses.
    pub body: String,
    /// Text after the closing parenthesis.
    pub post: String,
}

impl VarMatch {
    /// Rebuild the text this match was extracted from.
    pub fn reconstruct(&self) -> String {
        format!("{}var({}){}", self.pre, self.body, self.post)
    }
}

/// A variable reference found by [`referenced_variables`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarReference {
    /// The variable name, e.g. `--gap`.
    pub name: String,
    /// Fallback text after the first top-level comma, if any.
    pub fallback: Option<String>,
}

/// Find the first `var()` call in `value`.
///
/// The first top-level parenthesised span is located; if the text right
/// before it is the token `var`, that span is the match. Otherwise the span's
/// body is searched, then the text after it. Unbalanced text never matches.
pub fn extract(value: &str) -> Option<VarMatch> {
    let (open, close) = balanced_range(value)?;
    let pre = &value[..open];
    let body = &value[open + 1..close];
    let post = &value[close + 1..];

    if let Some(pre) = strip_var_token(pre) {
        return Some(VarMatch {
            pre: pre.to_string(),
            body: body.to_string(),
            post: post.to_string(),
        });
    }

    if let Some(inner) = extract(body) {
        return Some(VarMatch {
            pre: format!("{pre}({}", inner.pre),
            body: inner.body,
            post: format!("{}){post}", inner.post),
        });
    }

    let inner = extract(post)?;
    Some(VarMatch {
        pre: format!("{pre}({body}){}", inner.pre),
        body: inner.body,
        post: inner.post,
    })
}

/// Split a `var()` body into the variable name and the optional fallback.
///
/// Only the first comma outside nested parentheses separates the two; the
/// fallback keeps any further commas.
pub fn split_var_arguments(body: &str) -> (&str, Option<&str>) {
    let mut depth = 0usize;
    for (index, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                return (body[..index].trim(), Some(body[index + 1..].trim()));
            }
            _ => {}
        }
    }
    (body.trim(), None)
}

/// List every `var()` reference in `value`, including references nested in
/// fallbacks, in the order they are found.
///
/// Each found name is removed from the remaining text before scanning again,
/// so the text shrinks every iteration. `value` itself is never modified.
pub fn referenced_variables(value: &str) -> Vec<VarReference> {
    let mut references = Vec::new();
    let mut remaining = value.to_string();

    while let Some(found) = extract(&remaining) {
        let (name, fallback) = split_var_arguments(&found.body);
        references.push(VarReference {
            name: name.to_string(),
            fallback: fallback.map(String::from),
        });

        remaining = format!("{}{}{}", found.pre, found.body.replacen(name, "", 1), found.post);
    }

    references
}

/// Whether `value` contains at least one `var()` call.
pub fn has_var_reference(value: &str) -> bool {
    value.contains("var(") && extract(value).is_some()
}

/// Strip a trailing `var` token, which must not continue a longer word.
fn strip_var_token(pre: &str) -> Option<&str> {
    let head = pre.strip_suffix("var")?;
    match head.chars().next_back() {
        Some(c) if c.is_ascii_alphanumeric() || c == '_' || c == '-' => None,
        _ => Some(head),
    }
}

/// Locate the first balanced `(`/`)` pair.
///
/// Closing parentheses before the first opening one are ignored. When opening
/// parentheses are left unclosed, the leftmost pair that did close wins.
fn balanced_range(value: &str) -> Option<(usize, usize)> {
    let bytes = value.as_bytes();
    let find = |from: usize, needle: u8| {
        bytes
            .get(from..)?
            .iter()
            .position(|&b| b == needle)
            .map(|offset| from + offset)
    };

    let first_open = find(0, b'(')?;
    let mut next_close = find(first_open + 1, b')');
    next_close?;
    let mut next_open = Some(first_open);

    let mut opens: Vec<usize> = Vec::new();
    let mut widest: Option<(usize, usize)> = None;
    let mut cursor = first_open;

    loop {
        if Some(cursor) == next_open {
            opens.push(cursor);
            next_open = find(cursor + 1, b'(');
        } else if opens.len() == 1 {
            return opens.pop().map(|open| (open, cursor));
        } else {
            let open = opens.pop()?;
            if widest.is_none_or(|(left, _)| open < left) {
                widest = Some((open, cursor));
            }
            next_close = find(cursor + 1, b')');
        }

        cursor = match (next_open, next_close) {
            (Some(open), Some(close)) if open < close => open,
            (_, Some(close)) => close,
            (_, None) => break,
        };
    }

    widest
}
