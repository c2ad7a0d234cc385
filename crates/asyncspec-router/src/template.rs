use thiserror::Error;

/// Errors produced while parsing a URL template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// An opening `{` has no matching `}`.
    #[error("malformed template {template:?}: missing '}}'")]
    MalformedTemplate { template: String },
}

/// The result of a successful template match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMatch<'a> {
    /// Captured placeholder values, in template order.
    pub values: Vec<&'a str>,
    /// The part of the input after the template, always starting with `/`.
    pub remaining: &'a str,
}

/// Extract placeholder names from a template, in order of appearance.
///
/// Each `{...}` span is trimmed of surrounding whitespace.
pub fn parameter_names(template: &str) -> Result<Vec<&str>, TemplateError> {
    let mut names = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        rest = &rest[open + 1..];
        let close = rest
            .find('}')
            .ok_or_else(|| TemplateError::MalformedTemplate {
                template: template.to_string(),
            })?;
        names.push(rest[..close].trim());
        rest = &rest[close + 1..];
    }

    Ok(names)
}

/// Match a concrete URL against a template.
///
/// Template and input are walked in lockstep. A placeholder consumes input
/// up to whichever comes first: the next occurrence of the literal byte
/// following the placeholder in the template, or a `/`. Without either it
/// consumes the rest of the input. Placeholder names are ignored; values are
/// positional.
///
/// The scan never backtracks, so matching is O(n). The price is that
/// ambiguous templates are resolved greedily: two adjacent placeholders with
/// no literal between them give everything up to the next `/` to the first
/// one and an empty value to the second.
///
/// After the template is consumed, the rest of the input becomes
/// [`TemplateMatch::remaining`]. An empty rest is normalized to `/`, and a
/// rest that does not start with `/` fails the match, so templates only
/// match at a path boundary. A trailing `/` in the template is optional in
/// the input.
///
/// Query strings are not handled here; see [`strip_query`].
pub fn match_template<'a>(template: &str, input: &'a str) -> Option<TemplateMatch<'a>> {
    let pattern = template.as_bytes();
    let bytes = input.as_bytes();
    let mut p = 0;
    let mut i = 0;
    let mut values = Vec::new();

    while p < pattern.len() {
        let c = pattern[p];

        if c == b'/' && p + 1 == pattern.len() {
            break;
        }

        if c == b'{' {
            let close = find_byte(&pattern[p..], b'}')?;
            p += close + 1;

            let rest = &bytes[i..];
            let next_literal = pattern.get(p).and_then(|&lit| find_byte(rest, lit));
            let next_slash = find_byte(rest, b'/');
            let end = match (next_literal, next_slash) {
                (Some(a), Some(b)) => a.min(b),
                (Some(a), None) | (None, Some(a)) => a,
                (None, None) => rest.len(),
            };

            values.push(&input[i..i + end]);
            i += end;
            continue;
        }

        if bytes.get(i) != Some(&c) {
            return None;
        }
        p += 1;
        i += 1;
    }

    let remaining = match &input[i..] {
        "" => "/",
        rest => rest,
    };
    if !remaining.starts_with('/') {
        return None;
    }

    Some(TemplateMatch { values, remaining })
}

/// Drop the query string (everything from the first `?`).
pub fn strip_query(url: &str) -> &str {
    match url.find('?') {
        Some(i) => &url[..i],
        None => url,
    }
}

fn find_byte(haystack: &[u8], needle: u8) -> Option<usize> {
    haystack.iter().position(|&b| b == needle)
}
