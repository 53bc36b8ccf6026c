//! Path templates: normalization, compilation into matchers, and reverse filling.

use crate::error::ConfigurationError;
use crate::PathParams;

/// Collapses slashes: one leading `/`, no empty segment, no trailing `/` except for the root
pub(crate) fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len() + 1);
    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        normalized.push('/');
        normalized.push_str(segment);
    }

    if normalized.is_empty() {
        normalized.push('/');
    }
    normalized
}

/// A compiled path template.
///
/// Literal segments match themselves, a `{name}` segment matches one non-empty segment.
/// The whole request path must match, a trailing extra segment is a miss. Catch-all
/// segments (`{*rest}`) are rejected since a placeholder never spans a `/`.
pub(crate) struct PathPattern {
    matcher: matchit::Router<()>,
}

impl PathPattern {
    pub(crate) fn compile(template: &str) -> Result<Self, ConfigurationError> {
        if template.contains("{*") {
            return Err(ConfigurationError::malformed_template(template, "catch-all placeholders are not supported"));
        }

        let mut matcher = matchit::Router::new();
        matcher.insert(template, ()).map_err(|e| ConfigurationError::malformed_template(template, e))?;
        Ok(Self { matcher })
    }

    pub(crate) fn matches(&self, path: &str) -> Option<PathParams> {
        let matched = self.matcher.at(path).ok()?;
        if matched.params.iter().any(|(_, value)| value.is_empty()) {
            return None;
        }
        Some(matched.params.iter().collect())
    }
}

/// Replaces every `{key}` with the supplied value, placeholders without a value stay as they are
pub(crate) fn fill_template<I, K, V>(template: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let params = params.into_iter().collect::<Vec<_>>();
    let lookup = |key: &str| params.iter().rev().find(|(k, _)| k.as_ref() == key).map(|(_, v)| v.as_ref());

    let mut filled = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        filled.push_str(&rest[..start]);
        let tail = &rest[start..];
        let Some(end) = tail.find('}') else {
            filled.push_str(tail);
            return filled;
        };

        match lookup(&tail[1..end]) {
            Some(value) => filled.push_str(value),
            None => filled.push_str(&tail[..=end]),
        }
        rest = &tail[end + 1..];
    }
    filled.push_str(rest);
    filled
}
