//! URL template interpolation
//!
//! Handles `{name}` placeholders in resource templates such as
//! `/folders/{id}/documents/{docId}`. Values are percent-encoded the same way
//! a URI component is, so they can never introduce new path segments or
//! query parameters.

use crate::error::{Error, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Regex for matching placeholders: {name}
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").unwrap());

/// Characters left unescaped in a URI component
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single URI component
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Substitute positional argument values into a resource template
///
/// `names` is the operation's declared argument list and `values` the
/// caller-supplied arguments in the same order. The counts must match exactly;
/// every placeholder in the template must name a declared argument.
pub fn render_resource(
    operation: &str,
    template: &str,
    names: &[&str],
    values: &[&str],
) -> Result<String> {
    if names.len() != values.len() {
        return Err(Error::argument_count(operation, names.len(), values.len()));
    }

    let mut undefined = Vec::new();
    let rendered = PLACEHOLDER_REGEX.replace_all(template, |cap: &Captures<'_>| {
        let name = &cap[1];
        match names.iter().position(|n| *n == name) {
            Some(index) => encode_component(values[index]),
            None => {
                undefined.push(name.to_string());
                cap[0].to_string()
            }
        }
    });

    if undefined.is_empty() {
        Ok(rendered.into_owned())
    } else {
        Err(Error::undefined_var(undefined.join(", ")))
    }
}

/// Extract all placeholder names from a template, in order of appearance
pub fn extract_placeholders(template: &str) -> Vec<String> {
    PLACEHOLDER_REGEX
        .captures_iter(template)
        .map(|cap| cap[1].to_string())
        .collect()
}
