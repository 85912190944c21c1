//! Path template helpers.
//!
//! Route templates use the `{name}` brace syntax for parameters, e.g. `/items/{id}`.
//! Only well-formed `{word-characters}` tokens count as parameters; stray or unbalanced
//! braces are treated as literal text and simply yield fewer parameters.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

static PATH_PARAM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("path parameter regex should be valid"));

/// Extracts the parameter names embedded in a route template.
///
/// Names are returned in left-to-right order. A name repeated in the template is
/// returned once per occurrence.
///
/// # Example
///
/// ```
/// use espv2_openapi::path_params::extract_path_parameters;
///
/// assert_eq!(
///     extract_path_parameters("/users/{user_id}/posts/{post_id}"),
///     vec!["user_id".to_string(), "post_id".to_string()]
/// );
/// assert!(extract_path_parameters("/hello").is_empty());
/// ```
pub fn extract_path_parameters(path: &str) -> Vec<String> {
    PATH_PARAM_REGEX
        .captures_iter(path)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Derives the operation identifier base by stripping `/`, `{` and `}` from a template.
pub fn operation_id_base(path: &str) -> String {
    path.chars()
        .filter(|c| !matches!(c, '/' | '{' | '}'))
        .collect()
}

/// Finds the first two distinct templates that share an operation identifier base.
///
/// Stripping separators is lossy (`/a/b` and `/ab` both give `ab`), and a document with
/// repeated `operationId`s is not valid Swagger 2.0.
pub fn find_operation_id_clash<'a, I>(paths: I) -> Option<(&'a str, &'a str)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: HashMap<String, &'a str> = HashMap::new();
    for path in paths {
        match seen.entry(operation_id_base(path)) {
            Entry::Occupied(entry) if *entry.get() != path => return Some((*entry.get(), path)),
            Entry::Occupied(_) => {}
            Entry::Vacant(entry) => {
                entry.insert(path);
            }
        }
    }
    None
}
