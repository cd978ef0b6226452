//! Structured validation failures.
//!
//! A [`ValidationError`] is an ordered list of [`Issue`]s, each pointing at the
//! location of the offending value with a path of keys and list indices.

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::response::ErrorDetails;

/// Field name under which messages with an empty path are grouped.
pub const ROOT_FIELD: &str = "root";

/// Key `validator` uses for struct-level (schema) errors.
const SCHEMA_KEY: &str = "__all__";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl Issue {
    pub fn new<P>(path: impl IntoIterator<Item = P>, message: impl Into<String>) -> Self
    where
        P: Into<PathSegment>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }

    /// Issue about the input as a whole.
    pub fn root(message: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            message: message.into(),
        }
    }

    /// Dotted path, or [`ROOT_FIELD`] when the path is empty.
    pub fn field(&self) -> String {
        if self.path.is_empty() {
            return ROOT_FIELD.to_string();
        }
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field(), self.message)
    }
}

/// Input failed schema validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub struct ValidationError {
    issues: Vec<Issue>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issue(mut self, issue: Issue) -> Self {
        self.push(issue);
        self
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Groups issue messages by dotted path.
    ///
    /// Fields appear in the order they are first seen, and messages keep
    /// their order within a field.
    pub fn field_errors(&self) -> IndexMap<String, Vec<String>> {
        let mut fields: IndexMap<String, Vec<String>> = IndexMap::new();
        for issue in &self.issues {
            fields
                .entry(issue.field())
                .or_default()
                .push(issue.message.clone());
        }
        fields
    }

    pub fn details(&self) -> ErrorDetails {
        ErrorDetails {
            fields: self.field_errors(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return f.write_str("validation failed");
        }
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl FromIterator<Issue> for ValidationError {
    fn from_iter<I: IntoIterator<Item = Issue>>(iter: I) -> Self {
        Self {
            issues: iter.into_iter().collect(),
        }
    }
}

impl From<ValidationErrors> for ValidationError {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = ValidationError::new();
        collect_issues(&errors, &mut Vec::new(), &mut out);
        out
    }
}

fn collect_issues(
    errors: &ValidationErrors,
    prefix: &mut Vec<PathSegment>,
    out: &mut ValidationError,
) {
    // `validator` keeps errors in a HashMap; sort so output is stable.
    let mut entries: Vec<(String, &ValidationErrorsKind)> = errors
        .errors()
        .iter()
        .map(|(key, kind)| (key.to_string(), kind))
        .collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    for (key, kind) in entries {
        let pushed = key != SCHEMA_KEY;
        if pushed {
            prefix.push(PathSegment::Key(key));
        }
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = match &error.message {
                        Some(message) => message.to_string(),
                        None => format!("Invalid value ({})", error.code),
                    };
                    out.push(Issue {
                        path: prefix.clone(),
                        message,
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_issues(nested, prefix, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    prefix.push(PathSegment::Index(*index));
                    collect_issues(nested, prefix, out);
                    prefix.pop();
                }
            }
        }
        if pushed {
            prefix.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn groups_by_dotted_path_and_root() {
        let error = ValidationError::new()
            .with_issue(Issue::new(["a", "b"], "first"))
            .with_issue(Issue::root("whole input is wrong"))
            .with_issue(Issue::new(["a", "b"], "second"));

        let fields = error.field_errors();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["a.b"], vec!["first", "second"]);
        assert_eq!(fields["root"], vec!["whole input is wrong"]);
        assert_eq!(fields.keys().collect::<Vec<_>>(), ["a.b", "root"]);
    }

    #[test]
    fn index_segments_render_as_numbers() {
        let issue = Issue::new(
            [PathSegment::from("items"), 2.into(), "name".into()],
            "Required",
        );
        assert_eq!(issue.field(), "items.2.name");
        assert_eq!(issue.to_string(), "items.2.name: Required");
    }

    #[test]
    fn display_joins_issues() {
        let error: ValidationError = [Issue::new(["name"], "too short"), Issue::root("bad")]
            .into_iter()
            .collect();
        assert_eq!(error.to_string(), "name: too short; root: bad");
        assert_eq!(error.len(), 2);
    }

    #[derive(Debug, Validate)]
    struct Tag {
        #[validate(length(min = 1, message = "Tag label is required"))]
        label: String,
    }

    #[derive(Debug, Validate)]
    struct Limits {
        #[validate(range(min = 1, max = 10))]
        seats: u32,
    }

    #[derive(Debug, Validate)]
    struct Input {
        #[validate(length(min = 3, message = "Name is too short"))]
        name: String,
        #[validate(nested)]
        limits: Limits,
        #[validate(nested)]
        tags: Vec<Tag>,
    }

    #[test]
    fn converts_validator_errors_with_nested_paths() {
        let input = Input {
            name: "x".to_string(),
            limits: Limits { seats: 0 },
            tags: vec![
                Tag {
                    label: "ok".to_string(),
                },
                Tag {
                    label: String::new(),
                },
            ],
        };
        let error = ValidationError::from(input.validate().unwrap_err());

        let fields = error.field_errors();
        assert_eq!(fields["name"], vec!["Name is too short"]);
        assert_eq!(fields["limits.seats"], vec!["Invalid value (range)"]);
        assert_eq!(fields["tags.1.label"], vec!["Tag label is required"]);
        // sorted by key at each level
        assert_eq!(
            fields.keys().collect::<Vec<_>>(),
            ["limits.seats", "name", "tags.1.label"]
        );
    }
}
