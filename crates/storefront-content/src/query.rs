//! # GROQ Query Builder
//!
//! Builds filter expressions for the content API.
//!
//! ## Bound Parameters
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Values never enter the expression text.                               │
//! │                                                                         │
//! │  Query::documents("product").where_eq("slug.current", "slug", s)       │
//! │       │                                                                 │
//! │       ├── expression: *[_type == "product" && slug.current == $slug]   │
//! │       └── params:     $slug = "<s as JSON>"                             │
//! │                                                                         │
//! │  A slug like  x"] || true  stays a string value, not GROQ syntax.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Document types, field paths and projections are `&'static str`: only
//! parameter values come from request input.

use std::fmt;

use serde_json::Value;

/// A GROQ query with its bound parameters.
///
/// ## Example
/// ```rust
/// use storefront_content::Query;
///
/// let query = Query::documents("product")
///     .where_eq("slug.current", "slug", "speaker")
///     .first();
///
/// assert_eq!(
///     query.expression(),
///     r#"*[_type == "product" && slug.current == $slug][0]"#
/// );
/// assert_eq!(query.params()[0].1, "\"speaker\"");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    document_type: &'static str,
    conditions: Vec<(&'static str, &'static str)>,
    params: Vec<(&'static str, Value)>,
    projection: Option<&'static str>,
    first: bool,
}

impl Query {
    /// All documents of one type: `*[_type == "<type>"]`.
    pub fn documents(document_type: &'static str) -> Self {
        Query {
            document_type,
            conditions: Vec::new(),
            params: Vec::new(),
            projection: None,
            first: false,
        }
    }

    /// Adds `&& <field> == $<param>` and binds the parameter.
    pub fn where_eq(
        mut self,
        field: &'static str,
        param: &'static str,
        value: impl Into<Value>,
    ) -> Self {
        self.conditions.push((field, param));
        self.params.push((param, value.into()));
        self
    }

    /// Sets the projection, e.g. `{ slug { current } }`.
    pub fn project(mut self, projection: &'static str) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Selects only the first match (`[0]`); the result is then a
    /// document or `null`.
    pub fn first(mut self) -> Self {
        self.first = true;
        self
    }

    /// Whether the query returns at most one document.
    pub fn is_single(&self) -> bool {
        self.first
    }

    /// Renders the GROQ expression.
    pub fn expression(&self) -> String {
        let mut filter = format!("_type == \"{}\"", self.document_type);
        for (field, param) in &self.conditions {
            filter.push_str(&format!(" && {} == ${}", field, param));
        }

        let mut expression = format!("*[{}]", filter);
        if self.first {
            expression.push_str("[0]");
        }
        if let Some(projection) = self.projection {
            expression.push(' ');
            expression.push_str(projection);
        }
        expression
    }

    /// Parameters as URL query pairs: (`$name`, JSON-encoded value).
    pub fn params(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(name, value)| (format!("${}", name), value.to_string()))
            .collect()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression())
    }
}
