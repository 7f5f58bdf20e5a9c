//! The contract between the route table and the views it mounts.

use serde::Serialize;

use crate::routing::{Params, RouteTable};

/// A renderable view bound to one or more routes.
///
/// Views are shared (`Arc<dyn View>`): the route table only references them
/// and never owns their lifecycle.
pub trait View: Send + Sync + std::fmt::Debug {
    /// Identifier used by the configuration to reference this view.
    fn id(&self) -> &str;

    /// Produce what gets mounted into the application outlet.
    fn mount(&self, ctx: &MountContext<'_>) -> Mounted;
}

/// Everything a view receives when it is mounted.
#[derive(Debug, Clone, Copy)]
pub struct MountContext<'a> {
    /// Matched route name, `None` when mounted as a fallback.
    pub route: Option<&'a str>,
    /// The navigable path that was requested.
    pub path: &'a str,
    pub params: &'a Params,
    /// The table, for views that link to other routes.
    pub table: &'a RouteTable,
}

/// A mounted view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mounted {
    pub view: String,
    pub title: String,
    /// CSS selector of the element the view renders into.
    pub target: String,
    /// HTML fragment placed into the target.
    pub body: String,
}

/// Minimal HTML escaping for text and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
        assert_eq!(escape_html("elastic-box"), "elastic-box");
    }
}
