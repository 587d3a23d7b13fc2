//! Message extraction from HTML error pages.
//!
//! When the reverse proxy in front of Nexus Dashboard is overloaded or a
//! route does not exist, it answers with an HTML page instead of JSON. This
//! module pulls the human readable sentences out of such a page so they can
//! be surfaced in an error.

use ego_tree::iter::Edge;
use scraper::{Html, Node};

/// Message returned when a page yields no text.
pub const EMPTY_HTML_MESSAGE: &str = "Empty ND HTML Response";

/// Tags whose following text is collected.
const ARMING_TAGS: [&str; 3] = ["a", "p", "body"];

/// Extracts the error message from an HTML error page.
///
/// The document is walked in order, looking at every start tag, end tag and
/// text run. After an `a`, `p` or `body` tag (opening or closing) the next
/// non-blank text is trimmed and collected; tags and blank text in between
/// are skipped. Collected fragments are joined with single spaces. Returns
/// [`EMPTY_HTML_MESSAGE`] when nothing is collected.
///
/// Never fails: malformed markup is repaired by the parser.
///
/// # Example
///
/// ```rust
/// use nd_client::clients::extract_error_message;
///
/// let page = "<html><body><h1>502 Bad Gateway</h1><p>Try again.</p></body></html>";
/// assert_eq!(extract_error_message(page), "502 Bad Gateway Try again.");
/// ```
#[must_use]
pub fn extract_error_message(body: &str) -> String {
    let document = Html::parse_document(body);
    let mut collector = Collector {
        // The parser adds a body element to every document; only an
        // explicit one counts.
        body_arms: body.to_ascii_lowercase().contains("<body"),
        armed: false,
        fragments: Vec::new(),
    };
    collector.walk(&document);

    if collector.fragments.is_empty() {
        EMPTY_HTML_MESSAGE.to_string()
    } else {
        collector.fragments.join(" ")
    }
}

struct Collector {
    body_arms: bool,
    armed: bool,
    fragments: Vec<String>,
}

impl Collector {
    fn walk(&mut self, document: &Html) {
        for edge in document.root_element().traverse() {
            match edge {
                Edge::Open(node) => match node.value() {
                    Node::Element(element) => self.on_tag(element.name()),
                    Node::Text(text) => self.on_text(text),
                    _ => {}
                },
                Edge::Close(node) => {
                    if let Node::Element(element) = node.value() {
                        self.on_tag(element.name());
                    }
                }
            }
        }
    }

    fn on_tag(&mut self, name: &str) {
        if !self.armed {
            self.armed = ARMING_TAGS.contains(&name) && (name != "body" || self.body_arms);
        }
    }

    fn on_text(&mut self, text: &str) {
        let trimmed = text.trim();
        if !self.armed {
            return;
        }
        if !trimmed.is_empty() {
            self.fragments.push(trimmed.to_string());
            self.armed = false;
        }
    }
}
