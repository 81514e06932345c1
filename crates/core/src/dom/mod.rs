use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Elements whose content is never visible text.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Parse an HTML string and return its text nodes concatenated in document order.
///
/// No separator is inserted between nodes, so adjacent table cells such as
/// `<td>1</td><td>█</td><td>1</td>` join to `1█1` the same way tag stripping
/// joins them. Entities are decoded by the parser. Whitespace is left as-is.
pub fn text_content(html: &str) -> String {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    };

    let dom = parse_document(RcDom::default(), opts).one(html);

    let mut out = String::new();
    collect_text(&dom.document, &mut out);
    out
}

fn collect_text(handle: &Handle, out: &mut String) {
    match &handle.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        NodeData::Element { name, .. } => {
            if SKIPPED_TAGS.contains(&&*name.local) {
                return;
            }
            for child in handle.children.borrow().iter() {
                collect_text(child, out);
            }
        }
        NodeData::Document => {
            for child in handle.children.borrow().iter() {
                collect_text(child, out);
            }
        }
        // Comments, doctypes, processing instructions
        _ => {}
    }
}
