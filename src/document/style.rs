//! Layer visibility through the inline `style` attribute

use super::{NodeId, SvgDocument};

/// Rewrite a style declaration list so that it ends in the given display value
///
/// Existing `display` declarations are dropped; all other declarations keep
/// their order.
pub fn with_display(style: Option<&str>, visible: bool) -> String {
    let mut declarations: Vec<&str> = style
        .unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|decl| !decl.is_empty())
        .filter(|decl| {
            decl.split_once(':')
                .map_or(true, |(prop, _)| prop.trim() != "display")
        })
        .collect();
    let display = if visible {
        "display:inline"
    } else {
        "display:none"
    };
    declarations.push(display);
    declarations.join(";")
}

/// Show or hide a layer element
pub fn set_layer_visibility(doc: &mut SvgDocument, node: NodeId, visible: bool) {
    let style = doc.attribute(node, "style");
    doc.set_attribute(node, "style", &with_display(style.as_deref(), visible));
}

/// Whether an element is currently hidden by its inline style
pub fn is_hidden(doc: &SvgDocument, node: NodeId) -> bool {
    doc.attribute(node, "style").is_some_and(|style| {
        style.split(';').any(|decl| {
            decl.split_once(':')
                .is_some_and(|(prop, value)| prop.trim() == "display" && value.trim() == "none")
        })
    })
}
