//! Layers discovered in a drawing

use crate::document::SvgDocument;
use crate::label::{is_option_label, parse_ranges, tokenize_options, RangeSequence};

/// A visibility-toggleable group of the drawing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    /// Value of the element's `id` attribute
    pub id: String,
    /// Display label (`inkscape:label`), empty if the layer has none
    pub label: String,
}

impl Layer {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Overlay ranges from this layer's label
    pub fn ranges(&self) -> RangeSequence<'_> {
        parse_ranges(&self.label)
    }

    /// Option tokens, if the label carries options
    pub fn option_tokens(&self) -> Option<Vec<String>> {
        is_option_label(&self.label).then(|| tokenize_options(&self.label))
    }
}

/// Ordered collection of layers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerCatalog {
    layers: Vec<Layer>,
}

impl LayerCatalog {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    /// Collect every `g` element with `groupmode="layer"`, sublayers included
    ///
    /// Layers are listed topmost first, i.e. in reverse document order, which
    /// is the order the layers panel shows them in. Layers without an `id`
    /// cannot be addressed later and are left out.
    pub fn from_document(doc: &SvgDocument) -> Self {
        let mut layers = Vec::new();
        for node in doc.elements() {
            if doc.element_name(node).as_deref() != Some("g")
                || doc.attribute(node, "groupmode").as_deref() != Some("layer")
            {
                continue;
            }
            let label = doc.attribute(node, "label").unwrap_or_default();
            match doc.attribute(node, "id") {
                Some(id) => layers.push(Layer { id, label }),
                None => tracing::warn!(label = %label, "skipping layer without an id"),
            }
        }
        layers.reverse();
        tracing::debug!(count = layers.len(), "built layer catalog");
        Self { layers }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layers whose labels carry options, in catalog order
    pub fn option_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|l| is_option_label(&l.label))
    }
}

impl<'a> IntoIterator for &'a LayerCatalog {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DRAWING: &str = r#"<svg xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">
  <g inkscape:groupmode="layer" id="bottom" inkscape:label="[1-3] Base">
    <g inkscape:groupmode="layer" id="nested" inkscape:label="[2]"/>
    <g id="plain-group" inkscape:label="[5]"/>
  </g>
  <g inkscape:groupmode="layer" inkscape:label="[9] no id"/>
  <g inkscape:groupmode="layer" id="unlabelled"/>
  <g inkscape:groupmode="layer" id="opts" inkscape:label="-e  PNG"/>
</svg>"#;

    #[test]
    fn test_from_document() {
        let doc = SvgDocument::parse(DRAWING).unwrap();
        let catalog = LayerCatalog::from_document(&doc);
        assert_eq!(
            catalog.iter().cloned().collect::<Vec<_>>(),
            vec![
                Layer::new("opts", "-e  PNG"),
                Layer::new("unlabelled", ""),
                Layer::new("nested", "[2]"),
                Layer::new("bottom", "[1-3] Base"),
            ]
        );
    }

    #[test]
    fn test_layer_without_id_is_skipped() {
        let doc = SvgDocument::parse(DRAWING).unwrap();
        let catalog = LayerCatalog::from_document(&doc);
        assert_eq!(catalog.len(), 4);
        assert!(catalog.iter().all(|l| l.label != "[9] no id"));
    }

    #[test]
    fn test_option_layers() {
        let doc = SvgDocument::parse(DRAWING).unwrap();
        let catalog = LayerCatalog::from_document(&doc);
        let opts: Vec<_> = catalog.option_layers().map(|l| l.id.as_str()).collect();
        assert_eq!(opts, vec!["opts"]);
        assert_eq!(
            catalog.iter().next().and_then(Layer::option_tokens),
            Some(vec!["-e".to_string(), "PNG".to_string()])
        );
    }

    #[test]
    fn test_layer_ranges() {
        let layer = Layer::new("a", "[1-3,5]");
        assert_eq!(layer.ranges().count(), 2);
        assert!(layer.option_tokens().is_none());
    }

    #[test]
    fn test_empty_document() {
        let doc = SvgDocument::parse("<svg/>").unwrap();
        let catalog = LayerCatalog::from_document(&doc);
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
    }
}
