//! Overlay bounds and per-overlay layer visibility

use std::ops::RangeInclusive;

use crate::catalog::{Layer, LayerCatalog};

/// Smallest and largest overlay index named by any layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayBounds {
    pub min: u32,
    pub max: u32,
}

impl OverlayBounds {
    /// Every overlay index to render, in order
    pub fn indices(&self) -> RangeInclusive<u32> {
        self.min..=self.max
    }

    /// Number of overlays to render
    pub fn count(&self) -> usize {
        (self.max - self.min) as usize + 1
    }
}

/// Visibility decision for one layer at one overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerVisibility<'a> {
    pub layer: &'a Layer,
    pub visible: bool,
}

/// Answers which layers are shown on which overlay
///
/// Labels are parsed again for every question; nothing is cached between
/// calls.
#[derive(Debug, Clone, Copy)]
pub struct OverlayPlan<'a> {
    catalog: &'a LayerCatalog,
}

impl<'a> OverlayPlan<'a> {
    pub fn new(catalog: &'a LayerCatalog) -> Self {
        Self { catalog }
    }

    /// Fold every range of every layer into overall bounds
    ///
    /// Returns `None` when no layer carries a parseable overlay range, in
    /// which case there is nothing to render.
    pub fn bounds(&self) -> Option<OverlayBounds> {
        self.catalog
            .iter()
            .flat_map(Layer::ranges)
            .fold(None, |acc: Option<OverlayBounds>, r| {
                Some(match acc {
                    None => OverlayBounds { min: r.lo, max: r.hi },
                    Some(b) => OverlayBounds {
                        min: b.min.min(r.lo),
                        max: b.max.max(r.hi),
                    },
                })
            })
    }

    pub fn has_work(&self) -> bool {
        self.bounds().is_some()
    }

    /// Whether `layer` is shown on overlay `index`
    ///
    /// A layer without overlay ranges is never shown.
    pub fn is_visible(&self, layer: &Layer, index: u32) -> bool {
        layer.ranges().any(|r| r.contains(index))
    }

    /// Visibility of every layer on overlay `index`, in catalog order
    pub fn visibility(&self, index: u32) -> Vec<LayerVisibility<'a>> {
        self.catalog
            .iter()
            .map(|layer| LayerVisibility {
                layer,
                visible: self.is_visible(layer, index),
            })
            .collect()
    }
}
