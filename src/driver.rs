//! Rendering every overlay of a drawing
//!
//! The driver owns the document and is its only mutator. Overlays are
//! rendered one after another: apply visibility, serialize to a temporary
//! file, run the exporter, remove the temporary file.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::catalog::LayerCatalog;
use crate::config::RunConfig;
use crate::document::style::set_layer_visibility;
use crate::document::SvgDocument;
use crate::error::OptionSource;
use crate::export::{ExportRequest, Exporter};
use crate::label::{apply_options, Applied};
use crate::planner::{OverlayBounds, OverlayPlan};
use crate::template::OutputTemplate;
use crate::OverlayError;

/// Where the driver is in its run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CatalogBuilt,
    OptionsApplied,
    BoundsComputed,
    Rendering(u32),
    Done,
}

/// Outcome of rendering all overlays
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Files the exporter reported as written, in overlay order
    pub outputs: Vec<PathBuf>,
    /// Overlays whose export failed
    pub failed: Vec<u32>,
}

impl RenderSummary {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct RenderDriver<E> {
    document: SvgDocument,
    catalog: LayerCatalog,
    template: OutputTemplate,
    exporter: E,
    config: RunConfig,
    bounds: Option<OverlayBounds>,
    stage: Stage,
}

impl<E: Exporter> RenderDriver<E> {
    /// Take ownership of a parsed document and build its layer catalog
    pub fn new(document: SvgDocument, template: OutputTemplate, exporter: E) -> Self {
        let catalog = LayerCatalog::from_document(&document);
        Self {
            document,
            catalog,
            template,
            exporter,
            config: RunConfig::default(),
            bounds: None,
            stage: Stage::CatalogBuilt,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn catalog(&self) -> &LayerCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Apply the options of every option layer, then the command line options
    ///
    /// Command line options come last and therefore win.
    pub fn apply_options<S: AsRef<str>>(&mut self, cli: &[S]) -> Result<Applied, OverlayError> {
        for layer in self.catalog.option_layers() {
            let tokens = layer.option_tokens().unwrap_or_default();
            let source = OptionSource::Layer {
                label: layer.label.clone(),
            };
            if apply_options(&mut self.config, &tokens, &source)? == Applied::HelpRequested {
                return Ok(Applied::HelpRequested);
            }
        }
        let applied = apply_options(&mut self.config, cli, &OptionSource::CommandLine)?;
        self.stage = Stage::OptionsApplied;
        tracing::debug!(format = %self.config.format, resolution = self.config.resolution, "options applied");
        Ok(applied)
    }

    /// Compute the overlay bounds and check that the template is wide enough
    pub fn compute_bounds(&mut self) -> Result<OverlayBounds, OverlayError> {
        let bounds = OverlayPlan::new(&self.catalog)
            .bounds()
            .ok_or(OverlayError::NoOverlays)?;
        self.template.ensure_fits(bounds.max)?;
        tracing::debug!(min = bounds.min, max = bounds.max, "computed overlay bounds");
        self.bounds = Some(bounds);
        self.stage = Stage::BoundsComputed;
        Ok(bounds)
    }

    /// Render every overlay, writing progress lines to `out`
    ///
    /// A failed export is logged and recorded in the summary; the remaining
    /// overlays are still rendered. Files written for earlier overlays are
    /// left in place when a later step fails.
    pub fn render<W: Write>(&mut self, out: &mut W) -> Result<RenderSummary, OverlayError> {
        let bounds = match self.bounds {
            Some(bounds) => bounds,
            None => self.compute_bounds()?,
        };
        let mut summary = RenderSummary::default();
        for index in bounds.indices() {
            self.stage = Stage::Rendering(index);
            let target = PathBuf::from(self.template.expand(index)?);
            self.show_overlay(index, out)?;
            match self.export_current(&target) {
                Ok(()) => summary.outputs.push(target),
                Err(OverlayError::Export(e)) => {
                    tracing::warn!(overlay = index, target = %target.display(), error = %e, "export failed");
                    summary.failed.push(index);
                }
                Err(e) => return Err(e),
            }
        }
        self.stage = Stage::Done;
        tracing::info!(
            rendered = summary.outputs.len(),
            failed = summary.failed.len(),
            "rendering finished"
        );
        Ok(summary)
    }

    /// Apply the visibility of overlay `index` to the document
    fn show_overlay<W: Write>(&mut self, index: u32, out: &mut W) -> Result<(), OverlayError> {
        writeln!(out, "Overlay {}", index)?;
        let plan = OverlayPlan::new(&self.catalog);
        for decision in plan.visibility(index) {
            let layer = decision.layer;
            writeln!(
                out,
                "layer \"{}\" {}visible",
                layer.label,
                if decision.visible { "" } else { "in" }
            )?;
            match self.document.find_element_by_attribute("id", &layer.id) {
                Some(node) => set_layer_visibility(&mut self.document, node, decision.visible),
                None => tracing::warn!(id = %layer.id, "layer element not found"),
            }
        }
        Ok(())
    }

    /// Serialize the document to a temporary file and export it to `target`
    fn export_current(&self, target: &Path) -> Result<(), OverlayError> {
        let mut temp = tempfile::Builder::new()
            .prefix("svg-overlays-")
            .suffix(".svg")
            .tempfile()?;
        {
            let mut out = BufWriter::new(temp.as_file_mut());
            self.document.write_to(&mut out)?;
            out.flush()?;
        }
        tracing::debug!(temp = %temp.path().display(), "serialized overlay");

        let request = ExportRequest {
            source: temp.path(),
            target,
            format: self.config.format,
            resolution: self.config.resolution,
        };
        // `temp` is removed when dropped, whatever the exporter did
        self.exporter.export(&request)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportFormat;
    use crate::document::style::is_hidden;
    use crate::export::ExportError;
    use std::cell::RefCell;

    const DRAWING: &str = r#"<svg xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">
  <g inkscape:groupmode="layer" id="a" inkscape:label="[1-2] A"/>
  <g inkscape:groupmode="layer" id="b" inkscape:label="[2-3] B"/>
  <g inkscape:groupmode="layer" id="opts" inkscape:label="-e PNG -r 200"/>
</svg>"#;

    #[derive(Default)]
    struct Recorder {
        jobs: RefCell<Vec<(PathBuf, ExportFormat, u32, bool)>>,
        written: RefCell<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl Exporter for Recorder {
        fn export(&self, request: &ExportRequest<'_>) -> Result<(), ExportError> {
            self.jobs.borrow_mut().push((
                request.target.to_path_buf(),
                request.format,
                request.resolution,
                request.source.exists(),
            ));
            if let Ok(xml) = std::fs::read_to_string(request.source) {
                self.written.borrow_mut().push(xml);
            }
            match self.fail_on {
                Some(name) if request.target == Path::new(name) => {
                    Err(ExportError::Other("boom".to_string()))
                }
                _ => Ok(()),
            }
        }
    }

    fn driver(recorder: &Recorder) -> RenderDriver<&Recorder> {
        let doc = SvgDocument::parse(DRAWING).unwrap();
        RenderDriver::new(doc, OutputTemplate::parse("f-#.png").unwrap(), recorder)
    }

    #[test]
    fn test_stages() {
        let recorder = Recorder::default();
        let mut driver = driver(&recorder);
        assert_eq!(driver.stage(), Stage::CatalogBuilt);
        driver.apply_options::<&str>(&[]).unwrap();
        assert_eq!(driver.stage(), Stage::OptionsApplied);
        driver.compute_bounds().unwrap();
        assert_eq!(driver.stage(), Stage::BoundsComputed);
        driver.render(&mut Vec::new()).unwrap();
        assert_eq!(driver.stage(), Stage::Done);
    }

    #[test]
    fn test_layer_options_then_cli() {
        let recorder = Recorder::default();
        let mut driver = driver(&recorder);
        driver.apply_options(&["-e", "EPS"]).unwrap();
        assert_eq!(driver.config().format, ExportFormat::Eps);
        assert_eq!(driver.config().resolution, 200);
    }

    #[test]
    fn test_render_exports_each_overlay() {
        let recorder = Recorder::default();
        let mut driver = driver(&recorder);
        driver.apply_options::<&str>(&[]).unwrap();
        let summary = driver.render(&mut Vec::new()).unwrap();
        assert_eq!(
            summary.outputs,
            vec![
                PathBuf::from("f-1.png"),
                PathBuf::from("f-2.png"),
                PathBuf::from("f-3.png")
            ]
        );
        assert!(summary.is_complete());
        let jobs = recorder.jobs.borrow();
        assert_eq!(jobs.len(), 3);
        assert!(jobs
            .iter()
            .all(|(_, format, dpi, existed)| *format == ExportFormat::Png && *dpi == 200 && *existed));
    }

    #[test]
    fn test_exported_source_holds_whole_overlay() {
        let recorder = Recorder::default();
        let mut driver = driver(&recorder);
        driver.render(&mut Vec::new()).unwrap();

        let written = recorder.written.borrow();
        assert_eq!(written.len(), 3);
        for (index, xml) in (1..).zip(written.iter()) {
            assert!(xml.trim_end().ends_with("</svg>"), "overlay {}", index);
            let doc = SvgDocument::parse(xml).unwrap();
            let shown = |id: &str| {
                let node = doc.find_element_by_attribute("id", id).unwrap();
                !is_hidden(&doc, node)
            };
            assert_eq!(shown("a"), index <= 2, "layer a on overlay {}", index);
            assert_eq!(shown("b"), index >= 2, "layer b on overlay {}", index);
            assert!(!shown("opts"));
        }
    }

    #[test]
    fn test_failed_export_does_not_stop_rendering() {
        let recorder = Recorder {
            fail_on: Some("f-2.png"),
            ..Default::default()
        };
        let mut driver = driver(&recorder);
        let summary = driver.render(&mut Vec::new()).unwrap();
        assert_eq!(summary.failed, vec![2]);
        assert_eq!(summary.outputs.len(), 2);
        assert_eq!(recorder.jobs.borrow().len(), 3);
    }

    #[test]
    fn test_template_too_narrow() {
        let doc = SvgDocument::parse(
            r#"<svg><g groupmode="layer" id="x" label="[9-10]"/></svg>"#,
        )
        .unwrap();
        let recorder = Recorder::default();
        let mut driver = RenderDriver::new(doc, OutputTemplate::parse("#.pdf").unwrap(), &recorder);
        let err = driver.compute_bounds().unwrap_err();
        assert!(matches!(err, OverlayError::Template(_)));
        assert!(recorder.jobs.borrow().is_empty());
    }

    #[test]
    fn test_no_overlays() {
        let doc = SvgDocument::parse(r#"<svg><g groupmode="layer" id="x" label="Base"/></svg>"#)
            .unwrap();
        let recorder = Recorder::default();
        let mut driver = RenderDriver::new(doc, OutputTemplate::parse("#.pdf").unwrap(), &recorder);
        assert!(matches!(driver.render(&mut Vec::new()), Err(OverlayError::NoOverlays)));
    }

    #[test]
    fn test_progress_lines() {
        let recorder = Recorder::default();
        let mut driver = driver(&recorder);
        let mut out = Vec::new();
        driver.render(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("Overlay 1\nlayer \"-e PNG -r 200\" invisible\nlayer \"[2-3] B\" invisible\nlayer \"[1-2] A\" visible\n"));
        assert!(out.contains("Overlay 3\n"));
    }
}
