//! Editing session: the loaded source, the active region, the effect
//! configuration, and the derived processed image.
//!
//! Every mutating handler finishes with a full recompute before it
//! returns, so [`Session::processed`] always reflects the current state.
//! Handlers invoked before an image is loaded are no-ops.
//!
//! Recomputes replace the processed buffer wholesale; a clone taken from a
//! previous call stays a consistent snapshot.

use image::RgbImage;

use crate::engine;
use crate::events::SessionEvent;
use crate::preview::{self, PREVIEW_WIDTH};
use crate::selection::{self, DragTracker, PreviewPoint, SourceRect};
use crate::types::{Dimensions, EffectConfig, MorphOp, Parameter, PipelineError, Raster, Toggle};

/// Image currently loaded into a session, with its derived buffers.
#[derive(Debug, Clone)]
struct Loaded {
    /// Decoded source, never modified.
    source: Raster,
    /// Active region of interest in source pixels.
    region: Option<SourceRect>,
    /// Pipeline input: `source` cropped to `region`.
    input: Raster,
    /// Result of the last recompute.
    processed: Raster,
}

/// A single-image editing session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: EffectConfig,
    loaded: Option<Loaded>,
    drag: DragTracker,
}

impl Session {
    /// Create an empty session with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session with a pre-built configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if `config` fails
    /// validation.
    pub fn with_config(config: EffectConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Replace the loaded image, clearing any region and in-progress drag.
    ///
    /// The effect configuration carries over to the new image.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if `source` has no pixels.
    /// The previous image stays loaded in that case.
    pub fn load(&mut self, source: Raster) -> Result<(), PipelineError> {
        let processed = engine::recompute(&source, &self.config)?;
        let dims = source.dimensions();
        log::debug!(
            "loaded {}x{} source with {} channel(s)",
            dims.width,
            dims.height,
            source.channels(),
        );
        self.loaded = Some(Loaded {
            input: source.clone(),
            source,
            region: None,
            processed,
        });
        self.drag.cancel();
        Ok(())
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    #[must_use]
    pub const fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// The decoded source image.
    #[must_use]
    pub fn source(&self) -> Option<&Raster> {
        self.loaded.as_ref().map(|l| &l.source)
    }

    /// The pipeline input (the source cropped to the active region).
    #[must_use]
    pub fn input(&self) -> Option<&Raster> {
        self.loaded.as_ref().map(|l| &l.input)
    }

    /// The active region of interest, in source pixels.
    #[must_use]
    pub fn region(&self) -> Option<SourceRect> {
        self.loaded.as_ref().and_then(|l| l.region)
    }

    /// The latest processed image.
    #[must_use]
    pub fn processed(&self) -> Option<&Raster> {
        self.loaded.as_ref().map(|l| &l.processed)
    }

    /// Three-channel preview of the pipeline input, at [`PREVIEW_WIDTH`].
    ///
    /// Pointer coordinates delivered to [`Session::pointer_press`] and
    /// friends are in this preview's pixel space.
    #[must_use]
    pub fn input_preview(&self) -> Option<RgbImage> {
        self.input().map(preview::preview)
    }

    /// Three-channel preview of the processed image, at [`PREVIEW_WIDTH`].
    #[must_use]
    pub fn processed_preview(&self) -> Option<RgbImage> {
        self.processed().map(preview::preview)
    }

    /// Dimensions of [`Session::input_preview`] without rendering it.
    #[must_use]
    pub fn input_preview_dimensions(&self) -> Option<Dimensions> {
        self.input()
            .map(|input| preview::preview_dimensions(input.dimensions(), PREVIEW_WIDTH))
    }

    /// Re-derive the processed image from the pipeline input.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if no image is loaded.
    pub fn recompute(&mut self) -> Result<&Raster, PipelineError> {
        let Some(loaded) = self.loaded.as_mut() else {
            return Err(PipelineError::InvalidConfig(
                "no source image loaded".to_string(),
            ));
        };
        loaded.processed = engine::recompute(&loaded.input, &self.config)?;
        Ok(&loaded.processed)
    }

    /// Recompute if an image is loaded, otherwise do nothing.
    fn refresh(&mut self) -> Result<(), PipelineError> {
        if self.is_loaded() {
            self.recompute()?;
        }
        Ok(())
    }

    /// Record one activation of a parity toggle.
    ///
    /// # Errors
    ///
    /// Propagates recompute failures.
    pub fn set_toggle(&mut self, toggle: Toggle) -> Result<(), PipelineError> {
        if !self.is_loaded() {
            return Ok(());
        }
        self.config.toggles.activate(toggle);
        log::debug!(
            "{toggle:?} activated ({} time(s))",
            self.config.toggles.count(toggle),
        );
        self.refresh()
    }

    /// Append a morphology step to the end of the log.
    ///
    /// # Errors
    ///
    /// Propagates recompute failures.
    pub fn push_morphology(&mut self, op: MorphOp) -> Result<(), PipelineError> {
        if !self.is_loaded() {
            return Ok(());
        }
        self.config.morphology.push(op);
        self.refresh()
    }

    /// Change one continuous parameter.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if the value is out of
    /// range; the session is left unchanged.
    pub fn set_parameter(&mut self, parameter: Parameter) -> Result<(), PipelineError> {
        if !self.is_loaded() {
            return Ok(());
        }
        self.config.set_parameter(parameter)?;
        self.refresh()
    }

    /// Make `region` (in source pixels) the pipeline input.
    ///
    /// The effect configuration is kept and applied to the new region.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptySelection`] for a zero-area region
    /// and [`PipelineError::InvalidConfig`] if it extends past the source.
    pub fn set_region(&mut self, region: SourceRect) -> Result<(), PipelineError> {
        let Some(loaded) = self.loaded.as_mut() else {
            return Ok(());
        };
        let input = selection::crop(&loaded.source, &region)?;
        let processed = engine::recompute(&input, &self.config)?;
        log::debug!("region set to {region:?}");
        loaded.region = Some(region);
        loaded.input = input;
        loaded.processed = processed;
        Ok(())
    }

    /// Drop the active region so the full source becomes the input again.
    ///
    /// # Errors
    ///
    /// Propagates recompute failures.
    pub fn clear_region(&mut self) -> Result<(), PipelineError> {
        let Some(loaded) = self.loaded.as_mut() else {
            return Ok(());
        };
        if loaded.region.take().is_some() {
            loaded.input = loaded.source.clone();
            self.refresh()?;
        }
        Ok(())
    }

    /// Crop to a rectangle dragged on the input preview.
    ///
    /// The drag is mapped against the current pipeline input and then
    /// translated into source pixels, so nested selections keep narrowing
    /// the region.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptySelection`] for degenerate drags. The
    /// session is unchanged on error.
    pub fn select(
        &mut self,
        start: PreviewPoint,
        end: PreviewPoint,
    ) -> Result<Option<SourceRect>, PipelineError> {
        let Some(loaded) = self.loaded.as_ref() else {
            return Ok(None);
        };
        let local = selection::map_drag_to_source_rect(
            start,
            end,
            loaded.input.dimensions(),
            PREVIEW_WIDTH,
        )?;
        let region = match loaded.region {
            Some(origin) => local.offset_by(&origin),
            None => local,
        };
        self.set_region(region)?;
        Ok(Some(region))
    }

    /// Pointer pressed on the input preview.
    pub const fn pointer_press(&mut self, point: PreviewPoint) {
        if self.loaded.is_some() {
            self.drag.press(point);
        }
    }

    /// Pointer moved while possibly dragging.
    pub const fn pointer_motion(&mut self, point: PreviewPoint) {
        self.drag.motion(point);
    }

    /// Pointer released: commit the drag as a new region.
    ///
    /// Degenerate drags are ignored. Returns the new region in source
    /// pixels, or `None` if nothing changed.
    ///
    /// # Errors
    ///
    /// Propagates recompute failures.
    pub fn pointer_release(
        &mut self,
        point: PreviewPoint,
    ) -> Result<Option<SourceRect>, PipelineError> {
        let Some((start, end)) = self.drag.release(point) else {
            return Ok(None);
        };
        match self.select(start, end) {
            Err(PipelineError::EmptySelection) => {
                log::debug!("ignoring empty selection {start:?} -> {end:?}");
                Ok(None)
            }
            other => other,
        }
    }

    /// The in-progress drag rectangle, for rubber-band rendering.
    #[must_use]
    pub const fn drag(&self) -> Option<(PreviewPoint, PreviewPoint)> {
        self.drag.current()
    }

    /// Dispatch an input event to the matching handler.
    ///
    /// # Errors
    ///
    /// Propagates the handler's error.
    pub fn handle(&mut self, event: SessionEvent) -> Result<(), PipelineError> {
        match event {
            SessionEvent::Toggle { toggle } => self.set_toggle(toggle),
            SessionEvent::Morphology { op } => self.push_morphology(op),
            SessionEvent::SetParameter { parameter } => self.set_parameter(parameter),
            SessionEvent::PointerPress { x, y } => {
                self.pointer_press(PreviewPoint::new(x, y));
                Ok(())
            }
            SessionEvent::PointerMove { x, y } => {
                self.pointer_motion(PreviewPoint::new(x, y));
                Ok(())
            }
            SessionEvent::PointerRelease { x, y } => {
                self.pointer_release(PreviewPoint::new(x, y)).map(|_| ())
            }
            SessionEvent::SetRegion { region } => self.set_region(region),
            SessionEvent::ClearRegion => self.clear_region(),
        }
    }
}
