//! retouch-pipeline: pure effect pipeline and selection mapping (sans-IO).
//!
//! Derives a processed image from a source raster and an
//! [`EffectConfig`] through a fixed sequence of stages:
//! parity toggles (flip -> grayscale -> negative -> binarize) ->
//! morphology log -> threshold -> rotation -> gamma.
//!
//! A [`Session`] ties the pipeline to an interactive front end: it owns the
//! loaded source, the effect configuration, the active region of interest
//! and the derived buffers, and recomputes after every event. Drags on the
//! fixed-width preview are mapped back to source pixels by the
//! [`selection`] module.
//!
//! This crate has **no I/O dependencies**: it operates on in-memory
//! rasters. Decoding and encoding files lives in `retouch-io`.

pub mod engine;
pub mod events;
pub mod geometry;
pub mod grayscale;
pub mod morphology;
pub mod preview;
pub mod selection;
pub mod session;
pub mod tone;
pub mod types;

pub use engine::recompute;
pub use events::SessionEvent;
pub use preview::PREVIEW_WIDTH;
pub use selection::{DragTracker, PreviewPoint, SourceRect, map_drag_to_source_rect};
pub use session::Session;
pub use types::{
    Dimensions, EffectConfig, GrayImage, MorphOp, Parameter, PipelineError, Raster, RgbImage,
    Toggle, ToggleCounts,
};
