//! Placement entry point: `(config, page) -> instances`.
//!
//! This is the only place a [`SeededGenerator`] is constructed. Both
//! rendering surfaces consume the list produced here and never draw random
//! numbers themselves.

use crate::constants::MAX_INSTANCES_PER_RUN;

use super::instance::{InstanceSink, WatermarkInstance};
use super::layers;
use super::pattern::{place_diagonal, place_grid, place_single};
use super::position::Page;
use super::rng::SeededGenerator;
use super::{Pattern, WatermarkConfig, WatermarkError};

/// Bounds applied to one placement run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementLimits {
    pub max_instances: usize,
}

impl Default for PlacementLimits {
    fn default() -> Self {
        Self {
            max_instances: MAX_INSTANCES_PER_RUN,
        }
    }
}

/// Result of a placement run.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub instances: Vec<WatermarkInstance>,
    /// Whether the instance limit cut the run short
    pub truncated: bool,
}

/// Compute the ordered instance list for a page.
pub fn place(
    config: &WatermarkConfig,
    page: &Page,
) -> Result<Vec<WatermarkInstance>, WatermarkError> {
    place_with_limits(config, page, &PlacementLimits::default()).map(|p| p.instances)
}

/// Compute the ordered instance list under explicit limits.
///
/// The configuration and page are validated first; nothing is drawn from the
/// generator when either is rejected.
pub fn place_with_limits(
    config: &WatermarkConfig,
    page: &Page,
    limits: &PlacementLimits,
) -> Result<Placement, WatermarkError> {
    config.validate()?;
    page.validate()?;

    let mut sink = InstanceSink::new(limits.max_instances);

    match config.pattern {
        Pattern::Single => place_single(config, page, &mut sink),
        Pattern::Repeat | Pattern::Grid => place_grid(config, page, &mut sink),
        Pattern::Diagonal => place_diagonal(config, page, &mut sink),
        Pattern::Paranoid | Pattern::AntiRemoval => {
            let mut gen = SeededGenerator::new(config.effective_seed());
            layers::compose(config, page, &config.layer_set(), &mut gen, &mut sink);
        }
    }

    let truncated = sink.is_truncated();
    if truncated {
        tracing::warn!(
            pattern = config.pattern.as_str(),
            page_width = page.width,
            page_height = page.height,
            limit = limits.max_instances,
            "Placement truncated at instance limit"
        );
    }

    tracing::debug!(
        pattern = config.pattern.as_str(),
        instances = sink.len(),
        "Placement computed"
    );

    Ok(Placement {
        instances: sink.into_instances(),
        truncated,
    })
}
