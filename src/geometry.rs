//! Membrane layout: where the segments sit for a given height and pore count.

use crate::entity::Obstacle;
use crate::error::LayoutError;
use diffusion_common::limits::*;
use serde::{Deserialize, Serialize};

/// Dimensions of the simulation area. The origin is the area center.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub height: u32,
    pub width: u32,
    pub pore_count: u32,
}

impl Area {
    pub fn half_width(&self) -> f64 {
        self.width as f64 / 2.0
    }

    pub fn half_height(&self) -> f64 {
        self.height as f64 / 2.0
    }

    /// Checks the dimensions and pore count against the model limits.
    pub fn validate(&self) -> Result<(), LayoutError> {
        check_range("height", self.height, MIN_HEIGHT, MAX_HEIGHT)?;
        check_range("width", self.width, MIN_WIDTH, MAX_WIDTH)?;
        check_range("pore count", self.pore_count, MIN_PORES, MAX_PORES)?;
        Ok(())
    }
}

impl Default for Area {
    fn default() -> Self {
        Area {
            height: DEFAULT_HEIGHT,
            width: DEFAULT_WIDTH,
            pore_count: DEFAULT_PORES,
        }
    }
}

fn check_range(parameter: &'static str, value: u32, min: u32, max: u32) -> Result<(), LayoutError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(LayoutError::OutOfRange { parameter, value, min, max })
    }
}

/// The membrane segments for one area.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    obstacles: Vec<Obstacle>,
    segment_height: f64,
}

impl Layout {
    /// Lays out the membrane for `area`.
    ///
    /// - 0 pores: one segment spanning the full height.
    /// - 1 pore: two equal segments leaving a centered gap.
    /// - n >= 2 pores: n - 1 segments with a pore at each extreme and one
    ///   between each pair of segments.
    pub fn generate(area: &Area) -> Result<Layout, LayoutError> {
        area.validate()?;
        let height = area.height as f64;
        let pores = area.pore_count;

        let layout = match pores {
            0 => Layout {
                obstacles: vec![Obstacle::new(0.0, height)],
                segment_height: height,
            },
            1 => {
                let segment_height = (height - PORE_HEIGHT) / 2.0;
                let offset = height / 2.0 - segment_height / 2.0;
                Layout {
                    obstacles: vec![
                        Obstacle::new(offset, segment_height),
                        Obstacle::new(-offset, segment_height),
                    ],
                    segment_height,
                }
            }
            _ => {
                let segment_height = segment_height_for(height, pores);
                if segment_height <= 0.0 {
                    return Err(LayoutError::SegmentTooShort {
                        height: area.height,
                        pores,
                        segment_height,
                    });
                }
                let obstacles = (1..pores)
                    .map(|i| {
                        let i = i as f64;
                        let center_y = -height / 2.0
                            + segment_height / 2.0
                            + PORE_HEIGHT * i
                            + segment_height * (i - 1.0);
                        Obstacle::new(center_y, segment_height)
                    })
                    .collect();
                Layout { obstacles, segment_height }
            }
        };
        Ok(layout)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Height shared by every segment of this layout.
    pub fn segment_height(&self) -> f64 {
        self.segment_height
    }
}

/// Segment height for `pores >= 2`; may be non-positive for an invalid area.
fn segment_height_for(height: f64, pores: u32) -> f64 {
    (height - pores as f64 * PORE_HEIGHT) / (pores as f64 - 1.0)
}
