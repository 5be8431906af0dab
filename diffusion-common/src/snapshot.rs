use serde::{Deserialize, Serialize};
use std::fmt;

/// The two particle species in the model.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    A,
    B,
}

impl Species {
    pub const ALL: [Species; 2] = [Species::A, Species::B];
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::A => write!(f, "A"),
            Species::B => write!(f, "B"),
        }
    }
}

/// Left/right split of one species across the membrane.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DivisionShare {
    pub left_count: u32,
    pub right_count: u32,
    pub left_percent: f64,
    pub right_percent: f64,
}

impl DivisionShare {
    /// Builds the share from raw counts. An absent species is 0% on both sides.
    pub fn from_counts(left_count: u32, right_count: u32) -> Self {
        let total = left_count + right_count;
        if total == 0 {
            return DivisionShare::default();
        }
        DivisionShare {
            left_count,
            right_count,
            left_percent: left_count as f64 / total as f64 * 100.0,
            right_percent: right_count as f64 / total as f64 * 100.0,
        }
    }

    pub fn total(&self) -> u32 {
        self.left_count + self.right_count
    }

    /// Display text for the left division, e.g. `"62.50%"`.
    pub fn left_label(&self) -> String {
        percent_label(self.total(), self.left_percent)
    }

    /// Display text for the right division.
    pub fn right_label(&self) -> String {
        percent_label(self.total(), self.right_percent)
    }
}

fn percent_label(total: u32, percent: f64) -> String {
    if total == 0 {
        "0%".to_string()
    } else {
        format!("{:.2}%", percent)
    }
}

/// Per-species concentration in each division.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Concentration {
    pub species_a: DivisionShare,
    pub species_b: DivisionShare,
}

impl Concentration {
    pub fn share(&self, species: Species) -> &DivisionShare {
        match species {
            Species::A => &self.species_a,
            Species::B => &self.species_b,
        }
    }
}

/// A position record for one particle, written into snapshots when requested.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub species: Species,
    pub x: f64,
    pub y: f64,
}

/// A snapshot of the simulation state and metrics at a specific time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Fast ticks executed since the area was last initialized.
    pub tick: u64,
    /// Simulated time in seconds (`tick` times the fast tick interval).
    pub time_s: f64,
    /// The total number of particles in the registry.
    pub total_particle_count: u32,
    /// Latest concentration sample.
    pub concentration: Concentration,
    /// Slow ticks remaining until the next direction reset.
    pub countdown: u32,
    #[serde(skip_serializing_if = "Option::is_none")] // Don't write "positions": null
    pub positions: Option<Vec<PositionRecord>>,
}
