//! The two velocity components carried by the solver.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One scalar component of the 2D vector field.
///
/// `U` and `V` evolve independently under the same kernel; the diffusion
/// term never couples them. The discriminant doubles as the storage index
/// inside a grid buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// First velocity component.
    U = 0,
    /// Second velocity component.
    V = 1,
}

impl Field {
    /// Every field, in storage order.
    pub const ALL: [Field; 2] = [Field::U, Field::V];

    /// Number of fields carried by a grid buffer.
    pub const COUNT: usize = 2;

    /// Storage index of this field.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short lowercase name used in logs and output file names.
    pub fn name(self) -> &'static str {
        match self {
            Self::U => "u",
            Self::V => "v",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense_and_ordered() {
        let idx: Vec<usize> = Field::ALL.iter().map(|f| f.index()).collect();
        assert_eq!(idx, vec![0, 1]);
        assert_eq!(Field::ALL.len(), Field::COUNT);
    }

    #[test]
    fn display_uses_short_name() {
        assert_eq!(Field::U.to_string(), "u");
        assert_eq!(format!("{}", Field::V), "v");
    }
}
