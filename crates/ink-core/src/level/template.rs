//! Level template: the per-level generation settings

use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, Result};

/// Settings for generating one level
///
/// Missing fields take their default when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTemplate {
    /// Grid width in rooms
    pub width: usize,
    /// Grid height in rooms
    pub height: usize,
    /// Maximum number of rooms on the carved route; a longer route is cut
    /// and the exit moved to its last room
    pub graphite: usize,
    /// Number of key rooms to place
    pub key_count: usize,
    /// Minimum distance between a key and the start room
    pub min_key_start_distance: u32,
    /// Minimum distance between two keys
    pub min_key_spacing: u32,
}

impl Default for LevelTemplate {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            graphite: 30,
            key_count: 2,
            min_key_start_distance: 2,
            min_key_spacing: 3,
        }
    }
}

impl LevelTemplate {
    /// Number of rooms in the grid; saturates for grids `validate` rejects
    pub fn room_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Reject templates no level can be generated from
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GenerationError::InvalidTemplate {
                reason: format!("grid must not be empty ({}x{})", self.width, self.height),
            });
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(GenerationError::InvalidTemplate {
                reason: format!("grid {}x{} is too large", self.width, self.height),
            });
        }
        if self.room_count() < 2 {
            return Err(GenerationError::InvalidTemplate {
                reason: "grid needs room for a start and an exit".to_string(),
            });
        }
        if self.graphite < 2 {
            return Err(GenerationError::InvalidTemplate {
                reason: format!("graphite budget {} cannot reach an exit", self.graphite),
            });
        }
        // Start and exit rooms never hold keys.
        if self.key_count > self.room_count() - 2 {
            return Err(GenerationError::InvalidTemplate {
                reason: format!(
                    "{} keys do not fit in {} rooms",
                    self.key_count,
                    self.room_count()
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(LevelTemplate::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_grid() {
        let template = LevelTemplate {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            template.validate(),
            Err(GenerationError::InvalidTemplate { .. })
        ));

        let template = LevelTemplate {
            width: 1,
            height: 1,
            key_count: 0,
            ..Default::default()
        };
        assert!(template.validate().is_err());
    }

    #[test]
    fn test_rejects_small_budget_and_many_keys() {
        let template = LevelTemplate {
            graphite: 1,
            ..Default::default()
        };
        assert!(template.validate().is_err());

        let template = LevelTemplate {
            width: 2,
            height: 2,
            key_count: 3,
            ..Default::default()
        };
        assert!(template.validate().is_err());
    }

    #[test]
    fn test_rejects_overflowing_grid() {
        let template = LevelTemplate {
            width: usize::MAX,
            height: 2,
            ..Default::default()
        };
        assert_eq!(template.room_count(), usize::MAX);
        assert!(matches!(
            template.validate(),
            Err(GenerationError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let template: LevelTemplate =
            serde_json::from_str(r#"{"width": 12, "key_count": 1}"#).unwrap();
        assert_eq!(template.width, 12);
        assert_eq!(template.key_count, 1);
        assert_eq!(template.height, LevelTemplate::default().height);
        assert_eq!(template.graphite, LevelTemplate::default().graphite);
    }
}
