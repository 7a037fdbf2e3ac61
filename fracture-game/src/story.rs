use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::state::{CharacterId, EndingId, FlagValue};

/// Flag written when a choice is taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagEffect {
    pub key: String,
    pub value: FlagValue,
}

/// Stat impact of a choice. Absent fields are no-ops; an explicit zero is
/// applied as a zero-delta update (observably identical outcome).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Effects {
    #[serde(default)]
    pub stability: Option<i32>,
    #[serde(default)]
    pub chaos: Option<i32>,
    #[serde(default)]
    pub knowledge: Option<i32>,
    #[serde(default)]
    pub trust: Option<BTreeMap<CharacterId, i32>>,
    #[serde(default)]
    pub flag: Option<FlagEffect>,
}

/// An interactive choice anchored in a scene. At most one of `next_scene`
/// and `ending` may be set; a hotspot with no effects is legal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    pub text: String,
    #[serde(default)]
    pub icon: Option<String>,
    /// Anchor position as viewport percentages. Presentation only.
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub effects: Option<Effects>,
    #[serde(default)]
    pub next_scene: Option<String>,
    #[serde(default)]
    pub ending: Option<EndingId>,
    #[serde(default)]
    pub minigame: Option<String>,
}

/// One screen of narrative content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub speaker: Option<String>,
    pub background: String,
    #[serde(default)]
    pub hotspots: Vec<Hotspot>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scene '{scene}' hotspot '{hotspot}' declares both nextScene and ending")]
    AmbiguousTransition { scene: String, hotspot: String },
}

/// The read-only narrative content table, keyed by scene id. Fully loaded
/// before the resolver starts; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StoryData {
    pub scenes: HashMap<String, Scene>,
}

impl StoryData {
    /// Empty table (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            scenes: HashMap::new(),
        }
    }

    /// Parse and validate a content table from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed, a trust effect names
    /// a character outside the known cast, or a hotspot declares both a
    /// scene transition and an ending.
    pub fn from_json(json: &str) -> Result<Self, StoryError> {
        let data: Self = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    /// Build a table from pre-parsed scenes.
    ///
    /// # Errors
    ///
    /// Returns an error if a hotspot declares both a scene transition and
    /// an ending.
    pub fn from_scenes(scenes: impl IntoIterator<Item = Scene>) -> Result<Self, StoryError> {
        let data = Self {
            scenes: scenes
                .into_iter()
                .map(|scene| (scene.id.clone(), scene))
                .collect(),
        };
        data.validate()?;
        Ok(data)
    }

    fn validate(&self) -> Result<(), StoryError> {
        for scene in self.scenes.values() {
            for hotspot in &scene.hotspots {
                if hotspot.next_scene.is_some() && hotspot.ending.is_some() {
                    return Err(StoryError::AmbiguousTransition {
                        scene: scene.id.clone(),
                        hotspot: hotspot.text.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, scene_id: &str) -> Option<&Scene> {
        self.scenes.get(scene_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scene_with_effects_and_transitions() {
        let json = r#"{
            "scenes": {
                "intro": {
                    "id": "intro",
                    "text": "The clock strikes a seventh hour.",
                    "speaker": "Narrator",
                    "background": "/assets/art/clock_tower.png",
                    "hotspots": [
                        {
                            "text": "Examine the frozen clock",
                            "icon": "eye",
                            "x": 42.0,
                            "y": 30.0,
                            "effects": { "knowledge": 10, "trust": { "kael": 5 } },
                            "nextScene": "clock_face"
                        },
                        {
                            "text": "Walk away",
                            "x": 80.0,
                            "y": 70.0
                        }
                    ]
                }
            }
        }"#;

        let data = StoryData::from_json(json).unwrap();
        let scene = data.get("intro").unwrap();
        assert_eq!(scene.hotspots.len(), 2);
        let first = &scene.hotspots[0];
        assert_eq!(first.next_scene.as_deref(), Some("clock_face"));
        let effects = first.effects.as_ref().unwrap();
        assert_eq!(effects.knowledge, Some(10));
        assert_eq!(
            effects.trust.as_ref().unwrap().get(&CharacterId::Kael),
            Some(&5)
        );
        // hotspot without effects is legal
        assert!(scene.hotspots[1].effects.is_none());
    }

    #[test]
    fn rejects_unknown_trust_character() {
        let json = r#"{
            "scenes": {
                "intro": {
                    "id": "intro",
                    "text": "x",
                    "background": "bg.png",
                    "hotspots": [
                        { "text": "t", "effects": { "trust": { "stranger": 5 } } }
                    ]
                }
            }
        }"#;
        assert!(matches!(
            StoryData::from_json(json),
            Err(StoryError::Json(_))
        ));
    }

    #[test]
    fn rejects_hotspot_with_both_transition_and_ending() {
        let json = r#"{
            "scenes": {
                "end": {
                    "id": "end",
                    "text": "x",
                    "background": "bg.png",
                    "hotspots": [
                        { "text": "both", "nextScene": "s2", "ending": "restore" }
                    ]
                }
            }
        }"#;
        assert!(matches!(
            StoryData::from_json(json),
            Err(StoryError::AmbiguousTransition { .. })
        ));
    }

    #[test]
    fn missing_scene_is_none() {
        let data = StoryData::empty();
        assert!(data.get("nowhere").is_none());
    }
}
