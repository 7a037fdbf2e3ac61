use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use crate::story::Hotspot;

pub const ALIGNMENT_MIN: i32 = 0;
pub const ALIGNMENT_MAX: i32 = 100;
pub const CHAOS_FRACTURE_THRESHOLD: i32 = 30;
pub const FRACTURE_LEVEL_THRESHOLD: u32 = 3;
pub const INITIAL_SCENE_ID: &str = "intro";
pub const INITIAL_SPELL: &str = "Basic";

const LOG_CHOICE: &str = "log.choice";
const LOG_SCENE_ADVANCE: &str = "log.scene-advance";
const LOG_ENDING_PREFIX: &str = "log.ending.";
const LOG_FRACTURE: &str = "log.fracture";
const LOG_HISTORY_BACK: &str = "log.history.back";
const LOG_HISTORY_FORWARD: &str = "log.history.forward";
const LOG_SPELL_PREFIX: &str = "log.spell.";
const LOG_RESET: &str = "log.reset";

/// One of the three bounded alignment meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Stability,
    Chaos,
    Knowledge,
}

impl Axis {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stability => "stability",
            Self::Chaos => "chaos",
            Self::Knowledge => "knowledge",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stability" => Ok(Self::Stability),
            "chaos" => Ok(Self::Chaos),
            "knowledge" => Ok(Self::Knowledge),
            _ => Err(()),
        }
    }
}

/// The statically known cast. Trust effects in content are keyed by this
/// enum, so an unrecognized character id is rejected when the story table
/// is parsed rather than surfacing at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterId {
    Kael,
    Mira,
    Professor,
}

impl CharacterId {
    pub const ALL: [Self; 3] = [Self::Kael, Self::Mira, Self::Professor];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kael => "kael",
            Self::Mira => "mira",
            Self::Professor => "professor",
        }
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the three endings the run closed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndingId {
    Restore,
    Merge,
    Chaos,
}

impl EndingId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Restore => "restore",
            Self::Merge => "merge",
            Self::Chaos => "chaos",
        }
    }
}

/// Scalar value stored under a narrative flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Immutable capture of the restorable slice of state, used solely for
/// history navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub current_scene_id: String,
    pub stability: i32,
    pub chaos: i32,
    pub knowledge: i32,
    pub fracture_level: u32,
}

/// The authoritative progression store. Serialized wholesale to the save
/// slot on every mutation; field names keep the original camelCase wire
/// schema so existing saves round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub current_chapter: u32,
    pub current_scene_id: String,
    pub stability: i32,
    pub chaos: i32,
    pub knowledge: i32,
    pub character_trust: BTreeMap<CharacterId, i32>,
    pub unlocked_spells: BTreeSet<String>,
    pub flags: BTreeMap<String, FlagValue>,
    pub fracture_level: u32,
    pub is_fractured: bool,
    pub game_ended: bool,
    pub ending_id: Option<EndingId>,
    pub past: Vec<Snapshot>,
    pub future: VecDeque<Snapshot>,
    pub sound_enabled: bool,
    /// Diagnostic log keys, surfaced by the shell. Not part of the save.
    #[serde(skip)]
    pub logs: Vec<String>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            current_chapter: 1,
            current_scene_id: INITIAL_SCENE_ID.to_string(),
            stability: 0,
            chaos: 0,
            knowledge: 0,
            character_trust: CharacterId::ALL.iter().map(|&c| (c, 0)).collect(),
            unlocked_spells: BTreeSet::from([INITIAL_SPELL.to_string()]),
            flags: BTreeMap::new(),
            fracture_level: 0,
            is_fractured: false,
            game_ended: false,
            ending_id: None,
            past: Vec::new(),
            future: VecDeque::new(),
            sound_enabled: true,
            logs: Vec::new(),
        }
    }
}

impl GameState {
    /// Capture the restorable slice of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_scene_id: self.current_scene_id.clone(),
            stability: self.stability,
            chaos: self.chaos,
            knowledge: self.knowledge,
            fracture_level: self.fracture_level,
        }
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.current_scene_id = snapshot.current_scene_id;
        self.stability = snapshot.stability;
        self.chaos = snapshot.chaos;
        self.knowledge = snapshot.knowledge;
        self.fracture_level = snapshot.fracture_level;
        self.recompute_fracture();
    }

    fn recompute_fracture(&mut self) {
        self.is_fractured =
            self.chaos > CHAOS_FRACTURE_THRESHOLD || self.fracture_level > FRACTURE_LEVEL_THRESHOLD;
    }

    /// Adjust one alignment meter, clamped to `[0, 100]`. Out-of-range
    /// deltas are silently clamped, never rejected.
    pub fn update_alignment(&mut self, axis: Axis, delta: i32) {
        let value = match axis {
            Axis::Stability => &mut self.stability,
            Axis::Chaos => &mut self.chaos,
            Axis::Knowledge => &mut self.knowledge,
        };
        *value = (*value + delta).clamp(ALIGNMENT_MIN, ALIGNMENT_MAX);
        self.recompute_fracture();
    }

    /// Additive, unbounded trust change. Total for every [`CharacterId`];
    /// a missing entry is created at base 0 first.
    pub fn update_trust(&mut self, character: CharacterId, delta: i32) {
        *self.character_trust.entry(character).or_insert(0) += delta;
    }

    /// Unconditional flag upsert.
    pub fn set_flag(&mut self, key: impl Into<String>, value: FlagValue) {
        self.flags.insert(key.into(), value);
    }

    /// Record a world-progression milestone. Never decreases; the only
    /// path back to zero is [`GameState::reset_game`].
    pub fn increment_fracture(&mut self) {
        self.fracture_level += 1;
        self.recompute_fracture();
        self.logs.push(String::from(LOG_FRACTURE));
    }

    pub fn unlock_spell(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.unlocked_spells.insert(name.clone()) {
            self.logs.push(format!("{LOG_SPELL_PREFIX}{name}"));
        }
    }

    pub fn toggle_sound(&mut self) {
        self.sound_enabled = !self.sound_enabled;
    }

    /// The central transition operator. Applies the choice's effects in a
    /// fixed order (stability, chaos, knowledge, trust, flag), then
    /// advances the scene and/or closes the run. Advancing pushes the
    /// pre-mutation snapshot onto `past` and invalidates redo history.
    pub fn make_choice(&mut self, choice: &Hotspot) {
        let snapshot = self.snapshot();
        self.logs.push(String::from(LOG_CHOICE));

        if let Some(effects) = &choice.effects {
            if let Some(delta) = effects.stability {
                self.update_alignment(Axis::Stability, delta);
            }
            if let Some(delta) = effects.chaos {
                self.update_alignment(Axis::Chaos, delta);
            }
            if let Some(delta) = effects.knowledge {
                self.update_alignment(Axis::Knowledge, delta);
            }
            if let Some(trust) = &effects.trust {
                for (&character, &delta) in trust {
                    self.update_trust(character, delta);
                }
            }
            if let Some(flag) = &effects.flag {
                self.set_flag(flag.key.clone(), flag.value.clone());
            }
        }

        if let Some(next) = &choice.next_scene {
            self.past.push(snapshot);
            self.future.clear();
            self.current_scene_id = next.clone();
            self.logs.push(String::from(LOG_SCENE_ADVANCE));
        }

        if let Some(ending) = choice.ending {
            self.game_ended = true;
            self.ending_id = Some(ending);
            self.logs
                .push(format!("{LOG_ENDING_PREFIX}{}", ending.as_str()));
        }
    }

    /// Step back through history. Identity when `past` is empty.
    pub fn go_back(&mut self) {
        if let Some(previous) = self.past.pop() {
            let current = self.snapshot();
            self.future.push_front(current);
            self.apply_snapshot(previous);
            self.logs.push(String::from(LOG_HISTORY_BACK));
        }
    }

    /// Step forward through history. Identity when `future` is empty.
    pub fn go_forward(&mut self) {
        if let Some(next) = self.future.pop_front() {
            let current = self.snapshot();
            self.past.push(current);
            self.apply_snapshot(next);
            self.logs.push(String::from(LOG_HISTORY_FORWARD));
        }
    }

    /// Restore every field to its initial value except `sound_enabled`,
    /// clearing both history stacks.
    pub fn reset_game(&mut self) {
        let sound_enabled = self.sound_enabled;
        *self = Self::default();
        self.sound_enabled = sound_enabled;
        self.logs.push(String::from(LOG_RESET));
    }

    #[must_use]
    pub fn trust_for(&self, character: CharacterId) -> i32 {
        self.character_trust.get(&character).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn flag(&self, key: &str) -> Option<&FlagValue> {
        self.flags.get(key)
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        !self.past.is_empty()
    }

    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        !self.future.is_empty()
    }
}
