use crate::state::GameState;
use crate::story::{Hotspot, Scene, StoryData};

const LOG_SCENE_MISSING: &str = "log.scene-missing";
const LOG_MINIGAME_START: &str = "log.minigame.start";
const LOG_MINIGAME_RETRY: &str = "log.minigame.retry";

/// Typewriter reveal progress for the active scene. Presentation drives
/// the pacing; the resolver only cares about completion, which gates when
/// choices become selectable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextReveal {
    total: usize,
    shown: usize,
}

impl TextReveal {
    #[must_use]
    pub fn for_text(text: &str) -> Self {
        Self {
            total: text.chars().count(),
            shown: 0,
        }
    }

    /// Reveal up to `count` more characters.
    pub fn advance(&mut self, count: usize) {
        self.shown = (self.shown + count).min(self.total);
    }

    pub fn skip_to_end(&mut self) {
        self.shown = self.total;
    }

    #[must_use]
    pub fn shown(&self) -> usize {
        self.shown
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.shown >= self.total
    }
}

/// Outcome of routing a selection through the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceOutcome {
    /// The scene text is still revealing; the selection was ignored.
    Gated,
    /// The choice was forwarded to the store.
    Applied,
    /// The choice requires a minigame; it is parked until completion.
    MinigameStarted(String),
    /// The minigame failed; it restarts with cleared state and no store
    /// side effects.
    MinigameRestarted,
}

/// Resolves the active scene against the content table and routes player
/// selections into the progression store, deferring minigame-gated
/// choices until the minigame reports success.
#[derive(Debug, Default)]
pub struct NarrativeResolver {
    reveal: TextReveal,
    pending: Option<Hotspot>,
}

impl NarrativeResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the scene the store currently points at. A miss is logged
    /// and renders as nothing; it never propagates.
    pub fn active_scene<'a>(
        &self,
        story: &'a StoryData,
        state: &mut GameState,
    ) -> Option<&'a Scene> {
        if state.game_ended {
            return None;
        }
        let scene = story.get(&state.current_scene_id);
        if scene.is_none() {
            state
                .logs
                .push(format!("{LOG_SCENE_MISSING}.{}", state.current_scene_id));
        }
        scene
    }

    /// Reset reveal state for a newly entered scene. Any parked minigame
    /// choice is dropped.
    pub fn begin_scene(&mut self, scene: &Scene) {
        self.reveal = TextReveal::for_text(&scene.text);
        self.pending = None;
    }

    pub fn reveal_mut(&mut self) -> &mut TextReveal {
        &mut self.reveal
    }

    #[must_use]
    pub fn reveal(&self) -> TextReveal {
        self.reveal
    }

    /// Choices are selectable only once the full scene text is revealed.
    #[must_use]
    pub fn choices_unlocked(&self) -> bool {
        self.reveal.is_complete()
    }

    #[must_use]
    pub fn pending_minigame(&self) -> Option<&str> {
        self.pending
            .as_ref()
            .and_then(|choice| choice.minigame.as_deref())
    }

    /// Route a selected hotspot. Minigame-gated choices are parked;
    /// everything else goes straight to [`GameState::make_choice`].
    pub fn select(&mut self, choice: &Hotspot, state: &mut GameState) -> ChoiceOutcome {
        if !self.choices_unlocked() {
            return ChoiceOutcome::Gated;
        }
        if let Some(minigame) = &choice.minigame {
            self.pending = Some(choice.clone());
            state.logs.push(String::from(LOG_MINIGAME_START));
            return ChoiceOutcome::MinigameStarted(minigame.clone());
        }
        state.make_choice(choice);
        ChoiceOutcome::Applied
    }

    /// Feed the minigame result back. Success forwards the parked choice
    /// to the store; failure keeps it parked for a fresh attempt and
    /// leaves the store untouched.
    pub fn minigame_finished(&mut self, success: bool, state: &mut GameState) -> ChoiceOutcome {
        if success {
            match self.pending.take() {
                Some(choice) => {
                    state.make_choice(&choice);
                    ChoiceOutcome::Applied
                }
                None => ChoiceOutcome::Applied,
            }
        } else {
            state.logs.push(String::from(LOG_MINIGAME_RETRY));
            ChoiceOutcome::MinigameRestarted
        }
    }

    /// Abandon a parked minigame choice without applying it.
    pub fn cancel_minigame(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::{Effects, Scene};

    fn scene(id: &str, text: &str, hotspots: Vec<Hotspot>) -> Scene {
        Scene {
            id: id.to_string(),
            text: text.to_string(),
            speaker: None,
            background: String::from("bg.png"),
            hotspots,
        }
    }

    fn plain_choice(next: &str) -> Hotspot {
        Hotspot {
            text: String::from("go"),
            icon: None,
            x: 0.0,
            y: 0.0,
            effects: None,
            next_scene: Some(next.to_string()),
            ending: None,
            minigame: None,
        }
    }

    fn minigame_choice(next: &str) -> Hotspot {
        Hotspot {
            minigame: Some(String::from("rune-tracing")),
            effects: Some(Effects {
                stability: Some(15),
                ..Effects::default()
            }),
            ..plain_choice(next)
        }
    }

    #[test]
    fn missing_scene_resolves_to_none_and_logs() {
        let story = StoryData::empty();
        let mut state = GameState::default();
        let resolver = NarrativeResolver::new();
        assert!(resolver.active_scene(&story, &mut state).is_none());
        assert!(state.logs.iter().any(|l| l.starts_with("log.scene-missing")));
    }

    #[test]
    fn ended_game_resolves_no_scene() {
        let story =
            StoryData::from_scenes([scene("intro", "text", Vec::new())]).unwrap();
        let mut state = GameState::default();
        state.game_ended = true;
        let resolver = NarrativeResolver::new();
        assert!(resolver.active_scene(&story, &mut state).is_none());
    }

    #[test]
    fn choices_gate_on_full_reveal() {
        let mut resolver = NarrativeResolver::new();
        let mut state = GameState::default();
        let s = scene("intro", "hello", vec![plain_choice("s2")]);
        resolver.begin_scene(&s);

        assert_eq!(
            resolver.select(&s.hotspots[0], &mut state),
            ChoiceOutcome::Gated
        );
        assert_eq!(state.current_scene_id, "intro");

        resolver.reveal_mut().advance(4);
        assert!(!resolver.choices_unlocked());
        resolver.reveal_mut().advance(10);
        assert!(resolver.choices_unlocked());

        assert_eq!(
            resolver.select(&s.hotspots[0], &mut state),
            ChoiceOutcome::Applied
        );
        assert_eq!(state.current_scene_id, "s2");
    }

    #[test]
    fn minigame_failure_has_no_side_effects() {
        let mut resolver = NarrativeResolver::new();
        let mut state = GameState::default();
        let s = scene("intro", "x", vec![minigame_choice("s2")]);
        resolver.begin_scene(&s);
        resolver.reveal_mut().skip_to_end();

        assert_eq!(
            resolver.select(&s.hotspots[0], &mut state),
            ChoiceOutcome::MinigameStarted(String::from("rune-tracing"))
        );
        assert_eq!(
            resolver.minigame_finished(false, &mut state),
            ChoiceOutcome::MinigameRestarted
        );
        assert_eq!(state.current_scene_id, "intro");
        assert_eq!(state.stability, 0);
        assert!(state.past.is_empty());
        assert!(resolver.pending_minigame().is_some(), "choice stays parked");
    }

    #[test]
    fn minigame_success_forwards_the_parked_choice_once() {
        let mut resolver = NarrativeResolver::new();
        let mut state = GameState::default();
        let s = scene("intro", "x", vec![minigame_choice("s2")]);
        resolver.begin_scene(&s);
        resolver.reveal_mut().skip_to_end();

        resolver.select(&s.hotspots[0], &mut state);
        assert_eq!(
            resolver.minigame_finished(true, &mut state),
            ChoiceOutcome::Applied
        );
        assert_eq!(state.current_scene_id, "s2");
        assert_eq!(state.stability, 15);
        assert!(resolver.pending_minigame().is_none());
    }
}
