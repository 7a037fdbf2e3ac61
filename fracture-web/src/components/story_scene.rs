use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fracture_game::{ChoiceOutcome, EndingId, GameState, Hotspot, NarrativeResolver, RuneTrace};
use gloo::timers::callback::Interval;
use yew::prelude::*;

use crate::components::dialogue_panel::DialoguePanel;
use crate::game;

/// Milliseconds per revealed character.
const REVEAL_TICK_MS: u32 = 20;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub store: Rc<RefCell<GameState>>,
    /// Bumped by the shell after every committed mutation.
    pub version: u32,
    pub on_mutated: Callback<()>,
}

fn ending_copy(ending: Option<EndingId>) -> (&'static str, &'static str) {
    match ending {
        Some(EndingId::Restore) => (
            "Reality Restored",
            "The timeline stabilizes. The glyphs fade from your eyes, replaced by familiar words.",
        ),
        Some(EndingId::Merge) => (
            "A Merged Truth",
            "A hybrid world where physics and magic coexist in a jagged dance.",
        ),
        Some(EndingId::Chaos) => (
            "The Final Fracture",
            "The seventh chime never finishes. Neither does anything else.",
        ),
        None => ("The Hour Closes", ""),
    }
}

/// Story mode: scene artwork, positioned hotspots, the dialogue panel
/// with its typewriter gate, the rune-tracing overlay and the ending
/// screen.
#[function_component(StoryScene)]
pub fn story_scene(p: &Props) -> Html {
    let story = game::story();
    let resolver = use_mut_ref(NarrativeResolver::new);
    let trace = use_mut_ref(RuneTrace::new);
    let revealed = use_state(|| 0_usize);
    let complete = use_state(|| false);
    let minigame = use_state(|| None::<String>);

    let (scene_id, game_ended, ending_id, is_fractured) = {
        let s = p.store.borrow();
        (
            s.current_scene_id.clone(),
            s.game_ended,
            s.ending_id,
            s.is_fractured,
        )
    };

    // Restart the typewriter whenever the store points at a new scene.
    {
        let store = p.store.clone();
        let resolver = resolver.clone();
        let revealed = revealed.clone();
        let complete = complete.clone();
        let minigame = minigame.clone();
        use_effect_with((scene_id.clone(), game_ended), move |_| {
            let scene = {
                let r = resolver.borrow();
                r.active_scene(story, &mut store.borrow_mut()).cloned()
            };
            let mut interval = None;
            if let Some(scene) = scene {
                resolver.borrow_mut().begin_scene(&scene);
                revealed.set(0);
                complete.set(false);
                minigame.set(None);
                let last_shown = Rc::new(Cell::new(0_usize));
                interval = Some(Interval::new(REVEAL_TICK_MS, move || {
                    let shown = {
                        let mut r = resolver.borrow_mut();
                        r.reveal_mut().advance(1);
                        r.reveal().shown()
                    };
                    if shown != last_shown.get() {
                        last_shown.set(shown);
                        revealed.set(shown);
                        if resolver.borrow().choices_unlocked() {
                            complete.set(true);
                        }
                    }
                }));
            } else if !store.borrow().game_ended {
                log::warn!("no scene for id '{}'; rendering nothing", store.borrow().current_scene_id);
            }
            move || drop(interval)
        });
    }

    if game_ended {
        let (title, body) = ending_copy(ending_id);
        let reset = {
            let store = p.store.clone();
            let on_mutated = p.on_mutated.clone();
            Callback::from(move |_| {
                store.borrow_mut().reset_game();
                on_mutated.emit(());
            })
        };
        return html! {
            <div class="ending-screen">
                <div class="ending-card">
                    <h1 class="ending-title">{ title }</h1>
                    <p class="ending-body">{ body }</p>
                    <button class="ending-reset" onclick={reset}>{ "Begin Again" }</button>
                </div>
            </div>
        };
    }

    let Some(scene) = story.get(&scene_id) else {
        // Content miss: degrade to a blank stage, never crash.
        return html! { <div class="story-scene story-scene--void" /> };
    };

    let select_choice = {
        let store = p.store.clone();
        let resolver = resolver.clone();
        let trace = trace.clone();
        let minigame = minigame.clone();
        let on_mutated = p.on_mutated.clone();
        Callback::from(move |hotspot: Hotspot| {
            let outcome = resolver
                .borrow_mut()
                .select(&hotspot, &mut store.borrow_mut());
            match outcome {
                ChoiceOutcome::Applied => on_mutated.emit(()),
                ChoiceOutcome::MinigameStarted(id) => {
                    *trace.borrow_mut() = RuneTrace::new();
                    minigame.set(Some(id));
                }
                ChoiceOutcome::Gated | ChoiceOutcome::MinigameRestarted => {}
            }
        })
    };

    let hotspot_buttons = scene.hotspots.iter().map(|hotspot| {
        let style = format!("top: {}%; left: {}%", hotspot.y, hotspot.x);
        let onclick = {
            let cb = select_choice.clone();
            let hotspot = hotspot.clone();
            Callback::from(move |_| cb.emit(hotspot.clone()))
        };
        let icon = hotspot.icon.clone().unwrap_or_else(|| String::from("magic"));
        html! {
            <button class={format!("scene-hotspot scene-hotspot--{icon}")}
                    style={style} onclick={onclick} title={hotspot.text.clone()}>
                <span class="scene-hotspot-label">{ hotspot.text.clone() }</span>
            </button>
        }
    });

    let choice_buttons = scene.hotspots.iter().map(|hotspot| {
        let onclick = {
            let cb = select_choice.clone();
            let hotspot = hotspot.clone();
            Callback::from(move |_| cb.emit(hotspot.clone()))
        };
        html! {
            <button class="dialogue-choice" onclick={onclick}>
                { hotspot.text.clone() }
            </button>
        }
    });

    let minigame_overlay = minigame.as_ref().map(|_| {
        let pointer_down = {
            let trace = trace.clone();
            Callback::from(move |e: PointerEvent| {
                trace.borrow_mut().begin(e.offset_x() as f32, e.offset_y() as f32);
            })
        };
        let pointer_move = {
            let trace = trace.clone();
            Callback::from(move |e: PointerEvent| {
                trace.borrow_mut().extend(e.offset_x() as f32, e.offset_y() as f32);
            })
        };
        let pointer_up = {
            let store = p.store.clone();
            let resolver = resolver.clone();
            let trace = trace.clone();
            let minigame = minigame.clone();
            let on_mutated = p.on_mutated.clone();
            Callback::from(move |_: PointerEvent| {
                let success = trace.borrow_mut().finish();
                let outcome = resolver
                    .borrow_mut()
                    .minigame_finished(success, &mut store.borrow_mut());
                if outcome == ChoiceOutcome::Applied {
                    minigame.set(None);
                    on_mutated.emit(());
                }
                // On failure the trace is already cleared; the overlay
                // stays up for another attempt.
            })
        };
        let cancel = {
            let resolver = resolver.clone();
            let minigame = minigame.clone();
            Callback::from(move |_| {
                resolver.borrow_mut().cancel_minigame();
                minigame.set(None);
            })
        };
        html! {
            <div class="minigame-overlay">
                <div class="minigame-card">
                    <h3>{ "Trace the Anchor Rune" }</h3>
                    <div class="minigame-canvas"
                         onpointerdown={pointer_down}
                         onpointermove={pointer_move}
                         onpointerup={pointer_up} />
                    <p class="minigame-hint">
                        { "Draw along the faint path. Connect your energy to reality." }
                    </p>
                    <button class="minigame-cancel" onclick={cancel}>{ "Step away" }</button>
                </div>
            </div>
        }
    });

    let background = format!("background-image: url('{}')", scene.background);

    html! {
        <div class="story-scene" style={background}>
            if minigame_overlay.is_none() {
                <div class="scene-hotspots">{ for hotspot_buttons }</div>
            }
            { minigame_overlay.unwrap_or_default() }
            <DialoguePanel
                text={AttrValue::from(scene.text.clone())}
                speaker={scene.speaker.clone().map(AttrValue::from)}
                revealed={*revealed}
                complete={*complete}
                is_fractured={is_fractured}>
                { for choice_buttons }
            </DialoguePanel>
        </div>
    }
}
