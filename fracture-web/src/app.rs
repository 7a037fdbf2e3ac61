use std::cell::RefCell;
use std::rc::Rc;

use fracture_game::GameState;
use gloo::timers::callback::Timeout;
use yew::prelude::*;

use crate::components::hud::HudOverlay;
use crate::components::story_scene::StoryScene;
use crate::components::world_view::WorldView;
use crate::game::{DEFAULT_SAVE_SLOT, create_web_game_engine};

/// Duration of the cosmetic teleport veil between scenes.
const TELEPORT_OVERLAY_MS: u32 = 1_200;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Story,
    Explore,
}

/// Top-level component mounted to the DOM.
#[function_component(App)]
pub fn app() -> Html {
    html! { <AppInner /> }
}

#[function_component(AppInner)]
pub fn app_inner() -> Html {
    // The one progression store shared by both modes, rehydrated from the
    // save slot. Handed to consumers by reference; every mutation is a
    // single borrow_mut scope followed by a commit.
    let store: Rc<RefCell<GameState>> =
        use_mut_ref(|| create_web_game_engine().load_or_default(DEFAULT_SAVE_SLOT));
    let version = use_state(|| 0_u32);
    let started = use_state(|| false);
    let mode = use_state(|| None::<Mode>);
    let teleporting = use_state(|| false);

    // Persist and re-render after every store mutation.
    let commit = {
        let store = store.clone();
        let version = version.clone();
        Callback::from(move |()| {
            let engine = create_web_game_engine();
            if let Err(err) = engine.save_game(DEFAULT_SAVE_SLOT, &store.borrow()) {
                log::warn!("failed to persist game state: {err}");
            }
            version.set(*version + 1);
        })
    };

    let toggle_sound = {
        let store = store.clone();
        let commit = commit.clone();
        Callback::from(move |()| {
            store.borrow_mut().toggle_sound();
            commit.emit(());
        })
    };

    let scene_id = store.borrow().current_scene_id.clone();

    // Cosmetic teleport veil whenever the scene changes mid-run.
    {
        let teleporting = teleporting.clone();
        let started = *started;
        use_effect_with(scene_id, move |_| {
            let mut timeout = None;
            if started {
                teleporting.set(true);
                let teleporting = teleporting.clone();
                timeout = Some(Timeout::new(TELEPORT_OVERLAY_MS, move || {
                    teleporting.set(false);
                }));
            }
            move || drop(timeout)
        });
    }

    if !*started {
        let sound_enabled = store.borrow().sound_enabled;
        let enter_explore = {
            let started = started.clone();
            let mode = mode.clone();
            Callback::from(move |_| {
                started.set(true);
                mode.set(Some(Mode::Explore));
            })
        };
        let enter_story = {
            let started = started.clone();
            let mode = mode.clone();
            Callback::from(move |_| {
                started.set(true);
                mode.set(Some(Mode::Story));
            })
        };
        let sound = {
            let toggle_sound = toggle_sound.clone();
            Callback::from(move |_| toggle_sound.emit(()))
        };
        return html! {
            <div class="title-screen">
                <h1 class="title-heading">
                    { "FRACTURE" }
                    <span class="title-sub">{ "THE SEVENTH HOUR" }</span>
                </h1>
                <p class="title-tagline">{ "\"When the clock stops, the nightmare begins.\"" }</p>
                <div class="title-actions">
                    <button class="title-btn title-btn--primary" onclick={enter_explore}>
                        { "Enter the Fracture" }
                    </button>
                    <button class="title-btn" onclick={enter_story}>
                        { "Story Mode" }
                    </button>
                </div>
                <button class="title-sound" onclick={sound}>
                    { if sound_enabled { "Sound on" } else { "Sound off" } }
                </button>
            </div>
        };
    }

    let state_view = store.borrow().clone();
    let veil_class = if state_view.is_fractured {
        "teleport-overlay teleport-overlay--fracture"
    } else {
        "teleport-overlay"
    };
    let on_back = {
        let store = store.clone();
        let commit = commit.clone();
        Callback::from(move |()| {
            store.borrow_mut().go_back();
            commit.emit(());
        })
    };
    let on_forward = {
        let store = store.clone();
        let commit = commit.clone();
        Callback::from(move |()| {
            store.borrow_mut().go_forward();
            commit.emit(());
        })
    };

    let main = match *mode {
        Some(Mode::Explore) => html! {
            <WorldView store={store.clone()} version={*version} on_mutated={commit.clone()} />
        },
        _ => html! {
            <StoryScene store={store.clone()} version={*version} on_mutated={commit.clone()} />
        },
    };

    html! {
        <div class={classes!("app", state_view.is_fractured.then_some("app--fractured"))}>
            if *teleporting {
                <div class={veil_class} aria-hidden="true" />
            }
            <HudOverlay
                state={state_view}
                on_back={on_back}
                on_forward={on_forward}
                on_toggle_sound={toggle_sound}
            />
            <main class="app-main">{ main }</main>
        </div>
    }
}
