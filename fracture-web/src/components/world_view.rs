use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fracture_game::{
    CameraRig, GameState, LevelGeometry, MovementSimulator, StagePhase, StageSequencer,
};
use gloo::events::EventListener;
use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::callback::Timeout;
use gloo::utils::window;
use wasm_bindgen::JsCast;
use web_sys::{KeyboardEvent, MouseEvent};
use yew::prelude::*;

use crate::components::stage_gate::StageGate;
use crate::input::{CAMERA_TURN_SPEED, ExploreInput, apply_key_code, apply_mouse_button};

/// Length of the opening cinematic before the first briefing gate.
const INTRO_DURATION_MS: u32 = 4_000;
/// Camera turn integration is clamped like the physics step.
const MAX_TURN_DELTA: f32 = 0.05;
const READOUT_EVERY_FRAMES: u32 = 15;

const fn stage_name(stage: u8) -> &'static str {
    match stage {
        1 => "Frozen Hall",
        2 => "Fractured Forest",
        3 => "Chamber of the Divided Self",
        _ => "North Corridor",
    }
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub store: Rc<RefCell<GameState>>,
    /// Bumped by the shell after every committed mutation.
    pub version: u32,
    pub on_mutated: Callback<()>,
}

/// Explore mode host: owns the stage sequencer, level geometry, movement
/// simulator and camera, and drives them from a requestAnimationFrame
/// loop. Each frame entry completes before the next begins; input
/// handlers only flip shared booleans.
#[function_component(WorldView)]
pub fn world_view(p: &Props) -> Html {
    let sequencer = use_mut_ref(StageSequencer::new);
    let geometry = use_mut_ref(|| LevelGeometry::for_stage(0));
    let simulator = {
        let geometry = geometry.clone();
        use_mut_ref(move || MovementSimulator::new(geometry.borrow().spawn))
    };
    let camera = use_mut_ref(CameraRig::default);
    let input = use_mut_ref(ExploreInput::default);

    // Render mirrors of sequencer-owned state.
    let phase_view = use_state(|| StagePhase::Intro);
    let readout = use_state(String::new);

    // Opening cinematic completion: signaled once, guarded by the
    // sequencer.
    let finish_intro = {
        let sequencer = sequencer.clone();
        let phase_view = phase_view.clone();
        Callback::from(move |()| {
            if sequencer.borrow_mut().intro_complete() {
                phase_view.set(sequencer.borrow().phase());
            }
        })
    };
    {
        let finish_intro = finish_intro.clone();
        use_effect_with((), move |()| {
            let timeout = Timeout::new(INTRO_DURATION_MS, move || finish_intro.emit(()));
            move || drop(timeout)
        });
    }

    // Keyboard/mouse listeners: idempotent flag writes, read by the loop.
    {
        let input = input.clone();
        use_effect_with((), move |()| {
            let key_down = {
                let input = input.clone();
                EventListener::new(&window(), "keydown", move |event| {
                    if let Some(e) = event.dyn_ref::<KeyboardEvent>()
                        && apply_key_code(&e.code(), true, &mut input.borrow_mut())
                    {
                        e.prevent_default();
                    }
                })
            };
            let key_up = {
                let input = input.clone();
                EventListener::new(&window(), "keyup", move |event| {
                    if let Some(e) = event.dyn_ref::<KeyboardEvent>() {
                        apply_key_code(&e.code(), false, &mut input.borrow_mut());
                    }
                })
            };
            let mouse_down = {
                let input = input.clone();
                EventListener::new(&window(), "mousedown", move |event| {
                    if let Some(e) = event.dyn_ref::<MouseEvent>() {
                        apply_mouse_button(e.button(), true, &mut input.borrow_mut());
                    }
                })
            };
            let mouse_up = {
                let input = input.clone();
                EventListener::new(&window(), "mouseup", move |event| {
                    if let Some(e) = event.dyn_ref::<MouseEvent>() {
                        apply_mouse_button(e.button(), false, &mut input.borrow_mut());
                    }
                })
            };
            move || {
                drop(key_down);
                drop(key_up);
                drop(mouse_down);
                drop(mouse_up);
            }
        });
    }

    // The frame loop.
    {
        let sequencer = sequencer.clone();
        let geometry = geometry.clone();
        let simulator = simulator.clone();
        let camera = camera.clone();
        let input = input.clone();
        let store = p.store.clone();
        let on_mutated = p.on_mutated.clone();
        let phase_view = phase_view.clone();
        let readout = readout.clone();
        use_effect_with((), move |()| {
            let raf: Rc<RefCell<Option<AnimationFrame>>> = Rc::new(RefCell::new(None));
            let tick: Rc<RefCell<Option<Rc<dyn Fn(f64)>>>> = Rc::new(RefCell::new(None));
            let last_timestamp = Rc::new(Cell::new(None::<f64>));
            let frames = Rc::new(Cell::new(0_u32));

            let tick_slot = tick.clone();
            let raf_slot = raf.clone();
            let body: Rc<dyn Fn(f64)> = Rc::new(move |timestamp: f64| {
                #[allow(clippy::cast_possible_truncation)]
                let delta = last_timestamp
                    .get()
                    .map_or(0.0, |previous| ((timestamp - previous) / 1000.0) as f32);
                last_timestamp.set(Some(timestamp));

                // Input is live only while a stage is active; the gate
                // freezes the player without stopping physics.
                let enabled = sequencer.borrow().movement_enabled();
                let live = if enabled {
                    *input.borrow()
                } else {
                    ExploreInput::default()
                };

                {
                    let mut cam = camera.borrow_mut();
                    let turn_dt = delta.clamp(0.0, MAX_TURN_DELTA);
                    if live.turn_left {
                        cam.yaw += CAMERA_TURN_SPEED * turn_dt;
                    }
                    if live.turn_right {
                        cam.yaw -= CAMERA_TURN_SPEED * turn_dt;
                    }
                }

                let camera_yaw = camera.borrow().yaw;
                let events = simulator.borrow_mut().step(
                    &live.movement,
                    camera_yaw,
                    &geometry.borrow(),
                    delta,
                );

                // Camera follows after the position is final; teleports
                // snap.
                let position = simulator.borrow().position();
                if events.respawned {
                    camera.borrow_mut().snap_to(position, live.movement.aiming);
                } else {
                    camera.borrow_mut().follow(position, live.movement.aiming);
                }

                // Checkpoint collisions are suspended while the gate is
                // up; the sequencer enforces the same invariant.
                let checkpoint = if enabled {
                    geometry.borrow().checkpoint_hit(position)
                } else {
                    None
                };
                if let Some(target) = checkpoint {
                    let advanced = sequencer
                        .borrow_mut()
                        .checkpoint_reached(target, &mut store.borrow_mut());
                    if advanced {
                        phase_view.set(sequencer.borrow().phase());
                        on_mutated.emit(());
                    }
                }

                let frame = frames.get().wrapping_add(1);
                frames.set(frame);
                if frame % READOUT_EVERY_FRAMES == 0 {
                    let kin = simulator.borrow().kinematics;
                    readout.set(format!(
                        "x {:+.1}  y {:+.1}  z {:+.1}  {}",
                        kin.position.x,
                        kin.position.y,
                        kin.position.z,
                        if kin.is_grounded { "grounded" } else { "airborne" },
                    ));
                }

                if let Some(next) = tick_slot.borrow().clone() {
                    *raf_slot.borrow_mut() =
                        Some(request_animation_frame(move |ts| next(ts)));
                }
            });

            *tick.borrow_mut() = Some(body.clone());
            *raf.borrow_mut() = Some(request_animation_frame(move |ts| body(ts)));

            let raf_cleanup = raf;
            let tick_cleanup = tick;
            move || {
                raf_cleanup.borrow_mut().take();
                tick_cleanup.borrow_mut().take();
            }
        });
    }

    // Gate dismissal: activate the pending stage, teleport to its spawn,
    // re-enable input.
    let start_stage = {
        let sequencer = sequencer.clone();
        let geometry = geometry.clone();
        let simulator = simulator.clone();
        let phase_view = phase_view.clone();
        Callback::from(move |()| {
            if let Some(stage) = sequencer.borrow_mut().acknowledge_start() {
                let level = LevelGeometry::for_stage(stage);
                simulator.borrow_mut().set_spawn(level.spawn);
                simulator.borrow_mut().request_teleport();
                *geometry.borrow_mut() = level;
                phase_view.set(sequencer.borrow().phase());
            }
        })
    };

    let overlay = match *phase_view {
        StagePhase::Intro => {
            let skip = {
                let finish_intro = finish_intro.clone();
                Callback::from(move |_| finish_intro.emit(()))
            };
            html! {
                <div class="world-intro">
                    <p class="world-intro-text">
                        { "Two spells meet over the courtyard. The clash tears the seventh hour open." }
                    </p>
                    <button class="world-intro-skip" onclick={skip}>{ "Skip" }</button>
                </div>
            }
        }
        StagePhase::AwaitingStart { pending } => {
            html! { <StageGate stage={pending} on_start={start_stage.clone()} /> }
        }
        StagePhase::Active { stage } => {
            html! {
                <div class="world-stage-label">
                    <h3>{ stage_name(stage) }</h3>
                </div>
            }
        }
    };

    html! {
        <div class="world-view">
            { overlay }
            <div class="world-readout">{ (*readout).clone() }</div>
        </div>
    }
}
