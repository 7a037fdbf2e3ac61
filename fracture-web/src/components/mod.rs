pub mod dialogue_panel;
pub mod hud;
pub mod stage_gate;
pub mod story_scene;
pub mod world_view;
