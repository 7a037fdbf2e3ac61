use glam::{Quat, Vec3};

use crate::level::LevelGeometry;

/// Downward acceleration, world units per second squared.
pub const GRAVITY: f32 = -45.0;
/// Vertical velocity granted by a jump.
pub const JUMP_IMPULSE: f32 = 16.0;
/// Extra impulse while sprinting.
pub const SPRINT_JUMP_BONUS: f32 = 4.0;
pub const WALK_SPEED: f32 = 8.0;
pub const SPRINT_SPEED: f32 = 14.0;
/// Movement slowdown while aiming.
pub const AIM_SPEED_FACTOR: f32 = 0.4;
/// Frame deltas are clamped here to keep the integration stable across
/// frame hitches.
pub const MAX_STEP_DELTA: f32 = 0.05;
/// The grounding ray starts this far above the feet.
pub const RAY_ORIGIN_LIFT: f32 = 0.5;
/// A ray hit farther than this does not count as ground beneath us.
pub const GROUND_PROBE_RANGE: f32 = 1.0;
/// Feet within this distance of the hit snap onto it.
pub const GROUND_SNAP_TOLERANCE: f32 = 0.1;
/// Fallback floor when nothing is beneath the character (open fall).
pub const VOID_FLOOR_Y: f32 = -100.0;
/// Below this the character has fallen out of the world and respawns.
pub const FALL_LIMIT_Y: f32 = -30.0;
/// Exponential smoothing factors; teleports snap instead.
pub const YAW_LERP: f32 = 0.2;
pub const CAMERA_LERP: f32 = 0.1;

const CAMERA_DISTANCE: f32 = 6.0;
const CAMERA_DISTANCE_AIMING: f32 = 3.0;
const CAMERA_HEIGHT: f32 = 2.6;
const CAMERA_HEIGHT_AIMING: f32 = 1.8;
const CAMERA_SIDE_AIMING: f32 = 0.8;

/// Shared press/release flags written by input handlers and read by the
/// frame loop. Plain last-write-wins booleans; no coordination needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
    pub jump: bool,
    pub aiming: bool,
}

/// Per-frame kinematic state owned by the simulator. Transient: never
/// persisted, reset to the stage spawn on every teleport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerKinematics {
    pub position: Vec3,
    pub vertical_velocity: f32,
    pub is_grounded: bool,
    pub is_moving: bool,
    pub floor_y: f32,
    pub yaw: f32,
}

impl PlayerKinematics {
    #[must_use]
    pub fn at_spawn(spawn: Vec3) -> Self {
        Self {
            position: spawn,
            vertical_velocity: 0.0,
            is_grounded: false,
            is_moving: false,
            floor_y: 0.0,
            yaw: 0.0,
        }
    }
}

/// Fire-and-forget respawn request. Multiple raises before consumption
/// collapse into a single reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeleportLatch {
    raised: bool,
}

impl TeleportLatch {
    pub fn raise(&mut self) {
        self.raised = true;
    }

    #[must_use]
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.raised)
    }

    #[must_use]
    pub const fn is_raised(&self) -> bool {
        self.raised
    }
}

/// Edges that fired during one step. Landing reports at most once per
/// frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepEvents {
    pub landed: bool,
    pub jumped: bool,
    pub respawned: bool,
}

/// Third-person follow camera. Interpolates after the character's position
/// is final for the frame; only teleports snap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub position: Vec3,
    pub yaw: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 10.0),
            yaw: 0.0,
        }
    }
}

impl CameraRig {
    fn target_offset(&self, aiming: bool) -> Vec3 {
        let offset = if aiming {
            Vec3::new(CAMERA_SIDE_AIMING, CAMERA_HEIGHT_AIMING, CAMERA_DISTANCE_AIMING)
        } else {
            Vec3::new(0.0, CAMERA_HEIGHT, CAMERA_DISTANCE)
        };
        Quat::from_rotation_y(self.yaw) * offset
    }

    /// Ease toward the follow position behind `target`.
    pub fn follow(&mut self, target: Vec3, aiming: bool) {
        let desired = target + self.target_offset(aiming);
        self.position = self.position.lerp(desired, CAMERA_LERP);
    }

    /// Instant reposition, used on teleports.
    pub fn snap_to(&mut self, target: Vec3, aiming: bool) {
        self.position = target + self.target_offset(aiming);
    }
}

/// Per-frame character controller: grounding probe, jump, camera-relative
/// horizontal movement, gravity, fall-respawn and facing smoothing. All
/// states here are valid steady states; nothing in the step can fail.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementSimulator {
    pub kinematics: PlayerKinematics,
    teleport: TeleportLatch,
    spawn: Vec3,
}

impl MovementSimulator {
    #[must_use]
    pub fn new(spawn: Vec3) -> Self {
        Self {
            kinematics: PlayerKinematics::at_spawn(spawn),
            teleport: TeleportLatch::default(),
            spawn,
        }
    }

    /// Queue a reset to the spawn point; consumed at the start of the
    /// next step. Raised by the stage sequencer on stage start and by the
    /// fall-death check below.
    pub fn request_teleport(&mut self) {
        self.teleport.raise();
    }

    /// Point teleports at a new stage's spawn.
    pub fn set_spawn(&mut self, spawn: Vec3) {
        self.spawn = spawn;
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.kinematics.position
    }

    /// Advance one frame. `camera_yaw` orients horizontal input; `delta`
    /// is wall-clock seconds since the previous frame.
    pub fn step(
        &mut self,
        input: &InputState,
        camera_yaw: f32,
        geometry: &LevelGeometry,
        delta: f32,
    ) -> StepEvents {
        let mut events = StepEvents::default();
        let dt = delta.clamp(0.0, MAX_STEP_DELTA);
        let kin = &mut self.kinematics;

        if self.teleport.take() {
            kin.position = self.spawn;
            kin.vertical_velocity = 0.0;
            kin.is_grounded = false;
            kin.is_moving = false;
            events.respawned = true;
        }

        // 1. Grounding probe from slightly above the feet.
        let ray_origin = kin.position + Vec3::Y * RAY_ORIGIN_LIFT;
        match geometry
            .raycast_down(ray_origin)
            .filter(|hit| hit.distance < GROUND_PROBE_RANGE)
        {
            Some(hit) => {
                kin.floor_y = hit.y;
                if kin.position.y <= kin.floor_y + GROUND_SNAP_TOLERANCE {
                    kin.position.y = kin.floor_y;
                    kin.vertical_velocity = 0.0;
                    if !kin.is_grounded {
                        kin.is_grounded = true;
                        events.landed = true;
                    }
                }
            }
            None => {
                kin.is_grounded = false;
                kin.floor_y = VOID_FLOOR_Y;
            }
        }

        // 2. Jump: grounded flag clears in the same step, so there is no
        // double jump.
        if input.jump && kin.is_grounded {
            kin.vertical_velocity =
                JUMP_IMPULSE + if input.sprint { SPRINT_JUMP_BONUS } else { 0.0 };
            kin.is_grounded = false;
            events.jumped = true;
        }

        // 3. Horizontal intent: normalized, camera-relative, integrated.
        let mut intent = Vec3::ZERO;
        if input.forward {
            intent.z -= 1.0;
        }
        if input.backward {
            intent.z += 1.0;
        }
        if input.left {
            intent.x -= 1.0;
        }
        if input.right {
            intent.x += 1.0;
        }

        let move_dir = if intent != Vec3::ZERO {
            kin.is_moving = true;
            let dir = Quat::from_rotation_y(camera_yaw) * intent.normalize();
            let base = if input.sprint { SPRINT_SPEED } else { WALK_SPEED };
            let speed = if input.aiming { base * AIM_SPEED_FACTOR } else { base };
            kin.position += dir * speed * dt;
            Some(dir)
        } else {
            kin.is_moving = false;
            None
        };

        // 4. Gravity only while airborne.
        if !kin.is_grounded {
            kin.vertical_velocity += GRAVITY * dt;
            kin.position.y += kin.vertical_velocity * dt;
        }

        // 5. Fall-death: the respawn signal is the sole recovery path for
        // slipping through a geometry gap.
        if kin.position.y < FALL_LIMIT_Y {
            self.teleport.raise();
        }

        // 6. Facing, after position is final for the frame.
        if let Some(dir) = move_dir {
            if input.aiming {
                kin.yaw = camera_yaw;
            } else {
                let target_yaw = dir.x.atan2(dir.z);
                kin.yaw = lerp(kin.yaw, target_yaw, YAW_LERP);
            }
        }

        events
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
