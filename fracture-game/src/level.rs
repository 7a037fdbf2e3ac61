use glam::Vec3;

use crate::stage::STAGE_COUNT;

/// Horizontal radius within which a checkpoint counts as touched.
pub const CHECKPOINT_RADIUS: f32 = 2.8;
/// Vertical tolerance for checkpoint contact; the sigil floats above its
/// ground ring.
pub const CHECKPOINT_HEIGHT: f32 = 4.0;

/// Surface tags the grounding raycast recognizes. Anything else in the
/// world (pillars, trees, set dressing) is invisible to the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Floor,
    Platform,
}

impl SurfaceKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Floor => "floor",
            Self::Platform => "platform",
        }
    }
}

/// An axis-aligned walkable box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub kind: SurfaceKind,
    pub min: Vec3,
    pub max: Vec3,
}

impl Surface {
    /// A box from its center and half extents.
    #[must_use]
    pub fn from_center(kind: SurfaceKind, center: Vec3, half: Vec3) -> Self {
        Self {
            kind,
            min: center - half,
            max: center + half,
        }
    }

    #[must_use]
    pub fn top(&self) -> f32 {
        self.max.y
    }

    fn covers_xz(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

/// Result of the downward grounding probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    pub y: f32,
    pub distance: f32,
    pub kind: SurfaceKind,
}

/// The in-world trigger that completes a stage and requests the next one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Checkpoint {
    pub position: Vec3,
    pub target_stage: u8,
}

/// Walkable geometry, spawn point and checkpoint for one stage.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelGeometry {
    pub stage: u8,
    pub spawn: Vec3,
    pub checkpoint: Checkpoint,
    surfaces: Vec<Surface>,
}

impl LevelGeometry {
    /// Build the geometry for a stage. Stage indices wrap, matching the
    /// sequencer's cyclic hub loop.
    #[must_use]
    pub fn for_stage(stage: u8) -> Self {
        match stage % STAGE_COUNT {
            1 => Self::frozen_hall(),
            2 => Self::fractured_forest(),
            3 => Self::echo_chamber(),
            _ => Self::corridor_hub(),
        }
    }

    /// Stage 0: the long corridor anchoring the castle.
    fn corridor_hub() -> Self {
        Self {
            stage: 0,
            spawn: Vec3::new(0.0, 2.0, 0.0),
            checkpoint: Checkpoint {
                position: Vec3::new(0.0, 0.0, -30.0),
                target_stage: 1,
            },
            surfaces: vec![Surface {
                kind: SurfaceKind::Floor,
                min: Vec3::new(-20.0, -0.5, -100.0),
                max: Vec3::new(20.0, 0.0, 100.0),
            }],
        }
    }

    /// Stage 1: a climb over floating archive platforms to the Grand
    /// Hourglass. The alternating stair layout mirrors the original hall.
    fn frozen_hall() -> Self {
        let mut surfaces = vec![Surface {
            kind: SurfaceKind::Floor,
            min: Vec3::new(-100.0, -0.5, -100.0),
            max: Vec3::new(100.0, 0.0, 100.0),
        }];
        for i in 0..15 {
            let x = if i % 2 == 0 { 3.0 } else { -3.0 };
            #[allow(clippy::cast_precision_loss)]
            let step = i as f32;
            surfaces.push(Surface::from_center(
                SurfaceKind::Platform,
                Vec3::new(x, step * 1.5 + 1.5, -step * 5.0 - 10.0),
                Vec3::new(3.0, 0.3, 3.0),
            ));
        }
        Self {
            stage: 1,
            spawn: Vec3::new(0.0, 2.0, 0.0),
            checkpoint: Checkpoint {
                position: Vec3::new(0.0, 16.0, -95.0),
                target_stage: 2,
            },
            surfaces,
        }
    }

    /// Stage 2: open forest floor; the trees are not walkable.
    fn fractured_forest() -> Self {
        Self {
            stage: 2,
            spawn: Vec3::new(0.0, 2.0, 0.0),
            checkpoint: Checkpoint {
                position: Vec3::new(0.0, 0.0, -120.0),
                target_stage: 3,
            },
            surfaces: vec![Surface {
                kind: SurfaceKind::Floor,
                min: Vec3::new(-200.0, -0.5, -200.0),
                max: Vec3::new(200.0, 0.0, 200.0),
            }],
        }
    }

    /// Stage 3: the mirror chamber. Its checkpoint returns to the hub.
    fn echo_chamber() -> Self {
        Self {
            stage: 3,
            spawn: Vec3::new(0.0, 2.0, 0.0),
            checkpoint: Checkpoint {
                position: Vec3::new(0.0, 0.0, -25.0),
                target_stage: 0,
            },
            surfaces: vec![Surface {
                kind: SurfaceKind::Floor,
                min: Vec3::new(-40.0, -0.5, -40.0),
                max: Vec3::new(40.0, 0.0, 40.0),
            }],
        }
    }

    #[must_use]
    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    /// Cast straight down from `origin` and report the nearest tagged
    /// surface at or below it. A miss is a defined steady state, not an
    /// error.
    #[must_use]
    pub fn raycast_down(&self, origin: Vec3) -> Option<GroundHit> {
        self.surfaces
            .iter()
            .filter(|surface| surface.covers_xz(origin) && surface.top() <= origin.y)
            .map(|surface| GroundHit {
                y: surface.top(),
                distance: origin.y - surface.top(),
                kind: surface.kind,
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Whether `position` is in contact with this stage's checkpoint.
    /// Carries the target stage of the collision signal.
    #[must_use]
    pub fn checkpoint_hit(&self, position: Vec3) -> Option<u8> {
        let offset = position - self.checkpoint.position;
        let horizontal = Vec3::new(offset.x, 0.0, offset.z).length();
        if horizontal <= CHECKPOINT_RADIUS && offset.y.abs() <= CHECKPOINT_HEIGHT {
            Some(self.checkpoint.target_stage)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hub_floor_is_hit_from_spawn() {
        let level = LevelGeometry::for_stage(0);
        let hit = level.raycast_down(Vec3::new(0.0, 2.5, 0.0)).unwrap();
        assert_eq!(hit.kind, SurfaceKind::Floor);
        assert!((hit.y - 0.0).abs() < f32::EPSILON);
        assert!((hit.distance - 2.5).abs() < f32::EPSILON);
    }

    #[test]
    fn nearest_surface_wins_over_the_floor_below() {
        let level = LevelGeometry::for_stage(1);
        // Above the first archive platform (center y = 1.5, top = 1.8).
        let hit = level.raycast_down(Vec3::new(3.0, 3.0, -10.0)).unwrap();
        assert_eq!(hit.kind, SurfaceKind::Platform);
        assert!((hit.y - 1.8).abs() < 1e-5);
    }

    #[test]
    fn gap_between_platforms_misses() {
        let level = LevelGeometry::from_center_test_fixture();
        assert!(level.raycast_down(Vec3::new(50.0, 5.0, 50.0)).is_none());
    }

    #[test]
    fn surfaces_above_the_origin_are_ignored() {
        let level = LevelGeometry::for_stage(1);
        // Under the first platform but above the floor: only the floor
        // counts.
        let hit = level.raycast_down(Vec3::new(3.0, 1.0, -10.0)).unwrap();
        assert_eq!(hit.kind, SurfaceKind::Floor);
    }

    #[test]
    fn checkpoint_contact_carries_target_stage() {
        let level = LevelGeometry::for_stage(0);
        assert_eq!(level.checkpoint_hit(Vec3::new(0.5, 0.0, -29.0)), Some(1));
        assert_eq!(level.checkpoint_hit(Vec3::new(0.0, 0.0, -40.0)), None);
        assert_eq!(
            level.checkpoint_hit(Vec3::new(0.0, 10.0, -30.0)),
            None,
            "flying over the sigil does not trigger it"
        );
    }

    #[test]
    fn terminal_stage_checkpoint_targets_the_hub() {
        let level = LevelGeometry::for_stage(3);
        assert_eq!(level.checkpoint.target_stage, 0);
    }

    #[test]
    fn stage_index_wraps() {
        assert_eq!(LevelGeometry::for_stage(4).stage, 0);
        assert_eq!(LevelGeometry::for_stage(5).stage, 1);
    }

    impl LevelGeometry {
        /// A single detached platform over the void.
        fn from_center_test_fixture() -> Self {
            Self {
                stage: 0,
                spawn: Vec3::new(0.0, 2.0, 0.0),
                checkpoint: Checkpoint {
                    position: Vec3::new(0.0, 0.0, -30.0),
                    target_stage: 1,
                },
                surfaces: vec![Surface::from_center(
                    SurfaceKind::Platform,
                    Vec3::new(0.0, 1.0, 0.0),
                    Vec3::new(3.0, 0.3, 3.0),
                )],
            }
        }
    }
}
