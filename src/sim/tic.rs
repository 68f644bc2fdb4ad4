use hecs::{Entity, World};
use std::time::{Duration, Instant};

use super::{Angle, Billboard, InputCmd, Player, Position, systems};
use crate::world::{Camera, Grid, GridError, Sprite, TextureId};
use glam::Vec2;

pub const SIM_FPS: u32 = 35;
const TIC: Duration = Duration::from_micros(1_000_000 / SIM_FPS as u64);

/// Owns the ECS world and drives all game‑logic systems.
pub struct TicRunner {
    world: World,
    player: Option<Entity>,
    input: InputCmd,
    last: Instant,
}

impl Default for TicRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TicRunner {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            player: None,
            input: InputCmd::default(),
            last: Instant::now(),
        }
    }

    #[inline]
    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut hecs::World {
        &mut self.world
    }

    /// Spawn the camera-carrying entity; replaces any previous player.
    pub fn spawn_player(&mut self, pos: Vec2, angle: f32) -> Entity {
        if let Some(old) = self.player.take() {
            if self.world.despawn(old).is_err() {
                tracing::trace!(?old, "previous player already despawned");
            }
        }
        let e = self.world.spawn((Position(pos), Angle(angle), Player));
        self.player = Some(e);
        e
    }

    pub fn spawn_billboard(&mut self, pos: Vec2, z: f32, texture: TextureId) -> Entity {
        self.world.spawn((Position(pos), Billboard { z, texture }))
    }

    #[inline]
    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    /// Input applied on the following tics.
    ///
    /// `interact` stays latched until a tic consumes it, so a key press
    /// between two tics is not lost.
    pub fn set_input(&mut self, cmd: InputCmd) {
        self.input = InputCmd {
            interact: self.input.interact || cmd.interact,
            ..cmd
        };
    }

    pub fn camera(&self) -> Option<Camera> {
        systems::camera_for(&self.world, self.player?)
    }

    pub fn sprites(&self) -> Vec<Sprite> {
        systems::collect_sprites(&self.world)
    }

    /// Advance enough tics to synchronise simulation with real time.
    /// Returns the number of tics run.
    pub fn pump(&mut self, grid: &mut Grid) -> Result<u32, GridError> {
        let mut n = 0;
        while self.last.elapsed() >= TIC {
            self.tick(grid)?;
            self.last += TIC;
            n += 1;
        }
        Ok(n)
    }

    /* ---------------------------------------------------------------- */
    /* run one fixed‑rate game tic                                       */
    /* ---------------------------------------------------------------- */
    pub fn tick(&mut self, grid: &mut Grid) -> Result<(), GridError> {
        if let Some(player) = self.player {
            systems::player_input(&mut self.world, grid, player, self.input)?;
        }
        // edge-triggered: one press, one use
        self.input.interact = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::GridKind;
    use glam::vec2;
    use std::f32::consts::FRAC_PI_2;

    #[rustfmt::skip]
    fn grid() -> Grid {
        let wall = vec![
            1, 1, 1,
            1, 8, 1,
            1, 0, 1,
            1, 1, 1,
        ];
        Grid::new(3, 4, 64.0, wall, vec![0; 12], vec![0; 12]).unwrap()
    }

    #[test]
    fn interact_fires_once_and_movement_repeats() {
        let mut grid = grid();
        let mut sim = TicRunner::new();
        sim.spawn_player(vec2(96.0, 150.0), FRAC_PI_2);
        sim.set_input(InputCmd {
            interact: true,
            ..Default::default()
        });

        sim.tick(&mut grid).unwrap();
        assert_eq!(grid.cell(GridKind::Wall, 4), 0);
        // a new door in the same spot is left alone by the next tic
        grid.set_cell(GridKind::Wall, 4, 8).unwrap();
        sim.tick(&mut grid).unwrap();
        assert_eq!(grid.cell(GridKind::Wall, 4), 8);

        // held movement applies on every tic
        sim.set_input(InputCmd {
            forward: -1.0,
            ..Default::default()
        });
        sim.tick(&mut grid).unwrap();
        sim.tick(&mut grid).unwrap();
        let y = sim.camera().unwrap().pos().y;
        assert!((y - 160.0).abs() < 1e-3, "{y}");
    }

    #[test]
    fn use_happens_after_the_move_of_the_same_tic() {
        // backing away and pressing use together: the door is out of reach
        let mut grid = grid();
        let mut sim = TicRunner::new();
        sim.spawn_player(vec2(96.0, 150.0), FRAC_PI_2);
        sim.set_input(InputCmd {
            forward: -1.0,
            interact: true,
            ..Default::default()
        });
        sim.tick(&mut grid).unwrap();
        assert_eq!(grid.cell(GridKind::Wall, 4), 8);
    }

    #[test]
    fn interact_press_survives_until_the_next_tic() {
        let mut grid = grid();
        let mut sim = TicRunner::new();
        sim.spawn_player(vec2(96.0, 150.0), FRAC_PI_2);
        sim.set_input(InputCmd {
            interact: true,
            ..Default::default()
        });
        // next frame, key already released
        sim.set_input(InputCmd::default());
        sim.tick(&mut grid).unwrap();
        assert_eq!(grid.cell(GridKind::Wall, 4), 0);
    }

    #[test]
    fn respawning_player_replaces_the_old_one() {
        let mut sim = TicRunner::new();
        let a = sim.spawn_player(vec2(1.0, 1.0), 0.0);
        let b = sim.spawn_player(vec2(2.0, 2.0), 0.0);
        assert_ne!(a, b);
        assert!(!sim.world().contains(a));
        assert_eq!(sim.player(), Some(b));
        assert_eq!(sim.camera().unwrap().pos(), vec2(2.0, 2.0));
    }

    #[test]
    fn respawn_after_external_despawn() {
        let mut sim = TicRunner::new();
        let a = sim.spawn_player(vec2(1.0, 1.0), 0.0);
        sim.world_mut().despawn(a).unwrap();
        let b = sim.spawn_player(vec2(3.0, 3.0), 0.0);
        assert_eq!(sim.player(), Some(b));
        assert_eq!(sim.camera().unwrap().pos(), vec2(3.0, 3.0));
    }

    #[test]
    fn sprites_follow_spawns() {
        let mut sim = TicRunner::default();
        assert!(sim.camera().is_none());
        sim.spawn_billboard(vec2(5.0, 5.0), 0.0, 1);
        assert_eq!(sim.sprites(), vec![Sprite::new(vec2(5.0, 5.0), 0.0, 1)]);
    }
}
