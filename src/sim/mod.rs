mod collision;
mod components;
mod systems;
mod tic;

pub use collision::{MoveResult, PROBE_RADIUS, USE_RANGE, try_move, use_doors};
pub use components::{Angle, Billboard, InputCmd, Player, Position};
pub use systems::{MOVE_STEP, TURN_STEP, camera_for, collect_sprites, find_player, player_input};
pub use tic::{SIM_FPS, TicRunner};
