//! Built-in demo level: a walled yard with two door-sealed rooms, procedural
//! textures and a panoramic sky. Lets the viewers run without asset files.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Vec2, vec2};
use hecs::Entity;

use crate::{
    config::RenderConfig,
    sim::TicRunner,
    world::{Grid, GridError, Rgb, Texture, TextureBank, TextureError},
};

pub const TILE: f32 = 64.0;
pub const TEXTURE_SIZE: usize = 32;

pub const LEVEL_W: usize = 12;
pub const LEVEL_H: usize = 10;

/// DDA steps that reach the far border from any open cell.
pub const MAX_DEPTH: u32 = (if LEVEL_W > LEVEL_H { LEVEL_W } else { LEVEL_H }) as u32;

/// Texture ids in bank order; wall value = id + 1.
pub mod tex {
    use crate::world::TextureId;

    pub const BRICK: TextureId = 0;
    pub const STONE: TextureId = 1;
    pub const WOOD: TextureId = 2;
    pub const MOSS: TextureId = 3;
    pub const METAL: TextureId = 4;
    pub const FLOOR: TextureId = 5;
    pub const CEILING: TextureId = 6;
    /// Wall value 8, the first door value.
    pub const DOOR: TextureId = 7;
    pub const BARREL: TextureId = 8;
    pub const LAMP: TextureId = 9;
}

#[rustfmt::skip]
const WALLS: [u16; LEVEL_W * LEVEL_H] = [
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 2, 0, 0, 3, 3, 0, 0, 1,
    1, 0, 0, 0, 8, 0, 0, 0, 3, 0, 0, 1,
    1, 2, 8, 2, 2, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 4, 4, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 4, 0, 0, 5, 0, 1,
    1, 0, 5, 0, 0, 0, 0, 0, 0, 5, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
];

/// Player start: bottom-left corner, facing up the map.
pub const START: Vec2 = vec2(1.5 * TILE, 8.5 * TILE);
pub const START_ANGLE: f32 = FRAC_PI_2;

/// Wall, floor and ceiling layers. The room behind the doors is roofed;
/// the yard is open to the sky.
pub fn level() -> Result<Grid, GridError> {
    let n = LEVEL_W * LEVEL_H;
    let floor = vec![tex::FLOOR + 1; n];
    let mut ceiling = vec![0; n];
    for y in 1..4 {
        for x in 1..4 {
            ceiling[y * LEVEL_W + x] = tex::CEILING + 1;
        }
    }
    Grid::new(LEVEL_W, LEVEL_H, TILE, WALLS.to_vec(), floor, ceiling)
}

/// Raise the step budget so every ray inside the level reaches a wall.
pub fn fit_config(config: &mut RenderConfig) {
    if config.max_depth < MAX_DEPTH {
        tracing::debug!(from = config.max_depth, to = MAX_DEPTH, "max_depth raised for demo level");
        config.max_depth = MAX_DEPTH;
    }
}

/// Player plus a few billboards.
pub fn populate(sim: &mut TicRunner) -> Entity {
    sim.spawn_billboard(vec2(5.5 * TILE, 7.5 * TILE), 0.0, tex::BARREL);
    sim.spawn_billboard(vec2(2.5 * TILE, 2.5 * TILE), 0.0, tex::BARREL);
    sim.spawn_billboard(vec2(9.5 * TILE, 2.5 * TILE), 16.0, tex::LAMP);
    sim.spawn_player(START, START_ANGLE)
}

/*──────────────────────── procedural textures ───────────────────────*/

/// Cheap integer hash for texel noise.
fn noise(x: usize, y: usize, seed: u32) -> u8 {
    let mut h = (x as u32).wrapping_mul(0x27d4_eb2d) ^ (y as u32).wrapping_mul(0x1656_67b1) ^ seed;
    h ^= h >> 15;
    h = h.wrapping_mul(0x2c1b_3c6d);
    h ^= h >> 12;
    (h & 0xFF) as u8
}

fn jitter(c: Rgb, n: u8, amount: i32) -> Rgb {
    let d = (n as i32 * amount) / 255 - amount / 2;
    let ch = |v: u8| (v as i32 + d).clamp(0, 254) as u8;
    Rgb(ch(c.0), ch(c.1), ch(c.2))
}

fn paint<F: Fn(usize, usize) -> Rgb>(name: &str, side: usize, f: F) -> Texture {
    paint_rect(name, side, side, f)
}

fn brick(side: usize, base: Rgb, seed: u32) -> impl Fn(usize, usize) -> Rgb {
    let course = (side / 4).max(2);
    move |x, y| {
        let row = y / course;
        let shift = if row % 2 == 0 { 0 } else { side / 4 };
        let mortar = y % course == 0 || (x + shift) % (side / 2).max(2) == 0;
        if mortar {
            Rgb(150, 150, 140)
        } else {
            jitter(base, noise(x, y, seed), 40)
        }
    }
}

fn wall_textures(side: usize) -> Vec<Texture> {
    let bars = (side / 8).max(1);
    vec![
        paint("BRICK", side, brick(side, Rgb(150, 50, 40), 1)),
        paint("STONE", side, |x, y| {
            let block = noise(x / (side / 4).max(1), y / (side / 4).max(1), 7);
            jitter(Rgb(110 + block / 8, 110 + block / 8, 115), noise(x, y, 2), 50)
        }),
        paint("WOOD", side, |x, y| {
            let plank = x / (side / 4).max(1);
            if x % (side / 4).max(1) == 0 {
                Rgb(60, 35, 15)
            } else {
                let grain = noise(plank, y / 3, 3) / 6;
                jitter(Rgb(130 + grain, 85, 40), noise(x, y, 4), 20)
            }
        }),
        paint("MOSS", side, {
            let base = brick(side, Rgb(120, 110, 100), 5);
            move |x, y| {
                if noise(x / 2, y / 2, 6) > 170 {
                    jitter(Rgb(50, 110, 40), noise(x, y, 8), 30)
                } else {
                    base(x, y)
                }
            }
        }),
        paint("METAL", side, |x, y| {
            let edge = x % (side / 2) < 1 || y % (side / 2) < 1;
            let rivet = x % (side / 2) == 2 && y % (side / 2) == 2;
            if rivet {
                Rgb(220, 220, 230)
            } else if edge {
                Rgb(60, 60, 70)
            } else {
                jitter(Rgb(120, 125, 135), noise(x, y, 9), 16)
            }
        }),
        paint("FLOOR", side, |x, y| {
            let light = (x / (side / 2) + y / (side / 2)) % 2 == 0;
            let base = if light { Rgb(100, 100, 90) } else { Rgb(70, 70, 65) };
            jitter(base, noise(x, y, 10), 20)
        }),
        paint("CEILING", side, |x, y| {
            if x % (side / 2) == 0 || y % (side / 2) == 0 {
                Rgb(30, 30, 35)
            } else {
                jitter(Rgb(80, 80, 90), noise(x, y, 11), 12)
            }
        }),
        // planks with see-through slots
        paint("DOOR", side, move |x, y| {
            let frame = x < bars || x >= side - bars || y < bars || y >= side - bars;
            let slot = !frame && (x / bars) % 3 == 1 && y > side / 4 && y < side * 3 / 4;
            if slot {
                Rgb::SENTINEL
            } else {
                jitter(Rgb(110, 70, 30), noise(x, y, 12), 25)
            }
        }),
    ]
}

fn sprite_textures(side: usize) -> Vec<Texture> {
    let s = side as f32;
    vec![
        paint("BARREL", side, move |x, y| {
            let (fx, fy) = (x as f32 + 0.5, y as f32 + 0.5);
            let half = s * 0.3;
            let dx = (fx - s * 0.5).abs();
            if fy < s * 0.35 || dx > half {
                return Rgb::SENTINEL;
            }
            // hoops
            if ((fy - s * 0.35) as usize) % (side / 4).max(1) == 0 {
                return Rgb(50, 50, 50);
            }
            let light = (1.0 - dx / half) * 0.6 + 0.4;
            Rgb(40, (140.0 * light) as u8, 40)
        }),
        paint("LAMP", side, move |x, y| {
            let (fx, fy) = (x as f32 + 0.5, y as f32 + 0.5);
            let globe = vec2(fx - s * 0.5, fy - s * 0.3).length();
            if globe < s * 0.2 {
                let glow = 1.0 - globe / (s * 0.2);
                Rgb(255, (200.0 + 55.0 * glow) as u8, (80.0 + 120.0 * glow) as u8)
            } else if (fx - s * 0.5).abs() < s / 32.0 + 0.5 && fy > s * 0.5 {
                Rgb(40, 40, 40)
            } else {
                Rgb::SENTINEL
            }
        }),
    ]
}

/// Every demo texture, ids as in [`tex`].
pub fn textures(side: usize) -> Result<TextureBank, TextureError> {
    let mut bank = TextureBank::new(side)?;
    for t in wall_textures(side).into_iter().chain(sprite_textures(side)) {
        let name = t.name.clone();
        bank.insert(name, t)?;
    }
    tracing::debug!(textures = bank.len(), side, "demo textures generated");
    Ok(bank)
}

/// Dusk gradient over a band of hills; the hills wrap around 360°.
pub fn sky(w: usize, h: usize) -> Texture {
    paint_rect("SKY", w, h, |x, y| {
        let t = x as f32 / w as f32 * TAU;
        let hills = 0.62 + 0.08 * (t * 3.0).sin() + 0.05 * (t * 7.0 + 1.3).sin();
        let v = y as f32 / h as f32;
        if v > hills {
            Rgb(30, 45, 35)
        } else {
            let k = v / hills;
            Rgb(
                (40.0 + 180.0 * k) as u8,
                (60.0 + 80.0 * k) as u8,
                (140.0 - 40.0 * k) as u8,
            )
        }
    })
}

fn paint_rect<F: Fn(usize, usize) -> Rgb>(name: &str, w: usize, h: usize, f: F) -> Texture {
    let mut pixels = Vec::with_capacity(w * h * 3);
    for y in 0..h {
        for x in 0..w {
            let c = f(x, y);
            pixels.extend_from_slice(&[c.0, c.1, c.2]);
        }
    }
    Texture {
        name: name.into(),
        w,
        h,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::RayCaster,
        world::{GridKind, TileFlags},
    };

    #[test]
    fn level_is_closed_and_start_is_open() {
        let grid = level().unwrap();
        for x in 0..LEVEL_W {
            for y in [0, LEVEL_H - 1] {
                assert!(grid.is_solid(grid.cell(GridKind::Wall, y * LEVEL_W + x)));
            }
        }
        for y in 0..LEVEL_H {
            for x in [0, LEVEL_W - 1] {
                assert!(grid.is_solid(grid.cell(GridKind::Wall, y * LEVEL_W + x)));
            }
        }
        assert!(!grid.is_occupied_at(START));
        assert!(grid.classify(8).contains(TileFlags::TRANSPARENT));
    }

    #[test]
    fn fitted_budget_reaches_a_wall_from_start() {
        let grid = level().unwrap();
        let mut cfg = RenderConfig::default();
        fit_config(&mut cfg);
        assert_eq!(cfg.max_depth, MAX_DEPTH);
        let caster = RayCaster::new(cfg.max_depth, cfg.vertical_shade);

        for i in 0..720 {
            let angle = i as f32 * TAU / 720.0;
            let cast = caster.cast(&grid, START, angle);
            assert!(cast.nearest_opaque().is_some(), "ray {i} found no wall");
        }
    }

    #[test]
    fn fitted_budget_reaches_a_wall_from_every_open_cell() {
        let grid = level().unwrap();
        let caster = RayCaster::new(MAX_DEPTH, 0.5);
        for y in 0..LEVEL_H {
            for x in 0..LEVEL_W {
                if grid.cell(GridKind::Wall, y * LEVEL_W + x) != 0 {
                    continue;
                }
                let origin = vec2((x as f32 + 0.5) * TILE, (y as f32 + 0.5) * TILE);
                for i in 0..64 {
                    let angle = i as f32 * TAU / 64.0 + 0.01;
                    assert!(
                        caster.cast(&grid, origin, angle).nearest_opaque().is_some(),
                        "cell ({x}, {y}) ray {i}"
                    );
                }
            }
        }
    }

    #[test]
    fn fit_never_lowers_a_larger_budget() {
        let mut cfg = RenderConfig {
            max_depth: 40,
            ..Default::default()
        };
        fit_config(&mut cfg);
        assert_eq!(cfg.max_depth, 40);
    }

    #[test]
    fn every_cell_value_has_a_texture() {
        let grid = level().unwrap();
        let bank = textures(TEXTURE_SIZE).unwrap();
        for kind in [GridKind::Wall, GridKind::Floor, GridKind::Ceiling] {
            for i in 0..grid.len() {
                let v = grid.cell(kind, i);
                if v != 0 {
                    assert!(bank.texture(v - 1).is_ok(), "{kind:?} value {v}");
                }
            }
        }
    }

    #[test]
    fn bank_layout() {
        let bank = textures(TEXTURE_SIZE).unwrap();
        assert_eq!(bank.len(), 10);
        assert_eq!(bank.id("DOOR"), Some(tex::DOOR));
        assert_eq!(bank.id("LAMP"), Some(tex::LAMP));

        let door = bank.texture(tex::DOOR).unwrap();
        assert!(door.pixels.chunks(3).any(|c| c == [255, 0, 255]));
        // frame is solid
        assert!(!door.texel(0, 0).is_sentinel());

        let barrel = bank.texture(tex::BARREL).unwrap();
        assert!(barrel.texel(0, 0).is_sentinel());
        assert!(!barrel.texel(16, 24).is_sentinel());

        // only door and sprites may be see-through
        for id in [tex::BRICK, tex::STONE, tex::WOOD, tex::MOSS, tex::METAL, tex::FLOOR] {
            let t = bank.texture(id).unwrap();
            assert!(t.pixels.chunks(3).all(|c| c != [255, 0, 255]), "{}", t.name);
        }
    }

    #[test]
    fn other_texture_sizes_work() {
        assert_eq!(textures(64).unwrap().side(), 64);
        assert_eq!(textures(8).unwrap().len(), 10);
    }

    #[test]
    fn sky_wraps_horizontally() {
        let sky = sky(256, 64);
        assert_eq!((sky.w, sky.h), (256, 64));
        // hill line continuous across the seam
        assert_eq!(sky.texel(0, 63), sky.texel(255, 63));
    }

    #[test]
    fn populate_spawns_player_and_billboards() {
        let mut sim = TicRunner::new();
        let p = populate(&mut sim);
        assert_eq!(sim.player(), Some(p));
        assert_eq!(sim.sprites().len(), 3);
        assert_eq!(sim.camera().unwrap().pos(), START);
    }
}
