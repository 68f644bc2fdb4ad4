use glam::{Vec2, vec2};

use super::helpers::normalize_angle;

/// Player view-point in grid space.
///
/// * Y grows *down* the map, so angle `π/2` looks towards smaller Y.
/// * The forward vector is derived from `angle` on every read.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pos: Vec2,  // world units, same space as the grid
    angle: f32, // radians in [0, 2π), 0 = +X, counter-clockwise on screen
}

impl Camera {
    pub fn new(pos: Vec2, angle: f32) -> Self {
        Self {
            pos,
            angle: normalize_angle(angle),
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the camera looks: `(cos a, -sin a)`.
    #[inline(always)]
    pub fn forward(self) -> Vec2 {
        let (s, c) = self.angle.sin_cos();
        Vec2::new(c, -s)
    }

    /// Unit vector pointing to the camera's right.
    #[inline(always)]
    pub fn right(self) -> Vec2 {
        let (s, c) = self.angle.sin_cos();
        Vec2::new(s, c)
    }

    /// Transform a world point into camera-local coords:
    ///  .x = lateral offset (+ right)
    ///  .y = depth along the forward axis
    #[inline]
    pub fn to_cam(&self, p: Vec2) -> Vec2 {
        let d = p - self.pos;
        vec2(d.dot(self.right()), d.dot(self.forward()))
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
