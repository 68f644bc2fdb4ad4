use std::f32::consts::TAU;

use crate::{
    renderer::software::Software,
    world::{Camera, Texture, normalize_angle},
};

impl Software {
    /// Cylindrical panorama over the upper half of the screen.
    ///
    /// The full texture width spans 360°, so the visible strip is
    /// `fov / 2π` of it and scrolls with the view angle.
    pub(crate) fn sky_pass(&mut self, sky: &Texture, camera: &Camera) {
        if sky.w == 0 || sky.h == 0 {
            return;
        }
        let fov = self.config.fov();
        let left = camera.angle() + fov * 0.5;
        let w = self.width;

        // texel column per screen column, shared by every row
        let columns: Vec<usize> = (0..w)
            .map(|x| {
                let a = normalize_angle(left - (x as f32 + 0.5) / w as f32 * fov);
                ((a / TAU * sky.w as f32) as usize).min(sky.w - 1)
            })
            .collect();

        for y in 0..self.height / 2 {
            let v = (y * sky.h / self.height).min(sky.h - 1);
            let row = y * w;
            for (x, &u) in columns.iter().enumerate() {
                self.scratch[row + x] = sky.texel(u, v).to_rgba();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::RenderConfig,
        renderer::{Renderer, software::CLEAR},
        world::Rgb,
    };
    use glam::Vec2;
    use std::f32::consts::PI;

    /// 4 columns: red, green, blue, white; each a 90° sector.
    fn compass() -> Texture {
        let cols = [Rgb(255, 0, 0), Rgb(0, 255, 0), Rgb(0, 0, 255), Rgb(255, 255, 255)];
        let mut pixels = Vec::new();
        for _ in 0..2 {
            for c in cols {
                pixels.extend_from_slice(&[c.0, c.1, c.2]);
            }
        }
        Texture::new("SKY", 4, 2, pixels).unwrap()
    }

    fn software() -> Software {
        let mut sw = Software::new(RenderConfig {
            screen_width: 240,
            screen_height: 160,
            ..Default::default()
        });
        sw.begin_frame(240, 160);
        sw
    }

    #[test]
    fn sky_fills_only_the_upper_half() {
        let mut sw = software();
        sw.draw_sky(&compass(), &Camera::new(Vec2::ZERO, 0.3));
        assert!(sw.scratch[..80 * 240].iter().all(|&p| p != CLEAR));
        assert!(sw.scratch[80 * 240..].iter().all(|&p| p == CLEAR));
    }

    #[test]
    fn sky_scrolls_with_the_view_angle() {
        let mut sw = software();
        // looking at 45°: whole view inside the first sector
        sw.draw_sky(&compass(), &Camera::new(Vec2::ZERO, PI / 4.0));
        assert_eq!(sw.scratch[10 * 240 + 120], Rgb(255, 0, 0).to_rgba());

        // looking at 225°: third sector
        sw.draw_sky(&compass(), &Camera::new(Vec2::ZERO, 5.0 * PI / 4.0));
        assert_eq!(sw.scratch[10 * 240 + 120], Rgb(0, 0, 255).to_rgba());
    }
}
