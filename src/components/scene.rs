//! Simulation state for the animated page background.
//!
//! Everything here is plain geometry driven by a [`RandomSource`] and frame
//! timestamps in milliseconds, so it can be stepped outside a browser.
//! Painting lives in [`crate::components::background`].

use std::f64::consts::PI;

use crate::components::theme_toggle::Theme;

pub const MAX_CLOUDS: usize = 15;
pub const MAX_STARS: usize = 150;
pub const MAX_COMETS: usize = 4;
pub const COMET_INTERVAL_MS: f64 = 2500.0;
pub const BLINK_DURATION_MS: f64 = 1200.0;
pub const INTER_BLINK_DELAY_MS: f64 = 150.0;
pub const STAR_DIM_FACTOR: f64 = 0.1;

pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    fn range(&mut self, min: f64, max: f64) -> f64 {
        self.next_f64() * (max - min) + min
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Puff {
    pub offset_x: f64,
    pub offset_y: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub radius_base: f64,
    pub puffs: Vec<Puff>,
    pub opacity: f64,
}

impl Cloud {
    fn new(width: f64, height: f64, rng: &mut impl RandomSource) -> Self {
        let x = rng.range(-width * 0.5, width * 1.5);
        let y = rng.range(height * 0.05, height * 0.5);
        let speed = rng.range(0.05, 0.3);
        let radius_base = rng.range(40.0, 100.0);
        let puff_count = rng.range(3.0, 5.0).floor() as usize;
        let puffs = (0..puff_count)
            .map(|_| Puff {
                offset_x: rng.range(-radius_base * 0.7, radius_base * 0.7),
                offset_y: rng.range(-radius_base * 0.2, radius_base * 0.2),
                radius: rng.range(radius_base * 0.4, radius_base * 1.1),
            })
            .collect();
        let opacity = rng.range(0.6, 0.9);

        Self {
            x,
            y,
            speed,
            radius_base,
            puffs,
            opacity,
        }
    }

    fn update(&mut self, width: f64, height: f64, rng: &mut impl RandomSource) {
        self.x += self.speed;
        if self.x - self.radius_base * 2.0 > width {
            self.x = -self.radius_base * 3.0;
            self.y = rng.range(height * 0.05, height * 0.5);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub base_opacity: f64,
    pub opacity: f64,
}

impl Star {
    fn new(width: f64, height: f64, rng: &mut impl RandomSource) -> Self {
        let x = rng.range(0.0, width);
        let y = rng.range(0.0, height * 0.85);
        let radius = rng.range(0.6, 2.0);
        let base_opacity = rng.range(0.7, 1.0);
        Self {
            x,
            y,
            radius,
            base_opacity,
            opacity: base_opacity * STAR_DIM_FACTOR,
        }
    }

    pub fn rest_opacity(&self) -> f64 {
        self.base_opacity * STAR_DIM_FACTOR
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comet {
    pub x: f64,
    pub y: f64,
    pub length: f64,
    pub speed: f64,
    pub dx: f64,
    pub dy: f64,
    pub brightness: f64,
}

impl Comet {
    fn new(width: f64, rng: &mut impl RandomSource) -> Self {
        let x = rng.range(0.0, width);
        let y = rng.range(-30.0, -5.0);
        let length = rng.range(80.0, 150.0);
        let speed = rng.range(1.5, 4.0);
        let angle = rng.range(PI * 0.3, PI * 0.7);
        let brightness = rng.range(0.7, 1.0);
        Self {
            x,
            y,
            length,
            speed,
            dx: angle.cos() * speed,
            dy: angle.sin() * speed,
            brightness,
        }
    }

    fn update(&mut self) {
        self.x += self.dx;
        self.y += self.dy;
    }

    /// End of the tail, `length` pixels behind the head along the direction of travel.
    pub fn tail(&self) -> (f64, f64) {
        let steps = self.length / self.speed;
        (self.x - self.dx * steps, self.y - self.dy * steps)
    }

    pub fn is_offscreen(&self, width: f64, height: f64) -> bool {
        self.y > height + self.length || self.x < -self.length || self.x > width + self.length
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NightSky {
    pub stars: Vec<Star>,
    pub comets: Vec<Comet>,
    pub last_comet_at: f64,
    pub blinking: Option<usize>,
    pub blink_started_at: f64,
}

impl NightSky {
    fn new(width: f64, height: f64, now: f64, rng: &mut impl RandomSource) -> Self {
        Self {
            stars: (0..MAX_STARS).map(|_| Star::new(width, height, rng)).collect(),
            comets: Vec::new(),
            last_comet_at: now,
            blinking: None,
            blink_started_at: now,
        }
    }

    fn update_blink(&mut self, now: f64, rng: &mut impl RandomSource) {
        if self.stars.is_empty() {
            return;
        }

        match self.blinking.and_then(|i| self.stars.get_mut(i)) {
            Some(star) => {
                let progress = (now - self.blink_started_at) / BLINK_DURATION_MS;
                if progress < 1.0 {
                    let amplitude = star.base_opacity * (1.0 - STAR_DIM_FACTOR);
                    star.opacity = star.rest_opacity() + amplitude * (progress * PI).sin();
                } else {
                    star.opacity = star.rest_opacity();
                    self.blinking = None;
                    self.blink_started_at = now;
                }
            }
            None => {
                if now - self.blink_started_at > INTER_BLINK_DELAY_MS {
                    for star in &mut self.stars {
                        star.opacity = star.rest_opacity();
                    }
                    let last = self.stars.len() - 1;
                    let next = rng.range(0.0, self.stars.len() as f64).floor() as usize;
                    self.blinking = Some(next.min(last));
                    self.blink_started_at = now;
                }
            }
        }
    }

    fn update_comets(&mut self, width: f64, height: f64, now: f64, rng: &mut impl RandomSource) {
        if now - self.last_comet_at > COMET_INTERVAL_MS && self.comets.len() < MAX_COMETS {
            self.comets.push(Comet::new(width, rng));
            self.last_comet_at = now;
        }
        for comet in &mut self.comets {
            comet.update();
        }
        self.comets.retain(|c| !c.is_offscreen(width, height));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scene {
    Sky { clouds: Vec<Cloud> },
    Night(NightSky),
}

impl Scene {
    fn new(theme: Theme, width: f64, height: f64, now: f64, rng: &mut impl RandomSource) -> Self {
        match theme {
            Theme::Sky => Scene::Sky {
                clouds: (0..MAX_CLOUDS).map(|_| Cloud::new(width, height, rng)).collect(),
            },
            Theme::Deep => Scene::Night(NightSky::new(width, height, now, rng)),
        }
    }

    pub fn theme(&self) -> Theme {
        match self {
            Scene::Sky { .. } => Theme::Sky,
            Scene::Night(_) => Theme::Deep,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    pub width: f64,
    pub height: f64,
    pub scene: Scene,
}

impl Background {
    pub fn new(theme: Theme, width: f64, height: f64, now: f64, rng: &mut impl RandomSource) -> Self {
        Self {
            width,
            height,
            scene: Scene::new(theme, width, height, now, rng),
        }
    }

    /// Resizing always rebuilds the current scene for the new viewport.
    pub fn resize(&mut self, width: f64, height: f64, now: f64, rng: &mut impl RandomSource) {
        self.width = width;
        self.height = height;
        self.scene = Scene::new(self.scene.theme(), width, height, now, rng);
    }

    /// Returns `true` when the scene was rebuilt.
    pub fn set_theme(&mut self, theme: Theme, now: f64, rng: &mut impl RandomSource) -> bool {
        if self.scene.theme() == theme {
            return false;
        }
        self.scene = Scene::new(theme, self.width, self.height, now, rng);
        true
    }

    pub fn step(&mut self, now: f64, rng: &mut impl RandomSource) {
        let (width, height) = (self.width, self.height);
        match &mut self.scene {
            Scene::Sky { clouds } => {
                for cloud in clouds {
                    cloud.update(width, height, rng);
                }
            }
            Scene::Night(night) => {
                night.update_blink(now, rng);
                night.update_comets(width, height, now, rng);
            }
        }
    }
}
