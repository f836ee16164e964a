//! The demo scene: a rotating cube-mapped skybox around a textured ball.

use std::{rc::Rc, sync::Arc};

use glam::Mat4;
use glow::HasContext;
use skyball_core::transform::{self, MeshRotation};

use crate::{
    abs::{CubeSide, DIFFUSE_UNIT, Effect, EffectSource, Mesh, Texture, TextureKind},
    config::Config,
    error::Result,
};

const PROJECTION_UNIFORM: &str = "u_projection";
const VIEW_UNIFORM: &str = "u_view";
const WORLD_UNIFORM: &str = "u_world";
const SAMPLER_UNIFORM: &str = "u_texture";

const SKYBOX_FACES: [&str; 6] = [
    "textures/posx.png",
    "textures/posy.png",
    "textures/posz.png",
    "textures/negx.png",
    "textures/negy.png",
    "textures/negz.png",
];
const BALL_TEXTURE: &str = "textures/ball.png";
const SKYBOX_MODEL: &str = "models/skybox.obj";
const BALL_MODEL: &str = "models/ball.obj";

/// An effect together with the uniform locations updated after setup.
struct BoundEffect {
    effect: Rc<Effect>,
    projection: glow::UniformLocation,
    world: glow::UniformLocation,
}

impl BoundEffect {
    /// Links the effect and writes its camera, world and sampler uniforms.
    fn new(gl: &Arc<glow::Context>, source: &EffectSource, aspect: f32) -> Result<Self> {
        let effect = Rc::new(Effect::new(gl, source)?);
        effect.apply();

        let projection = effect.uniform_location(PROJECTION_UNIFORM)?;
        effect.set_uniform(&projection, transform::projection(aspect));

        let view = effect.uniform_location(VIEW_UNIFORM)?;
        effect.set_uniform(&view, transform::view());

        let world = effect.uniform_location(WORLD_UNIFORM)?;
        effect.set_uniform(&world, Mat4::IDENTITY);

        let sampler = effect.uniform_location(SAMPLER_UNIFORM)?;
        effect.set_uniform(&sampler, DIFFUSE_UNIT as i32);

        effect.unapply();

        Ok(Self {
            effect,
            projection,
            world,
        })
    }

    fn set_projection(&self, aspect: f32) {
        self.effect.apply();
        self.effect
            .set_uniform(&self.projection, transform::projection(aspect));
        self.effect.unapply();
    }
}

/// Owns the scene and draws it once per [`Application::update`].
pub struct Application {
    gl: Arc<glow::Context>,
    skybox_effect: BoundEffect,
    model_effect: BoundEffect,
    skybox: Rc<Mesh>,
    ball: Rc<Mesh>,
    rotation: MeshRotation,
}

impl Application {
    /// Loads every effect, texture and mesh and sets up the fixed GL state.
    pub fn new(gl: &Arc<glow::Context>, config: &Config, (width, height): (u32, u32)) -> Result<Self> {
        let aspect = aspect(width, height);

        let skybox_effect = BoundEffect::new(
            gl,
            &EffectSource::load_dir(config.asset("shaders/skybox"))?,
            aspect,
        )?;
        let model_effect = BoundEffect::new(
            gl,
            &EffectSource::load_dir(config.asset("shaders/model"))?,
            aspect,
        )?;

        let sky_cube = Texture::load(gl, TextureKind::CubeMap, config.asset(SKYBOX_FACES[0]))?;
        for (side, face) in CubeSide::ALL.into_iter().zip(SKYBOX_FACES).skip(1) {
            sky_cube.add_cube_side(side, config.asset(face))?;
        }
        let ball_texture = Texture::load(gl, TextureKind::Texture2D, config.asset(BALL_TEXTURE))?;

        let skybox = Mesh::load(
            gl,
            config.asset(SKYBOX_MODEL),
            Rc::clone(&skybox_effect.effect),
            Some(Rc::new(sky_cube)),
        )?;
        let ball = Mesh::load(
            gl,
            config.asset(BALL_MODEL),
            Rc::clone(&model_effect.effect),
            Some(Rc::new(ball_texture)),
        )?;

        for (name, mesh) in [("skybox", &skybox), ("ball", &ball)] {
            log::debug!(
                "{}: {:?}, {} indices, {} bytes of vertex data",
                name,
                mesh.components(),
                mesh.index_count(),
                mesh.vertex_data_size()
            );
        }

        unsafe {
            gl.viewport(0, 0, width as i32, height as i32);
            gl.clear_color(0.0, 0.0, 0.0, 1.0);
            gl.enable(glow::DEPTH_TEST);
        }

        Ok(Self {
            gl: Arc::clone(gl),
            skybox_effect,
            model_effect,
            skybox,
            ball,
            rotation: MeshRotation::new(),
        })
    }

    /// Advances the rotation by one frame and draws the scene.
    pub fn update(&mut self) {
        unsafe {
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        self.rotation.advance();

        let skybox_effect = &self.skybox_effect.effect;
        skybox_effect.apply();
        skybox_effect.set_uniform(&self.skybox_effect.world, self.rotation.world_transform());

        // the camera sits inside the skybox, so its inward faces must not be culled
        unsafe {
            self.gl.disable(glow::CULL_FACE);
        }
        self.skybox.draw();
        unsafe {
            self.gl.enable(glow::CULL_FACE);
        }
        skybox_effect.unapply();

        self.model_effect.effect.apply();
        self.ball.draw();
        self.model_effect.effect.unapply();
    }

    /// Adapts the viewport and projections to a new drawable size.
    pub fn resize(&mut self, width: u32, height: u32) {
        unsafe {
            self.gl.viewport(0, 0, width as i32, height as i32);
        }
        let aspect = aspect(width, height);
        self.skybox_effect.set_projection(aspect);
        self.model_effect.set_projection(aspect);
        log::debug!("Resized to {}x{}", width, height);
    }

    /// Current rotation angle of the skybox in radians.
    pub fn rotation(&self) -> f32 {
        self.rotation.angle()
    }
}

fn aspect(width: u32, height: u32) -> f32 {
    width as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_survives_zero_height() {
        assert!((aspect(1280, 720) - 16.0 / 9.0).abs() < 1e-6);
        assert_eq!(aspect(640, 0), 640.0);
    }

    #[test]
    fn skybox_faces_match_cube_sides() {
        let sides: Vec<(CubeSide, &str)> = CubeSide::ALL.into_iter().zip(SKYBOX_FACES).collect();
        assert_eq!(sides[0], (CubeSide::PositiveX, "textures/posx.png"));
        assert_eq!(sides[4], (CubeSide::NegativeY, "textures/negy.png"));
    }
}
