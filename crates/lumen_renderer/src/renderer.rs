//! Frame orchestration.
//!
//! A frame clears the buffers and dispatches on [`RenderMode`]:
//! - Point cloud, wireframe and rasterised modes loop over triangles
//! - Ray-traced mode loops over pixels, optionally in parallel buckets

use std::time::Instant;

use lumen_core::{pack_colour, Colour, MaterialKind, Scene, Triangle, REFLECTIVE_PREVIEW, WHITE};
use lumen_math::{Camera, CanvasPoint, Vec3, Viewport, NEAR_EPSILON};
use serde::{Deserialize, Serialize};

use crate::bucket::{render_buckets, DEFAULT_BUCKET_ROWS};
use crate::framebuffer::{FrameBuffer, RenderResult};
use crate::intersect::closest_intersection;
use crate::lighting::{LightingMode, LightingParams};
use crate::raster::{draw_filled_triangle, draw_stroked_triangle, Fill};
use crate::shading::Shader;

/// Which pipeline draws the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderMode {
    /// Projected vertices only
    PointCloud,
    /// Triangle edges
    Wireframe,
    /// Depth-tested scanline fill
    #[default]
    Rasterised,
    /// Recursive ray tracing
    RayTraced,
}

impl RenderMode {
    pub const ALL: [RenderMode; 4] = [
        RenderMode::PointCloud,
        RenderMode::Wireframe,
        RenderMode::Rasterised,
        RenderMode::RayTraced,
    ];
}

/// Render configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Mirror/refractive recursion cap
    pub max_depth: u32,
    /// Brightness model constants
    pub lighting: LightingParams,
    /// Radians the camera orbits per frame while orbiting
    pub orbit_step: f32,
    /// Trace row buckets on the rayon pool
    pub parallel: bool,
    /// Rows per ray-tracing bucket
    pub bucket_rows: u32,
    /// Colour the frame is cleared to
    pub clear_colour: Colour,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            lighting: LightingParams::default(),
            orbit_step: 0.01,
            parallel: true,
            bucket_rows: DEFAULT_BUCKET_ROWS,
            clear_colour: Colour::ZERO,
        }
    }
}

/// Everything that can change between frames.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderContext {
    pub camera: Camera,
    pub viewport: Viewport,
    pub render_mode: RenderMode,
    pub lighting_mode: LightingMode,
    /// Orbit the camera around the scene centre each frame
    pub orbiting: bool,
}

impl RenderContext {
    pub fn new(camera: Camera, viewport: Viewport) -> Self {
        Self {
            camera,
            viewport,
            ..Default::default()
        }
    }

    pub fn with_render_mode(mut self, render_mode: RenderMode) -> Self {
        self.render_mode = render_mode;
        self
    }

    pub fn with_lighting_mode(mut self, lighting_mode: LightingMode) -> Self {
        self.lighting_mode = lighting_mode;
        self
    }

    pub fn with_orbiting(mut self, orbiting: bool) -> Self {
        self.orbiting = orbiting;
        self
    }

    /// Step the orbit, if enabled.
    pub fn advance(&mut self, centre: Vec3, step: f32) {
        if self.orbiting {
            self.camera.orbit(step, centre);
        }
    }
}

/// Draws scenes into a [`FrameBuffer`].
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Draw one frame of `scene` as seen by `ctx`.
    ///
    /// Fails only if the buffer does not match the viewport.
    pub fn render_frame(
        &self,
        scene: &Scene,
        ctx: &RenderContext,
        fb: &mut FrameBuffer,
    ) -> RenderResult<()> {
        fb.check_viewport(&ctx.viewport)?;
        let start = Instant::now();

        fb.clear(self.config.clear_colour);
        log::debug!(
            "Drawing {} triangles as {:?} ({:?} lighting)",
            scene.triangle_count(),
            ctx.render_mode,
            ctx.lighting_mode
        );

        match ctx.render_mode {
            RenderMode::PointCloud => draw_point_cloud(scene, &ctx.camera, &ctx.viewport, fb),
            RenderMode::Wireframe => draw_wireframe(scene, &ctx.camera, &ctx.viewport, fb),
            RenderMode::Rasterised => draw_rasterised(scene, &ctx.camera, &ctx.viewport, fb),
            RenderMode::RayTraced => draw_ray_traced(scene, ctx, &self.config, fb),
        }

        log::info!(
            "{:?} frame ({}x{}) finished in {:.2?}",
            ctx.render_mode,
            fb.width(),
            fb.height(),
            start.elapsed()
        );
        Ok(())
    }

    /// Advance the orbit then draw a frame.
    pub fn next_frame(
        &self,
        scene: &Scene,
        ctx: &mut RenderContext,
        fb: &mut FrameBuffer,
    ) -> RenderResult<()> {
        ctx.advance(scene.centre(), self.config.orbit_step);
        self.render_frame(scene, ctx, fb)
    }
}

/// Project all three corners, or `None` if any fails.
fn project_triangle(
    triangle: &Triangle,
    camera: &Camera,
    viewport: &Viewport,
) -> Option<[CanvasPoint; 3]> {
    let [a, b, c] = triangle.positions();
    Some([
        camera.project(a, viewport)?,
        camera.project(b, viewport)?,
        camera.project(c, viewport)?,
    ])
}

/// Set the pixel under every projectable vertex, without depth testing.
pub fn draw_point_cloud(scene: &Scene, camera: &Camera, viewport: &Viewport, fb: &mut FrameBuffer) {
    let white = pack_colour(WHITE);
    for point in scene
        .triangles()
        .iter()
        .flat_map(|t| t.positions())
        .filter_map(|p| camera.project(p, viewport))
    {
        let (x, y) = point.pixel();
        fb.set_pixel(x, y, white);
    }
}

/// Draw every triangle's edges, without depth testing.
pub fn draw_wireframe(scene: &Scene, camera: &Camera, viewport: &Viewport, fb: &mut FrameBuffer) {
    let white = pack_colour(WHITE);
    for (index, triangle) in scene.triangles().iter().enumerate() {
        match project_triangle(triangle, camera, viewport) {
            Some(points) => draw_stroked_triangle(fb, points, white),
            None => log::trace!("Skipping triangle {index}: behind the camera"),
        }
    }
}

/// Fill every triangle with its material, depth tested.
pub fn draw_rasterised(scene: &Scene, camera: &Camera, viewport: &Viewport, fb: &mut FrameBuffer) {
    let preview = pack_colour(REFLECTIVE_PREVIEW);

    for (index, triangle) in scene.triangles().iter().enumerate() {
        let Some(points) = project_triangle(triangle, camera, viewport) else {
            log::trace!("Skipping triangle {index}: behind the camera");
            continue;
        };

        match &triangle.material.kind {
            MaterialKind::Uniform(colour) => {
                draw_filled_triangle(fb, points, Fill::Flat(pack_colour(*colour)));
            }
            MaterialKind::Textured(texture) => {
                let uvs = triangle.texture_coords();
                let mut textured = points;
                for (point, uv) in textured.iter_mut().zip(uvs) {
                    point.texture = texture.texel_coords(uv);
                }
                draw_filled_triangle(fb, textured, Fill::Textured(texture));
            }
            MaterialKind::Mirror | MaterialKind::Refractive { .. } => {
                draw_filled_triangle(fb, points, Fill::Flat(preview));
            }
        }
    }
}

/// Trace a primary ray through every pixel.
///
/// Hit pixels also record their reciprocal camera-space depth.
pub fn draw_ray_traced(scene: &Scene, ctx: &RenderContext, config: &RenderConfig, fb: &mut FrameBuffer) {
    let camera = &ctx.camera;
    let viewport = &ctx.viewport;
    let shader = Shader::new(scene, camera, ctx.lighting_mode, &config.lighting);
    let background = pack_colour(config.clear_colour);

    let trace = |x: u32, y: u32| -> Option<(u32, f32)> {
        let ray = camera.primary_ray(x as f32, y as f32, viewport);
        let hit = closest_intersection(scene.triangles(), &ray, None);
        if !hit.is_hit() {
            return None;
        }

        let colour = shader.shade(&hit, config.max_depth);
        let depth = camera.depth_of(hit.point);
        let reciprocal = if depth > NEAR_EPSILON { 1.0 / depth } else { 0.0 };
        Some((pack_colour(colour), reciprocal))
    };

    render_buckets(fb, config.bucket_rows, background, config.parallel, trace);
}
