//! Lumen Renderer - CPU rasterizer and ray tracer.
//!
//! Draws a [`lumen_core::Scene`] into a [`FrameBuffer`] in one of four modes:
//!
//! - **Point cloud** and **wireframe**: projected vertices and edges in white
//! - **Rasterised**: scanline fill with a reciprocal-depth buffer
//! - **Ray traced**: primary rays per pixel, seven lighting models, and
//!   recursive mirror/refractive materials
//!
//! ```no_run
//! use lumen_core::{Colour, Material, SceneBuilder};
//! use lumen_math::{Camera, Vec3, Viewport};
//! use lumen_renderer::{FrameBuffer, RenderContext, RenderMode, Renderer};
//!
//! let mut builder = SceneBuilder::new();
//! builder.add_material(Material::uniform("red", Colour::new(1.0, 0.0, 0.0)));
//! builder.add_triangle([Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), Vec3::Y], "red");
//! builder.add_light(Vec3::new(0.0, 0.0, 2.0));
//! let scene = builder.build().unwrap();
//!
//! let ctx = RenderContext::new(Camera::default(), Viewport::default())
//!     .with_render_mode(RenderMode::RayTraced);
//! let mut fb = FrameBuffer::for_viewport(&ctx.viewport);
//! Renderer::default().render_frame(&scene, &ctx, &mut fb).unwrap();
//! fb.save_png("frame.png").unwrap();
//! ```

mod bucket;
mod framebuffer;
mod intersect;
mod lighting;
mod raster;
mod renderer;
mod shading;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_ROWS};
pub use framebuffer::{FrameBuffer, RenderError, RenderResult};
pub use intersect::{closest_intersection, intersect_triangle, Intersection, NO_HIT};
pub use lighting::{
    ambient, brightness, gouraud, hard_shadow, incidence, light_visible, phong_normal, proximity,
    specular, LightingMode, LightingParams,
};
pub use raster::{draw_filled_triangle, draw_line, draw_stroked_triangle, line_points, Fill};
pub use renderer::{
    draw_point_cloud, draw_rasterised, draw_ray_traced, draw_wireframe, RenderConfig,
    RenderContext, RenderMode, Renderer,
};
pub use shading::Shader;
