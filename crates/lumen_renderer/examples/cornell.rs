//! Cornell box example.
//!
//! Builds a small box scene in code and writes one PNG per render mode,
//! plus one ray-traced PNG per lighting mode.
//!
//! Run with: cargo run -p lumen_renderer --example cornell [output_dir]

use anyhow::Result;
use lumen_core::{rgb8, Colour, Material, Scene, SceneBuilder, Texture};
use lumen_math::{Camera, Vec2, Vec3, Viewport};
use lumen_renderer::{FrameBuffer, LightingMode, RenderConfig, RenderContext, RenderMode, Renderer};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let output = std::env::args().nth(1).unwrap_or_else(|| "output".to_string());
    let scene = build_scene()?;

    let mut camera = Camera::new(Vec3::new(0.0, 0.0, 3.5), 2.0);
    camera.look_at(Vec3::ZERO);
    let ctx = RenderContext::new(camera, Viewport::new(320, 240, 80.0));
    let renderer = Renderer::new(RenderConfig::default());
    let mut fb = FrameBuffer::for_viewport(&ctx.viewport);

    for mode in RenderMode::ALL {
        let ctx = ctx.with_render_mode(mode);
        renderer.render_frame(&scene, &ctx, &mut fb)?;
        fb.save_png(format!("{output}/cornell_{mode:?}.png").to_lowercase())?;
    }

    for lighting in LightingMode::ALL {
        let ctx = ctx
            .with_render_mode(RenderMode::RayTraced)
            .with_lighting_mode(lighting);
        renderer.render_frame(&scene, &ctx, &mut fb)?;
        fb.save_png(format!("{output}/cornell_traced_{lighting:?}.png").to_lowercase())?;
    }

    Ok(())
}

/// A 2x2x2 box open towards +Z with a mirror panel and a textured floor.
fn build_scene() -> Result<Scene> {
    let mut builder = SceneBuilder::new();

    builder.add_material(Material::uniform("white", rgb8(230, 230, 230)));
    builder.add_material(Material::uniform("red", rgb8(200, 40, 40)));
    builder.add_material(Material::uniform("green", rgb8(40, 180, 60)));
    builder.add_material(Material::mirror("mirror"));
    builder.add_material(Material::refractive("glass", 1.5));
    builder.add_texture(checker(8, rgb8(40, 40, 40), rgb8(220, 200, 160))?);
    builder.add_textured_material("floor", "checker")?;

    // Box corners: left/right, bottom/top, back/front
    let lbb = Vec3::new(-1.0, -1.0, -1.0);
    let rbb = Vec3::new(1.0, -1.0, -1.0);
    let rtb = Vec3::new(1.0, 1.0, -1.0);
    let ltb = Vec3::new(-1.0, 1.0, -1.0);
    let lbf = Vec3::new(-1.0, -1.0, 1.0);
    let rbf = Vec3::new(1.0, -1.0, 1.0);
    let rtf = Vec3::new(1.0, 1.0, 1.0);
    let ltf = Vec3::new(-1.0, 1.0, 1.0);

    add_quad(&mut builder, [lbb, rbb, rtb, ltb], "white");
    add_quad(&mut builder, [ltb, rtb, rtf, ltf], "white");
    add_quad(&mut builder, [lbf, lbb, ltb, ltf], "red");
    add_quad(&mut builder, [rbb, rbf, rtf, rtb], "green");

    // Textured floor
    let floor = [lbf, rbf, rbb, lbb].map(|p| builder.add_vertex(p));
    let uv = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ]
    .map(|t| builder.add_texture_coord(t));
    builder.add_textured_face([floor[0], floor[1], floor[2]], [uv[0], uv[1], uv[2]], "floor");
    builder.add_textured_face([floor[0], floor[2], floor[3]], [uv[0], uv[2], uv[3]], "floor");

    // Mirror panel angled on the back wall, glass shard in front of it
    add_quad(
        &mut builder,
        [
            Vec3::new(-0.2, -0.9, -0.7),
            Vec3::new(0.7, -0.9, -0.95),
            Vec3::new(0.7, 0.3, -0.95),
            Vec3::new(-0.2, 0.3, -0.7),
        ],
        "mirror",
    );
    builder.add_triangle(
        [
            Vec3::new(-0.7, -0.9, 0.1),
            Vec3::new(-0.2, -0.9, 0.3),
            Vec3::new(-0.45, -0.3, 0.2),
        ],
        "glass",
    );

    builder.add_light(Vec3::new(0.0, 0.8, 0.2));
    builder.add_light(Vec3::new(-0.4, 0.8, -0.3));

    Ok(builder.build()?)
}

/// Two faces over four corners in counter-clockwise order.
fn add_quad(builder: &mut SceneBuilder, corners: [Vec3; 4], material: &str) {
    let [a, b, c, d] = corners.map(|p| builder.add_vertex(p));
    builder.add_face([a, b, c], material);
    builder.add_face([a, c, d], material);
}

/// Square checkerboard texture.
fn checker(size: u32, dark: Colour, light: Colour) -> Result<Texture> {
    let pixels = (0..size * size)
        .map(|i| {
            let (x, y) = (i % size, i / size);
            let colour = if (x + y) % 2 == 0 { dark } else { light };
            lumen_core::pack_colour(colour)
        })
        .collect();
    Ok(Texture::new(size, size, pixels, "checker")?)
}
