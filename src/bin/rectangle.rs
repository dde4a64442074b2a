//! A rectangle built from two indexed triangles, drawn in wireframe.
//! The fragment stage's `brightness` uniform pulses over time.
use std::time::Instant;

use learn_opengl::{
    demo::{self, Frame, WindowConfig},
    logging::{init_logging, LoggingConfig},
    Mesh, ShaderProgram,
};

#[rustfmt::skip]
const VERTICES: [f32; 12] = [
     0.5,  0.5, 0.0, // top right
     0.5, -0.5, 0.0, // bottom right
    -0.5, -0.5, 0.0, // bottom left
    -0.5,  0.5, 0.0, // top left
];

#[rustfmt::skip]
const INDICES: [u32; 6] = [
    0, 1, 3, // first triangle
    1, 2, 3, // second triangle
];

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let (window, mut events) = demo::open(&WindowConfig::default())?;
    let ctx = window.rendering_context()?;

    let program = ShaderProgram::from_files(
        &ctx,
        demo::shader_path("triangle.vert"),
        demo::shader_path("tinted.frag"),
    )?;
    let rectangle = Mesh::indexed(&ctx, &VERTICES, &INDICES);
    ctx.set_wireframe(true);

    let start = Instant::now();
    while events.poll(&ctx) == Frame::Continue {
        window.clear(&ctx);
        let seconds = start.elapsed().as_secs_f32();
        program.set_float("brightness", 0.75 + 0.25 * seconds.sin());
        program.use_program();
        rectangle.draw();
        window.swap();
    }
    Ok(())
}
