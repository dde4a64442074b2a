//! One orange triangle drawn with `glDrawArrays`.
use learn_opengl::{
    demo::{self, Frame, WindowConfig},
    logging::{init_logging, LoggingConfig},
    Mesh, ShaderProgram,
};

#[rustfmt::skip]
const VERTICES: [f32; 9] = [
    -0.5, -0.5, 0.0,
     0.5, -0.5, 0.0,
     0.0,  0.5, 0.0,
];

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let (window, mut events) = demo::open(&WindowConfig::default())?;
    let ctx = window.rendering_context()?;

    let program = ShaderProgram::from_files(
        &ctx,
        demo::shader_path("triangle.vert"),
        demo::shader_path("triangle.frag"),
    )?;
    let triangle = Mesh::from_positions(&ctx, &VERTICES);

    while events.poll(&ctx) == Frame::Continue {
        window.clear(&ctx);
        program.use_program();
        triangle.draw();
        window.swap();
    }
    Ok(())
}
