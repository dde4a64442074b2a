//! Static geometry uploaded once and drawn every frame.
use std::{marker::PhantomData, mem::size_of, ptr::null};

use gl::types::{GLsizei, GLsizeiptr, GLuint};

use crate::context::GlContext;

/// Floats per vertex: one `vec3` position at attribute location 0.
const COMPONENTS: usize = 3;

/// A vertex array with its buffers. Positions are `vec3`s at location 0.
///
/// Deleted on drop. Borrows the context so it cannot outlive it.
pub struct Mesh<'ctx> {
    vao: GLuint,
    vbo: GLuint,
    /// Element buffer, when drawn with indices.
    ebo: Option<GLuint>,
    count: GLsizei,
    _ctx: PhantomData<&'ctx ()>,
}

impl<'ctx> Mesh<'ctx> {
    /// Upload `positions` and draw them in order with `glDrawArrays`.
    pub fn from_positions(ctx: &'ctx GlContext<'_>, positions: &[f32]) -> Self {
        Self::upload(ctx, positions, None)
    }

    /// Upload `positions` and draw them through `indices` with `glDrawElements`.
    pub fn indexed(ctx: &'ctx GlContext<'_>, positions: &[f32], indices: &[u32]) -> Self {
        Self::upload(ctx, positions, Some(indices))
    }

    fn upload(_ctx: &'ctx GlContext<'_>, positions: &[f32], indices: Option<&[u32]>) -> Self {
        let count = indices.map_or(positions.len() / COMPONENTS, <[u32]>::len);
        // SAFETY:
        // the context is current (we hold a `GlContext`), and every pointer
        // handed to gl::BufferData comes from a slice alive for the call.
        let (vao, vbo, ebo) = unsafe {
            let mut vao = 0;
            let mut vbo = 0;
            gl::GenVertexArrays(1, &mut vao);
            gl::GenBuffers(1, &mut vbo);

            // bind the Vertex Array Object first, then bind and set vertex buffers,
            // and then configure attributes
            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                byte_len(positions),
                positions.as_ptr().cast(),
                gl::STATIC_DRAW,
            );

            // the element buffer binding is recorded in the VAO
            let ebo = indices.map(|indices| {
                let mut ebo = 0;
                gl::GenBuffers(1, &mut ebo);
                gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
                gl::BufferData(
                    gl::ELEMENT_ARRAY_BUFFER,
                    byte_len(indices),
                    indices.as_ptr().cast(),
                    gl::STATIC_DRAW,
                );
                ebo
            });

            // position attrib
            gl::VertexAttribPointer(
                0,
                COMPONENTS as i32,
                gl::FLOAT,
                gl::FALSE,
                (COMPONENTS * size_of::<f32>()) as GLsizei,
                null(),
            );
            gl::EnableVertexAttribArray(0);

            // reset bound arrays; the VAO keeps the attribute's buffer
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
            gl::BindVertexArray(0);
            (vao, vbo, ebo)
        };
        log::debug!("mesh vao {vao}, vbo {vbo}, ebo {ebo:?}, {count} vertices");

        Self {
            vao,
            vbo,
            ebo,
            count: GLsizei::try_from(count).unwrap_or(GLsizei::MAX),
            _ctx: PhantomData,
        }
    }

    /// Draw as triangles with whatever program is active.
    pub fn draw(&self) {
        // SAFETY:
        // the VAO is ours and still alive; the element buffer, when bound,
        // holds exactly `count` indices.
        unsafe {
            gl::BindVertexArray(self.vao);
            match self.ebo {
                Some(_) => gl::DrawElements(gl::TRIANGLES, self.count, gl::UNSIGNED_INT, null()),
                None => gl::DrawArrays(gl::TRIANGLES, 0, self.count),
            }
            gl::BindVertexArray(0);
        }
    }
}

impl Drop for Mesh<'_> {
    fn drop(&mut self) {
        // SAFETY:
        // each name is deleted exactly once, here.
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
            if let Some(ebo) = &self.ebo {
                gl::DeleteBuffers(1, ebo);
            }
        }
    }
}

fn byte_len<T>(data: &[T]) -> GLsizeiptr {
    GLsizeiptr::try_from(std::mem::size_of_val(data)).unwrap_or(GLsizeiptr::MAX)
}
