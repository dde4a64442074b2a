//! An in-process [`RenderingContext`] for tests.
//!
//! It understands just enough GLSL to reject unbalanced sources and sources
//! without `main`, match fragment inputs against vertex outputs, and collect
//! `uniform` declarations.
use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
};

use super::{ProgramId, RenderingContext, ShaderId, UniformLocation};
use crate::{error::ShaderError, gl_wrappers::ShaderStage};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
}

#[derive(Default)]
struct FakeShader {
    stage: Option<ShaderStage>,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Default)]
struct FakeProgram {
    attached: Vec<ShaderId>,
    linked: bool,
    log: String,
    /// Active uniforms in location order.
    uniforms: Vec<String>,
    values: HashMap<UniformLocation, UniformValue>,
}

#[derive(Default)]
pub struct FakeContext {
    next_id: Cell<u32>,
    shaders: RefCell<HashMap<ShaderId, FakeShader>>,
    programs: RefCell<HashMap<ProgramId, FakeProgram>>,
    current: Cell<ProgramId>,
    use_calls: Cell<usize>,
    /// Calls GL would answer with `GL_INVALID_OPERATION`.
    invalid_operations: Cell<usize>,
    /// Makes `create_program` return the null object.
    pub refuse_programs: Cell<bool>,
    /// Appended to every failing compile log.
    pub log_padding: RefCell<String>,
}

impl FakeContext {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            ..Self::default()
        }
    }

    fn next_id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    pub fn live_shaders(&self) -> usize {
        self.shaders.borrow().len()
    }

    pub fn live_programs(&self) -> usize {
        self.programs.borrow().len()
    }

    pub fn use_calls(&self) -> usize {
        self.use_calls.get()
    }

    pub fn invalid_operations(&self) -> usize {
        self.invalid_operations.get()
    }

    pub fn is_linked(&self, program: ProgramId) -> bool {
        self.programs
            .borrow()
            .get(&program)
            .is_some_and(|p| p.linked)
    }

    pub fn uniform_value(&self, program: ProgramId, name: &str) -> Option<UniformValue> {
        let programs = self.programs.borrow();
        let program = programs.get(&program)?;
        let location = program.uniforms.iter().position(|u| u == name)?;
        program.values.get(&(location as UniformLocation)).copied()
    }

    fn set_uniform(&self, location: UniformLocation, value: UniformValue) {
        let mut programs = self.programs.borrow_mut();
        // Like GL, uploads go to whatever program is current.
        let Some(program) = programs.get_mut(&self.current.get()) else {
            return;
        };
        if location >= 0 && (location as usize) < program.uniforms.len() {
            program.values.insert(location, value);
        }
    }
}

/// Declarations `<keyword> <type> <name>;` found in `source`.
fn declarations<'s>(source: &'s str, keyword: &str) -> Vec<(&'s str, &'s str)> {
    source
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            // Skip a leading `layout (...)` qualifier.
            let line = match line.strip_prefix("layout") {
                Some(rest) => rest.split_once(')').map_or(rest, |(_, tail)| tail).trim(),
                None => line,
            };
            let rest = line.strip_prefix(keyword)?.strip_prefix(' ')?;
            let mut parts = rest.trim_end_matches(';').split_whitespace();
            Some((parts.next()?, parts.next()?))
        })
        .collect()
}

fn check_syntax(source: &str) -> Result<(), String> {
    let mut depth = [0i32; 2];
    for (idx, line) in source.lines().enumerate() {
        for ch in line.chars() {
            match ch {
                '{' => depth[0] += 1,
                '}' => depth[0] -= 1,
                '(' => depth[1] += 1,
                ')' => depth[1] -= 1,
                _ => {}
            }
            if depth.iter().any(|d| *d < 0) {
                return Err(format!("0:{}(1): error: syntax error, unexpected '{ch}'", idx + 1));
            }
        }
    }
    if depth != [0, 0] {
        let lines = source.lines().count();
        return Err(format!("0:{lines}(1): error: syntax error, unexpected end of file"));
    }
    if !source.contains("void main") {
        return Err("0:1(1): error: no function with name 'main'".into());
    }
    Ok(())
}

impl RenderingContext for FakeContext {
    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, ShaderError> {
        let id = self.next_id();
        let shader = FakeShader {
            stage: Some(stage),
            ..FakeShader::default()
        };
        self.shaders.borrow_mut().insert(id, shader);
        Ok(id)
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        if let Some(s) = self.shaders.borrow_mut().get_mut(&shader) {
            s.source = source.to_owned();
        }
    }

    fn compile_shader(&self, shader: ShaderId) {
        let mut shaders = self.shaders.borrow_mut();
        let Some(s) = shaders.get_mut(&shader) else {
            return;
        };
        match check_syntax(&s.source) {
            Ok(()) => {
                s.compiled = true;
                s.log.clear();
            }
            Err(log) => {
                s.compiled = false;
                s.log = log + &self.log_padding.borrow();
            }
        }
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        self.shaders
            .borrow()
            .get(&shader)
            .is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        self.shaders
            .borrow()
            .get(&shader)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: ShaderId) {
        self.shaders.borrow_mut().remove(&shader);
    }

    fn create_program(&self) -> Result<ProgramId, ShaderError> {
        if self.refuse_programs.get() {
            return Err(ShaderError::ObjectCreation("program"));
        }
        let id = self.next_id();
        self.programs.borrow_mut().insert(id, FakeProgram::default());
        Ok(id)
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        if let Some(p) = self.programs.borrow_mut().get_mut(&program) {
            p.attached.push(shader);
        }
    }

    fn detach_shader(&self, program: ProgramId, shader: ShaderId) {
        if let Some(p) = self.programs.borrow_mut().get_mut(&program) {
            p.attached.retain(|s| *s != shader);
        }
    }

    fn link_program(&self, program: ProgramId) {
        let shaders = self.shaders.borrow();
        let mut programs = self.programs.borrow_mut();
        let Some(p) = programs.get_mut(&program) else {
            return;
        };

        let stage_source = |stage| {
            p.attached
                .iter()
                .filter_map(|id| shaders.get(id))
                .find(|s| s.stage == Some(stage))
        };
        let result = match (
            stage_source(ShaderStage::Vertex),
            stage_source(ShaderStage::Fragment),
        ) {
            (Some(vert), Some(frag)) if vert.compiled && frag.compiled => {
                let outputs = declarations(&vert.source, "out");
                declarations(&frag.source, "in")
                    .into_iter()
                    .find(|input| !outputs.contains(input))
                    .map_or_else(
                        || {
                            let mut uniforms = Vec::new();
                            for (_, name) in declarations(&vert.source, "uniform")
                                .into_iter()
                                .chain(declarations(&frag.source, "uniform"))
                            {
                                if !uniforms.iter().any(|u| u == name) {
                                    uniforms.push(name.to_owned());
                                }
                            }
                            Ok(uniforms)
                        },
                        |(ty, name)| {
                            Err(format!(
                                "error: fragment shader input `{name}` of type {ty} \
                                 has no matching vertex shader output"
                            ))
                        },
                    )
            }
            (Some(_), Some(_)) => Err("error: linking with uncompiled shader".to_owned()),
            _ => Err("error: program lacks a vertex or fragment shader".to_owned()),
        };

        match result {
            Ok(uniforms) => {
                p.linked = true;
                p.log.clear();
                p.uniforms = uniforms;
            }
            Err(log) => {
                p.linked = false;
                p.log = log;
                p.uniforms.clear();
            }
        }
        p.values.clear();
    }

    fn program_link_status(&self, program: ProgramId) -> bool {
        self.is_linked(program)
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        self.programs
            .borrow()
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: ProgramId) {
        self.programs.borrow_mut().remove(&program);
        if self.current.get() == program {
            self.current.set(0);
        }
    }

    fn use_program(&self, program: ProgramId) {
        self.use_calls.set(self.use_calls.get() + 1);
        self.current.set(program);
    }

    fn current_program(&self) -> ProgramId {
        self.current.get()
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let programs = self.programs.borrow();
        let Some(p) = programs.get(&program).filter(|p| p.linked) else {
            self.invalid_operations.set(self.invalid_operations.get() + 1);
            return None;
        };
        p.uniforms
            .iter()
            .position(|u| u == name)
            .map(|idx| idx as UniformLocation)
    }

    fn uniform_1i(&self, location: UniformLocation, value: i32) {
        self.set_uniform(location, UniformValue::Int(value));
    }

    fn uniform_1f(&self, location: UniformLocation, value: f32) {
        self.set_uniform(location, UniformValue::Float(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declarations_skip_layout_qualifier() {
        let src = "layout (location = 0) in vec3 aPos;\nout vec3 color;\nuniform float x;";
        assert_eq!(declarations(src, "in"), vec![("vec3", "aPos")]);
        assert_eq!(declarations(src, "out"), vec![("vec3", "color")]);
        assert_eq!(declarations(src, "uniform"), vec![("float", "x")]);
    }

    #[test]
    fn unbalanced_source_reports_line() {
        let err = check_syntax("void main() {\n  x = 1;\n").unwrap_err();
        assert!(err.starts_with("0:2(1)"), "{err}");
        assert!(check_syntax("void main() {}").is_ok());
        assert!(check_syntax("void foo() {}").is_err());
    }
}
