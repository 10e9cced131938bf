//! Placeholder renderer
//!
//! Clears to black and draws one yellow triangle covering the upper-right
//! quadrant. Uses only OpenGL 2.1 entry points.

use gl::types::{GLchar, GLenum, GLint, GLsizei, GLsizeiptr, GLuint};
use std::ffi::CString;
use zee_engine::prelude::*;

const VERTEX_SHADER: &str = "#version 120
attribute vec2 a_position;
void main() {
    gl_Position = vec4(a_position, 0.0, 1.0);
}
";

const FRAGMENT_SHADER: &str = "#version 120
void main() {
    gl_FragColor = vec4(1.0, 1.0, 0.0, 1.0);
}
";

const POSITION_ATTRIBUTE: GLuint = 0;

const VERTICES: [f32; 6] = [
    0.0, 0.0, //
    1.0, 0.0, //
    0.0, 1.0, //
];

/// Draws the triangle every frame
#[derive(Debug, Default)]
pub struct TriangleApp {
    program: GLuint,
    vertex_buffer: GLuint,
}

impl TriangleApp {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Application for TriangleApp {
    fn initialize(&mut self, loader: &mut dyn ProcAddressLoader) -> Result<(), AppError> {
        gl::load_with(|name| loader.get_proc_address(name));
        if !gl::Clear::is_loaded() || !gl::CreateShader::is_loaded() {
            return Err(AppError::Graphics("OpenGL 2.1 entry points are not available".to_string()));
        }

        unsafe {
            let vertex = compile_shader(gl::VERTEX_SHADER, VERTEX_SHADER)?;
            let fragment = match compile_shader(gl::FRAGMENT_SHADER, FRAGMENT_SHADER) {
                Ok(fragment) => fragment,
                Err(err) => {
                    gl::DeleteShader(vertex);
                    return Err(err);
                }
            };
            let linked = link_program(vertex, fragment);
            gl::DeleteShader(vertex);
            gl::DeleteShader(fragment);
            self.program = linked?;

            gl::GenBuffers(1, &mut self.vertex_buffer);
            gl::BindBuffer(gl::ARRAY_BUFFER, self.vertex_buffer);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                std::mem::size_of_val(&VERTICES) as GLsizeiptr,
                VERTICES.as_ptr().cast(),
                gl::STATIC_DRAW,
            );
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }

        check_gl_error("triangle setup")?;
        log::info!("Triangle renderer ready");
        Ok(())
    }

    fn render(&mut self, _frame: &FrameInfo) -> Result<(), AppError> {
        unsafe {
            gl::ClearColor(0.0, 0.0, 0.0, 1.0);
            gl::Clear(gl::COLOR_BUFFER_BIT);

            gl::UseProgram(self.program);
            gl::BindBuffer(gl::ARRAY_BUFFER, self.vertex_buffer);
            gl::EnableVertexAttribArray(POSITION_ATTRIBUTE);
            gl::VertexAttribPointer(POSITION_ATTRIBUTE, 2, gl::FLOAT, gl::FALSE, 0, std::ptr::null());
            gl::DrawArrays(gl::TRIANGLES, 0, 3);
            gl::DisableVertexAttribArray(POSITION_ATTRIBUTE);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
            gl::UseProgram(0);
        }

        check_gl_error("triangle draw")
    }

    fn cleanup(&mut self) {
        unsafe {
            if self.vertex_buffer != 0 {
                gl::DeleteBuffers(1, &self.vertex_buffer);
                self.vertex_buffer = 0;
            }
            if self.program != 0 {
                gl::DeleteProgram(self.program);
                self.program = 0;
            }
        }
        log::debug!("Triangle renderer released");
    }
}

fn check_gl_error(stage: &str) -> Result<(), AppError> {
    let code = unsafe { gl::GetError() };
    if code == gl::NO_ERROR {
        Ok(())
    } else {
        Err(AppError::Graphics(format!("{} raised GL error 0x{:04X}", stage, code)))
    }
}

unsafe fn compile_shader(kind: GLenum, source: &str) -> Result<GLuint, AppError> {
    let source = CString::new(source).map_err(|e| AppError::Graphics(e.to_string()))?;
    let shader = gl::CreateShader(kind);
    gl::ShaderSource(shader, 1, &source.as_ptr(), std::ptr::null());
    gl::CompileShader(shader);

    let mut status = GLint::from(gl::FALSE);
    gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);
    if status == GLint::from(gl::TRUE) {
        return Ok(shader);
    }

    let mut length = 0;
    gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut length);
    let message = read_info_log(length, |capacity, buffer| {
        gl::GetShaderInfoLog(shader, capacity, std::ptr::null_mut(), buffer);
    });
    gl::DeleteShader(shader);
    Err(AppError::Graphics(format!("shader compilation failed: {}", message)))
}

unsafe fn link_program(vertex: GLuint, fragment: GLuint) -> Result<GLuint, AppError> {
    let attribute = CString::new("a_position").map_err(|e| AppError::Graphics(e.to_string()))?;
    let program = gl::CreateProgram();
    gl::AttachShader(program, vertex);
    gl::AttachShader(program, fragment);
    gl::BindAttribLocation(program, POSITION_ATTRIBUTE, attribute.as_ptr());
    gl::LinkProgram(program);
    gl::DetachShader(program, vertex);
    gl::DetachShader(program, fragment);

    let mut status = GLint::from(gl::FALSE);
    gl::GetProgramiv(program, gl::LINK_STATUS, &mut status);
    if status == GLint::from(gl::TRUE) {
        return Ok(program);
    }

    let mut length = 0;
    gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut length);
    let message = read_info_log(length, |capacity, buffer| {
        gl::GetProgramInfoLog(program, capacity, std::ptr::null_mut(), buffer);
    });
    gl::DeleteProgram(program);
    Err(AppError::Graphics(format!("program link failed: {}", message)))
}

fn read_info_log(length: GLint, read: impl FnOnce(GLsizei, *mut GLchar)) -> String {
    let capacity = length.max(1);
    let mut buffer = vec![0u8; capacity as usize];
    read(capacity, buffer.as_mut_ptr().cast());
    let end = buffer.iter().position(|b| *b == 0).unwrap_or(buffer.len());
    String::from_utf8_lossy(&buffer[..end]).trim().to_string()
}
