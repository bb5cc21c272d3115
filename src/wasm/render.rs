use web_sys::{
    WebGl2RenderingContext as GL, WebGlProgram, WebGlShader, WebGlTexture, WebGlUniformLocation,
    WebGlVertexArrayObject,
};

use crate::controller::{Dirty, RenderParameters};
use crate::error::{DotFieldError, Result};
use crate::shaders::{FRAGMENT_SHADER, VERTEX_SHADER};

/// Texture unit the trail is bound to.
const TRAIL_UNIT: u32 = 0;

struct Uniforms {
    time: Option<WebGlUniformLocation>,
    resolution: Option<WebGlUniformLocation>,
    dot_color: Option<WebGlUniformLocation>,
    bg_color: Option<WebGlUniformLocation>,
    mouse_trail: Option<WebGlUniformLocation>,
    rotation: Option<WebGlUniformLocation>,
    grid_size: Option<WebGlUniformLocation>,
    dot_opacity: Option<WebGlUniformLocation>,
}

impl Uniforms {
    fn locate(gl: &GL, program: &WebGlProgram) -> Self {
        let at = |name: &str| gl.get_uniform_location(program, name);
        Self {
            time: at("time"),
            resolution: at("resolution"),
            dot_color: at("dotColor"),
            bg_color: at("bgColor"),
            mouse_trail: at("mouseTrail"),
            rotation: at("rotation"),
            grid_size: at("gridSize"),
            dot_opacity: at("dotOpacity"),
        }
    }
}

/// GL objects for the dot field: one program, an empty VAO for the
/// attribute-less fullscreen triangle, and the R8 trail texture.
pub struct DotRenderer {
    gl: GL,
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    trail: WebGlTexture,
    trail_size: i32,
    uniforms: Uniforms,
}

impl DotRenderer {
    pub fn new(gl: GL, trail_size: u32) -> Result<Self> {
        let vert = compile_shader(&gl, GL::VERTEX_SHADER, VERTEX_SHADER, "vertex")?;
        let frag = match compile_shader(&gl, GL::FRAGMENT_SHADER, FRAGMENT_SHADER, "fragment") {
            Ok(frag) => frag,
            Err(err) => {
                gl.delete_shader(Some(&vert));
                return Err(err);
            }
        };
        let program = link_program(&gl, &vert, &frag);
        gl.delete_shader(Some(&vert));
        gl.delete_shader(Some(&frag));
        let program = program?;

        let Some(vao) = gl.create_vertex_array() else {
            gl.delete_program(Some(&program));
            return Err(DotFieldError::MissingResource("vertex array"));
        };
        let Some(trail) = gl.create_texture() else {
            gl.delete_vertex_array(Some(&vao));
            gl.delete_program(Some(&program));
            return Err(DotFieldError::MissingResource("trail texture"));
        };

        let uniforms = Uniforms::locate(&gl, &program);
        let mut renderer = Self {
            gl,
            program,
            vao,
            trail,
            trail_size: 0,
            uniforms,
        };
        renderer.allocate_trail(trail_size)?;

        renderer.gl.use_program(Some(&renderer.program));
        renderer
            .gl
            .uniform1i(renderer.uniforms.mouse_trail.as_ref(), TRAIL_UNIT as i32);
        renderer.gl.disable(GL::DEPTH_TEST);
        renderer.gl.disable(GL::BLEND);
        Ok(renderer)
    }

    /// (Re)creates blank trail storage of `size × size` texels.
    pub fn allocate_trail(&mut self, size: u32) -> Result<()> {
        let gl = &self.gl;
        let size = size as i32;
        gl.active_texture(GL::TEXTURE0 + TRAIL_UNIT);
        gl.bind_texture(GL::TEXTURE_2D, Some(&self.trail));
        for (param, value) in [
            (GL::TEXTURE_MIN_FILTER, GL::LINEAR),
            (GL::TEXTURE_MAG_FILTER, GL::LINEAR),
            (GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE),
            (GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE),
        ] {
            gl.tex_parameteri(GL::TEXTURE_2D, param, value as i32);
        }
        gl.pixel_storei(GL::UNPACK_ALIGNMENT, 1);
        let blank = vec![0u8; (size * size) as usize];
        gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            GL::TEXTURE_2D,
            0,
            GL::R8 as i32,
            size,
            size,
            0,
            GL::RED,
            GL::UNSIGNED_BYTE,
            Some(&blank),
        )
        .map_err(|e| DotFieldError::Dom(format!("{e:?}")))?;
        self.trail_size = size;
        Ok(())
    }

    pub fn trail_size(&self) -> u32 {
        self.trail_size as u32
    }

    pub fn upload_trail(&self, texels: &[u8]) {
        let gl = &self.gl;
        gl.active_texture(GL::TEXTURE0 + TRAIL_UNIT);
        gl.bind_texture(GL::TEXTURE_2D, Some(&self.trail));
        if let Err(err) = gl.tex_sub_image_2d_with_i32_and_i32_and_u32_and_type_and_opt_u8_array(
            GL::TEXTURE_2D,
            0,
            0,
            0,
            self.trail_size,
            self.trail_size,
            GL::RED,
            GL::UNSIGNED_BYTE,
            Some(texels),
        ) {
            log::debug!("trail upload skipped: {err:?}");
        }
    }

    pub fn set_viewport(&self, width: u32, height: u32) {
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    /// Uploads `time` every call and the other uniforms only when dirty.
    pub fn apply(&self, params: &RenderParameters, dirty: Dirty) {
        let gl = &self.gl;
        let u = &self.uniforms;
        gl.use_program(Some(&self.program));
        gl.uniform1f(u.time.as_ref(), params.time);
        if dirty.resolution {
            gl.uniform2f(u.resolution.as_ref(), params.resolution.x, params.resolution.y);
        }
        if dirty.colors {
            let dot = params.dot_color.to_linear();
            let bg = params.bg_color.to_linear();
            gl.uniform3f(u.dot_color.as_ref(), dot.x, dot.y, dot.z);
            gl.uniform3f(u.bg_color.as_ref(), bg.x, bg.y, bg.z);
        }
        if dirty.opacity {
            gl.uniform1f(u.dot_opacity.as_ref(), params.dot_opacity);
        }
        if dirty.grid {
            gl.uniform1f(u.grid_size.as_ref(), params.grid_size);
        }
        if dirty.rotation {
            gl.uniform1f(u.rotation.as_ref(), params.rotation);
        }
    }

    pub fn draw(&self) {
        let gl = &self.gl;
        gl.use_program(Some(&self.program));
        gl.bind_vertex_array(Some(&self.vao));
        gl.active_texture(GL::TEXTURE0 + TRAIL_UNIT);
        gl.bind_texture(GL::TEXTURE_2D, Some(&self.trail));
        gl.draw_arrays(GL::TRIANGLES, 0, 3);
        gl.bind_vertex_array(None);
    }
}

impl Drop for DotRenderer {
    fn drop(&mut self) {
        self.gl.delete_texture(Some(&self.trail));
        self.gl.delete_vertex_array(Some(&self.vao));
        self.gl.delete_program(Some(&self.program));
    }
}

fn compile_shader(gl: &GL, kind: u32, source: &str, stage: &'static str) -> Result<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or(DotFieldError::MissingResource("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let ok = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(DotFieldError::ShaderCompile { stage, log })
    }
}

fn link_program(gl: &GL, vert: &WebGlShader, frag: &WebGlShader) -> Result<WebGlProgram> {
    let program = gl
        .create_program()
        .ok_or(DotFieldError::MissingResource("program"))?;
    gl.attach_shader(&program, vert);
    gl.attach_shader(&program, frag);
    gl.link_program(&program);

    let ok = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(DotFieldError::ProgramLink(log))
    }
}
