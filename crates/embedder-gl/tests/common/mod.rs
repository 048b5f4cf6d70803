//! Fake GL entry points that record into a thread-local.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::ffi::c_void;
use std::sync::Arc;

use embedder_core::{PixelBuffer, PixelBufferSource};
use embedder_gl::GlProcs;
use gl::types::{GLenum, GLint, GLsizei, GLuint};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub texture: GLuint,
    pub width: GLsizei,
    pub height: GLsizei,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct FakeGl {
    next_name: GLuint,
    pub live: BTreeSet<GLuint>,
    pub bound: GLuint,
    pub generated: Vec<GLuint>,
    pub deleted: Vec<GLuint>,
    pub parameters: Vec<(GLuint, GLenum, GLint)>,
    pub uploads: Vec<Upload>,
}

thread_local! {
    static GL: RefCell<FakeGl> = RefCell::new(FakeGl::default());
}

pub fn with_gl<R>(f: impl FnOnce(&FakeGl) -> R) -> R {
    GL.with(|gl| f(&gl.borrow()))
}

pub fn reset_gl() {
    GL.with(|gl| *gl.borrow_mut() = FakeGl::default());
}

unsafe extern "system" fn gen_textures(n: GLsizei, textures: *mut GLuint) {
    GL.with(|gl| {
        let mut gl = gl.borrow_mut();
        for i in 0..n as usize {
            gl.next_name += 1;
            let name = gl.next_name;
            gl.live.insert(name);
            gl.generated.push(name);
            *textures.add(i) = name;
        }
    });
}

unsafe extern "system" fn delete_textures(n: GLsizei, textures: *const GLuint) {
    GL.with(|gl| {
        let mut gl = gl.borrow_mut();
        for i in 0..n as usize {
            let name = *textures.add(i);
            assert!(gl.live.remove(&name), "texture {name} deleted twice or never created");
            gl.deleted.push(name);
        }
    });
}

unsafe extern "system" fn bind_texture(target: GLenum, texture: GLuint) {
    assert_eq!(target, gl::TEXTURE_2D);
    GL.with(|gl| gl.borrow_mut().bound = texture);
}

unsafe extern "system" fn tex_parameteri(target: GLenum, pname: GLenum, param: GLint) {
    assert_eq!(target, gl::TEXTURE_2D);
    GL.with(|gl| {
        let mut gl = gl.borrow_mut();
        let bound = gl.bound;
        gl.parameters.push((bound, pname, param));
    });
}

#[allow(clippy::too_many_arguments)]
unsafe extern "system" fn tex_image_2d(
    target: GLenum,
    _level: GLint,
    internalformat: GLint,
    width: GLsizei,
    height: GLsizei,
    _border: GLint,
    format: GLenum,
    kind: GLenum,
    pixels: *const c_void,
) {
    assert_eq!(target, gl::TEXTURE_2D);
    assert_eq!(internalformat, gl::RGBA as GLint);
    assert_eq!(format, gl::RGBA);
    assert_eq!(kind, gl::UNSIGNED_BYTE);
    let len = (width * height * 4) as usize;
    let bytes = std::slice::from_raw_parts(pixels.cast::<u8>(), len).to_vec();
    GL.with(|gl| {
        let mut gl = gl.borrow_mut();
        let texture = gl.bound;
        gl.uploads.push(Upload {
            texture,
            width,
            height,
            bytes,
        });
    });
}

fn fake_loader(name: &str) -> *const c_void {
    match name {
        "glGenTextures" => gen_textures as *const c_void,
        "glDeleteTextures" => delete_textures as *const c_void,
        "glBindTexture" => bind_texture as *const c_void,
        "glTexParameteri" => tex_parameteri as *const c_void,
        "glTexImage2D" => tex_image_2d as *const c_void,
        _ => std::ptr::null(),
    }
}

/// Procs backed by the recording fakes. Resets the thread's fake state.
pub fn fake_procs() -> Arc<GlProcs> {
    reset_gl();
    Arc::new(GlProcs::load_with(fake_loader).expect("fake GL procs"))
}

/// Scripted producer: each call pops the next frame, `None` means "no data".
/// The last frame repeats once the script is exhausted.
pub struct ScriptedSource {
    frames: Vec<Option<(Vec<u8>, usize, usize)>>,
    cursor: usize,
    pub requests: Arc<std::sync::Mutex<Vec<(usize, usize)>>>,
}

impl ScriptedSource {
    pub fn new(frames: Vec<Option<(Vec<u8>, usize, usize)>>) -> Self {
        Self {
            frames,
            cursor: 0,
            requests: Arc::default(),
        }
    }
}

impl PixelBufferSource for ScriptedSource {
    fn copy_pixel_buffer(&mut self, width: usize, height: usize) -> Option<PixelBuffer<'_>> {
        self.requests.lock().unwrap().push((width, height));
        let index = self.cursor.min(self.frames.len().saturating_sub(1));
        self.cursor += 1;
        let (bytes, w, h) = self.frames.get(index)?.as_ref()?;
        Some(PixelBuffer::new(bytes, *w, *h))
    }
}

pub fn rgba(width: usize, height: usize, fill: u8) -> Option<(Vec<u8>, usize, usize)> {
    Some((vec![fill; width * height * 4], width, height))
}
