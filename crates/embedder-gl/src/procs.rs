//! GL entry points used by external textures, resolved at runtime.
//!
//! The process-wide table is resolved exactly once. If any entry point is
//! missing the table stays unavailable for the life of the process.

use std::ffi::c_void;
use std::sync::Arc;

use anyhow::{bail, Result};
use gl::types::{GLenum, GLint, GLsizei, GLuint};
use once_cell::sync::OnceCell;

pub type GenTexturesProc = unsafe extern "system" fn(n: GLsizei, textures: *mut GLuint);
pub type DeleteTexturesProc = unsafe extern "system" fn(n: GLsizei, textures: *const GLuint);
pub type BindTextureProc = unsafe extern "system" fn(target: GLenum, texture: GLuint);
pub type TexParameteriProc = unsafe extern "system" fn(target: GLenum, pname: GLenum, param: GLint);
pub type TexImage2DProc = unsafe extern "system" fn(
    target: GLenum,
    level: GLint,
    internalformat: GLint,
    width: GLsizei,
    height: GLsizei,
    border: GLint,
    format: GLenum,
    kind: GLenum,
    pixels: *const c_void,
);

/// Resolved GL texture entry points.
#[derive(Debug, Clone, Copy)]
pub struct GlProcs {
    gen_textures: GenTexturesProc,
    delete_textures: DeleteTexturesProc,
    bind_texture: BindTextureProc,
    tex_parameteri: TexParameteriProc,
    tex_image_2d: TexImage2DProc,
}

static SHARED: OnceCell<Option<Arc<GlProcs>>> = OnceCell::new();

/// Look up `name` and reinterpret it as the function pointer type `F`.
///
/// # Safety
///
/// `F` must be a function pointer type matching the real signature of
/// `name`.
unsafe fn resolve<F: Copy>(
    loader: &mut impl FnMut(&str) -> *const c_void,
    name: &str,
) -> Result<F> {
    let ptr = loader(name);
    if ptr.is_null() {
        bail!("GL entry point {name} is unavailable");
    }
    debug_assert_eq!(std::mem::size_of::<F>(), std::mem::size_of::<*const c_void>());
    Ok(std::mem::transmute_copy::<*const c_void, F>(&ptr))
}

impl GlProcs {
    /// Resolve every entry point through `loader`.
    ///
    /// Fails if any of them resolves to null.
    pub fn load_with(mut loader: impl FnMut(&str) -> *const c_void) -> Result<Self> {
        // SAFETY: each name is paired with its GL signature above.
        unsafe {
            Ok(Self {
                gen_textures: resolve(&mut loader, "glGenTextures")?,
                delete_textures: resolve(&mut loader, "glDeleteTextures")?,
                bind_texture: resolve(&mut loader, "glBindTexture")?,
                tex_parameteri: resolve(&mut loader, "glTexParameteri")?,
                tex_image_2d: resolve(&mut loader, "glTexImage2D")?,
            })
        }
    }

    /// The process-wide table, or `None` if the entry points could not be
    /// resolved.
    pub fn shared() -> Option<Arc<GlProcs>> {
        SHARED
            .get_or_init(|| match load_platform() {
                Ok(procs) => {
                    tracing::debug!("resolved GL texture entry points");
                    Some(Arc::new(procs))
                }
                Err(err) => {
                    tracing::error!("external textures disabled: {err:#}");
                    None
                }
            })
            .clone()
    }

    /// # Safety
    ///
    /// A GL context must be current on the calling thread.
    pub unsafe fn gen_texture(&self) -> GLuint {
        let mut name: GLuint = 0;
        (self.gen_textures)(1, &mut name);
        name
    }

    /// # Safety
    ///
    /// A GL context must be current and `name` must come from
    /// [`gen_texture`](Self::gen_texture) on the same context.
    pub unsafe fn delete_texture(&self, name: GLuint) {
        (self.delete_textures)(1, &name);
    }

    /// # Safety
    ///
    /// A GL context must be current on the calling thread.
    pub unsafe fn bind_texture(&self, target: GLenum, name: GLuint) {
        (self.bind_texture)(target, name);
    }

    /// # Safety
    ///
    /// A GL context must be current on the calling thread.
    pub unsafe fn tex_parameteri(&self, target: GLenum, pname: GLenum, param: GLint) {
        (self.tex_parameteri)(target, pname, param);
    }

    /// Upload tightly packed RGBA8 pixels into the texture bound to
    /// `TEXTURE_2D`.
    ///
    /// # Safety
    ///
    /// A GL context must be current and `pixels` must hold at least
    /// `width * height * 4` bytes.
    pub unsafe fn tex_image_2d_rgba(&self, width: GLsizei, height: GLsizei, pixels: &[u8]) {
        (self.tex_image_2d)(
            gl::TEXTURE_2D,
            0,
            gl::RGBA as GLint,
            width,
            height,
            0,
            gl::RGBA,
            gl::UNSIGNED_BYTE,
            pixels.as_ptr().cast(),
        );
    }
}

#[cfg(feature = "gl-loader")]
fn load_platform() -> Result<GlProcs> {
    gl_loader::init_gl();
    GlProcs::load_with(|name| gl_loader::get_proc_address(name).cast())
}

#[cfg(not(feature = "gl-loader"))]
fn load_platform() -> Result<GlProcs> {
    bail!("built without the gl-loader feature")
}
