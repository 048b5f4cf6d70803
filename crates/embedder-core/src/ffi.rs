//! Opaque native handles and C-repr structs shared with the embedder.
//!
//! Handles are issued and freed by the native side. They carry no structure;
//! equality and hashing use the pointer value only.

use std::ffi::c_void;
use std::fmt;

use gl::types::{GLenum, GLuint};

// =====================================================================
// Opaque handles
// =====================================================================

macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(*mut c_void);

        impl $name {
            /// Wrap a raw handle received from the native side.
            pub const fn from_raw(raw: *mut c_void) -> Self {
                Self(raw)
            }

            /// Build a handle from a bare address. Used by hosts that track
            /// handles as integers.
            pub const fn from_addr(addr: usize) -> Self {
                Self(addr as *mut c_void)
            }

            pub fn is_null(self) -> bool {
                self.0.is_null()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:p})", stringify!($name), self.0)
            }
        }

        // SAFETY: the handle is an identifier only. It is never dereferenced
        // on the Rust side; the native layer owns whatever it points at.
        unsafe impl Send for $name {}
        unsafe impl Sync for $name {}
    };
}

opaque_handle!(
    /// Native plugin registrar handle.
    RegistrarRef
);

opaque_handle!(
    /// Native handle identifying one pending platform message that expects a
    /// response.
    ResponseHandle
);

// =====================================================================
// Texture ids
// =====================================================================

/// Id reported when no texture has been registered.
pub const NO_TEXTURE: i64 = -1;

// =====================================================================
// GL constants used in texture descriptors
// =====================================================================

pub const GL_TEXTURE_2D: GLenum = gl::TEXTURE_2D;
pub const GL_RGBA8: GLenum = gl::RGBA8;

/// Bytes per pixel of the RGBA8 buffers produced by pixel buffer sources.
pub const RGBA_BYTES_PER_PIXEL: usize = 4;

// =====================================================================
// C-repr structs
// =====================================================================

/// Release callback the embedder invokes when it is done with a texture.
pub type TextureReleaseCallback = unsafe extern "C" fn(user_data: *mut c_void);

/// OpenGL texture handed to the compositor after a population cycle.
///
/// Ownership of the GL object stays with the engine that produced it, so
/// `destruction_callback` is always `None` for external textures.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct GlTextureDescriptor {
    pub target: GLenum,
    pub name: GLuint,
    pub format: GLenum,
    pub destruction_callback: Option<TextureReleaseCallback>,
    pub user_data: *mut c_void,
    pub width: usize,
    pub height: usize,
}

impl GlTextureDescriptor {
    /// Descriptor for a 2D RGBA8 texture owned by the caller.
    pub fn rgba8(name: GLuint, width: usize, height: usize) -> Self {
        Self {
            target: GL_TEXTURE_2D,
            name,
            format: GL_RGBA8,
            destruction_callback: None,
            user_data: std::ptr::null_mut(),
            width,
            height,
        }
    }
}
