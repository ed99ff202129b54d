//=========================================================================
// GL Adapter Stubs
//=========================================================================
//
// GL entry points the renderer library links against but the device's
// GL implementation does not provide. Each stub keeps the exact C
// signature of the call it replaces.
//
//=========================================================================

use std::ffi::c_uint;

/// GL enumerant as passed across the C boundary.
pub type GLenum = c_uint;

/// `glDrawBuffer(GLenum)`.
///
/// No-op: the device has a single draw target, so every selection is
/// already in effect.
pub extern "C" fn gl_draw_buffer(_which: GLenum) {}
