//=========================================================================
// C Library Re-exports
//=========================================================================
//
// Functions from the host's C library that game libraries call but that
// the static C library does not export to dynamically loaded code.
//
// Only the addresses are taken here; nothing in this crate calls them.
// `va_list` and `time_t *` parameters are declared opaque since the
// loaded code passes them straight through.
//
//=========================================================================

use std::ffi::{c_char, c_int, c_uint, c_void};

extern "C" {
    pub fn ctime(timer: *const c_void) -> *mut c_char;
    pub fn vasprintf(out: *mut *mut c_char, format: *const c_char, args: *mut c_void) -> c_int;
    pub fn vsprintf(out: *mut c_char, format: *const c_char, args: *mut c_void) -> c_int;
    pub fn vprintf(format: *const c_char, args: *mut c_void) -> c_int;
    pub fn printf(format: *const c_char, ...) -> c_int;
    pub fn putchar(c: c_int) -> c_int;
    pub fn puts(s: *const c_char) -> c_int;
    pub fn tolower(c: c_int) -> c_int;
    pub fn toupper(c: c_int) -> c_int;
    pub fn isalnum(c: c_int) -> c_int;
    pub fn isalpha(c: c_int) -> c_int;
    pub fn strchrnul(s: *const c_char, c: c_int) -> *mut c_char;
    pub fn rand() -> c_int;
    pub fn srand(seed: c_uint);
}
