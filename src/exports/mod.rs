//=========================================================================
// Dynamic Loader Exports
//=========================================================================
//
// Symbols the host image publishes to dynamically loaded game libraries.
//
// The exported name list is a private ABI between this host and every
// library built for it: a library referencing a name missing from the
// table fails to link. Names may be added; removing one breaks every
// library compiled against it.
//
// Components:
// - `table`: the frozen registry and its C view
// - `runtime_helpers`: ARM EABI division/conversion helpers
// - `libc_symbols`: C library functions re-exported from the host
// - `gl_stubs`: no-op adapters for GL calls missing on the device
//
//=========================================================================

//=== Module Declarations =================================================

pub mod gl_stubs;
mod libc_symbols;
pub mod runtime_helpers;
mod table;

//=== External Dependencies ===============================================

use std::ffi::c_void;

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::ExportError;
use self::libc_symbols as libc;

//=== Public API ==========================================================

pub use table::{ExportAddress, ExportEntry, ExportTable, ExportTableBuilder, RawExport};

//=== Exported Names ======================================================

/// Every symbol the host exports, in table order.
pub const EXPORTED_SYMBOLS: [&str; 24] = [
    // ARM EABI helpers
    "__aeabi_d2ulz",
    "__aeabi_idiv",
    "__aeabi_idivmod",
    "__aeabi_uidivmod",
    "__aeabi_uidiv",
    "__aeabi_ul2d",
    // C library
    "ctime",
    "vasprintf",
    "vsprintf",
    "vprintf",
    "printf",
    "putchar",
    "puts",
    "tolower",
    "toupper",
    "isalnum",
    "isalpha",
    "strchrnul",
    "rand",
    "srand",
    // GL stubs
    "glDrawBuffer",
    // Loader control
    "dlopen",
    "dlclose",
    "dlsym",
];

//=== LoaderControl =======================================================

/// Entry points of the dynamic loader itself, re-exported under the
/// POSIX names so libraries can load further libraries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderControl {
    pub dlopen: *const c_void,
    pub dlclose: *const c_void,
    pub dlsym: *const c_void,
}

//=== Table Assembly ======================================================

/// Builds the host export table.
///
/// # Errors
///
/// Fails if any loader entry point is null.
pub fn host_exports(loader: LoaderControl) -> Result<ExportTable, ExportError> {
    let mut t = ExportTable::builder();

    t.export(c"__aeabi_d2ulz", runtime_helpers::aeabi_d2ulz as *const c_void)?
        .export(c"__aeabi_idiv", runtime_helpers::aeabi_idiv as *const c_void)?
        .export(c"__aeabi_idivmod", runtime_helpers::aeabi_idivmod as *const c_void)?
        .export(c"__aeabi_uidivmod", runtime_helpers::aeabi_uidivmod as *const c_void)?
        .export(c"__aeabi_uidiv", runtime_helpers::aeabi_uidiv as *const c_void)?
        .export(c"__aeabi_ul2d", runtime_helpers::aeabi_ul2d as *const c_void)?;

    t.export(c"ctime", libc::ctime as *const c_void)?
        .export(c"vasprintf", libc::vasprintf as *const c_void)?
        .export(c"vsprintf", libc::vsprintf as *const c_void)?
        .export(c"vprintf", libc::vprintf as *const c_void)?
        .export(c"printf", libc::printf as *const c_void)?
        .export(c"putchar", libc::putchar as *const c_void)?
        .export(c"puts", libc::puts as *const c_void)?
        .export(c"tolower", libc::tolower as *const c_void)?
        .export(c"toupper", libc::toupper as *const c_void)?
        .export(c"isalnum", libc::isalnum as *const c_void)?
        .export(c"isalpha", libc::isalpha as *const c_void)?
        .export(c"strchrnul", libc::strchrnul as *const c_void)?
        .export(c"rand", libc::rand as *const c_void)?
        .export(c"srand", libc::srand as *const c_void)?;

    t.export(c"glDrawBuffer", gl_stubs::gl_draw_buffer as *const c_void)?;

    t.export(c"dlopen", loader.dlopen)?
        .export(c"dlclose", loader.dlclose)?
        .export(c"dlsym", loader.dlsym)?;

    let table = t.build();
    debug!(target: "platform::exports", "Built host export table ({} symbols)", table.len());
    Ok(table)
}

//=========================================================================
// Unit Tests
//=========================================================================
