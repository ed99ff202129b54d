//=========================================================================
// Vita Backend
//=========================================================================
//
// Device implementation of the backend traits on top of the vendor SDK,
// the vrtld loader and vitaGL. The application links the SDK stub
// libraries; this module only declares the entry points it calls.
//
// Also owns the link-time statics the runtime reads before `main`:
// stack and heap sizes, and the loader's export table pointers.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::ffi::{c_char, c_int, c_uint, c_void, CStr, CString};

use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::{
    to_c_int, ClockDomain, CtrlSamplingMode, DeviceControl, DynamicLoader, GraphicsContext, GraphicsInit,
    SysModule, TouchPort, TouchSamplingState,
};
use crate::core::MemoryBudget;
use crate::exports::{ExportTable, LoaderControl, RawExport};
use crate::storage::StorageIo;

//=== SDK Bindings ========================================================

type SceUid = c_int;
type GLboolean = u8;

const GL_TRUE: GLboolean = 1;
const GL_FALSE: GLboolean = 0;

const SCE_CTRL_MODE_DIGITAL: c_int = 0;
const SCE_CTRL_MODE_ANALOG: c_int = 1;
const SCE_CTRL_MODE_ANALOG_WIDE: c_int = 2;

const SCE_TOUCH_PORT_FRONT: c_uint = 0;
const SCE_TOUCH_PORT_BACK: c_uint = 1;

const SCE_TOUCH_SAMPLING_STATE_STOP: c_int = 0;
const SCE_TOUCH_SAMPLING_STATE_START: c_int = 1;

const SCE_SYSMODULE_NET: u16 = 0x0001;

const SCE_GXM_MULTISAMPLE_NONE: c_int = 0;
const SCE_GXM_MULTISAMPLE_4X: c_int = 2;

extern "C" {
    fn sceIoDopen(dirname: *const c_char) -> SceUid;
    fn sceIoDclose(fd: SceUid) -> c_int;
    fn chdir(path: *const c_char) -> c_int;

    fn sceCtrlSetSamplingModeExt(mode: c_int) -> c_int;
    fn sceTouchSetSamplingState(port: c_uint, state: c_int) -> c_int;

    fn scePowerSetArmClockFrequency(freq: c_int) -> c_int;
    fn scePowerSetBusClockFrequency(freq: c_int) -> c_int;
    fn scePowerSetGpuClockFrequency(freq: c_int) -> c_int;
    fn scePowerSetGpuXbarClockFrequency(freq: c_int) -> c_int;

    fn sceSysmoduleLoadModule(id: u16) -> c_int;

    fn vrtld_init(flags: c_uint) -> c_int;
    fn vrtld_quit();
    fn vrtld_dlerror() -> *const c_char;
    fn vrtld_dlopen(path: *const c_char, flags: c_int) -> *mut c_void;
    fn vrtld_dlclose(handle: *mut c_void) -> c_int;
    fn vrtld_dlsym(handle: *mut c_void, symbol: *const c_char) -> *mut c_void;

    fn vglUseVram(usage: GLboolean);
    fn vglUseExtraMem(usage: GLboolean);
    fn vglInitExtended(
        legacy_pool_size: c_int,
        width: c_int,
        height: c_int,
        ram_threshold: c_int,
        msaa: c_int,
    ) -> GLboolean;
}

//=== Runtime Statics =====================================================
//
// Read by the C runtime before `main`, so they cannot come from runtime
// configuration.
//

#[no_mangle]
#[allow(non_upper_case_globals)]
pub static sceUserMainThreadStackSize: u32 = MemoryBudget::DEFAULT.main_thread_stack;

#[no_mangle]
#[allow(non_upper_case_globals)]
pub static _pthread_stack_default_user: u32 = MemoryBudget::DEFAULT.default_thread_stack;

#[no_mangle]
#[allow(non_upper_case_globals)]
pub static _newlib_heap_size_user: u32 = MemoryBudget::DEFAULT.heap;

// vrtld reads these during `vrtld_init`.
#[no_mangle]
#[allow(non_upper_case_globals)]
pub static mut __vrtld_exports: *const RawExport = std::ptr::null();

#[no_mangle]
#[allow(non_upper_case_globals)]
pub static mut __vrtld_num_exports: usize = 0;

//=== VitaBackend =========================================================

/// The physical device.
#[derive(Debug, Default)]
pub struct VitaBackend {
    _private: (),
}

impl VitaBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

//--- Storage -------------------------------------------------------------

impl StorageIo for VitaBackend {
    type DirHandle = SceUid;

    fn open_dir(&mut self, path: &str) -> Option<SceUid> {
        let path = CString::new(path).ok()?;
        let fd = unsafe { sceIoDopen(path.as_ptr()) };
        (fd >= 0).then_some(fd)
    }

    fn close_dir(&mut self, handle: SceUid) {
        unsafe {
            sceIoDclose(handle);
        }
    }
}

//--- Device Configuration ------------------------------------------------

impl DeviceControl for VitaBackend {
    fn change_dir(&mut self, path: &str) {
        let Ok(c_path) = CString::new(path) else {
            warn!(target: "platform::vita", "Cannot chdir to {:?}: interior NUL", path);
            return;
        };
        unsafe {
            chdir(c_path.as_ptr());
        }
    }

    fn set_ctrl_sampling(&mut self, mode: CtrlSamplingMode) {
        let mode = match mode {
            CtrlSamplingMode::Digital => SCE_CTRL_MODE_DIGITAL,
            CtrlSamplingMode::Analog => SCE_CTRL_MODE_ANALOG,
            CtrlSamplingMode::AnalogWide => SCE_CTRL_MODE_ANALOG_WIDE,
        };
        unsafe {
            sceCtrlSetSamplingModeExt(mode);
        }
    }

    fn set_touch_sampling(&mut self, port: TouchPort, state: TouchSamplingState) {
        let port = match port {
            TouchPort::Front => SCE_TOUCH_PORT_FRONT,
            TouchPort::Back => SCE_TOUCH_PORT_BACK,
        };
        let state = match state {
            TouchSamplingState::Stop => SCE_TOUCH_SAMPLING_STATE_STOP,
            TouchSamplingState::Start => SCE_TOUCH_SAMPLING_STATE_START,
        };
        unsafe {
            sceTouchSetSamplingState(port, state);
        }
    }

    fn set_clock(&mut self, domain: ClockDomain, mhz: u32) {
        let freq = to_c_int("clock frequency", mhz);
        unsafe {
            match domain {
                ClockDomain::Cpu => scePowerSetArmClockFrequency(freq),
                ClockDomain::Bus => scePowerSetBusClockFrequency(freq),
                ClockDomain::Gpu => scePowerSetGpuClockFrequency(freq),
                ClockDomain::GpuXbar => scePowerSetGpuXbarClockFrequency(freq),
            };
        }
    }

    fn load_sysmodule(&mut self, module: SysModule) {
        let id = match module {
            SysModule::Net => SCE_SYSMODULE_NET,
        };
        unsafe {
            sceSysmoduleLoadModule(id);
        }
    }
}

//--- Dynamic Loader ------------------------------------------------------

impl DynamicLoader for VitaBackend {
    fn control(&self) -> LoaderControl {
        LoaderControl {
            dlopen: vrtld_dlopen as *const c_void,
            dlclose: vrtld_dlclose as *const c_void,
            dlsym: vrtld_dlsym as *const c_void,
        }
    }

    fn init(&mut self, exports: &ExportTable) -> Result<(), String> {
        // The loader keeps the pointer for the life of the process.
        let raw: &'static [RawExport] = Box::leak(exports.to_raw().into_boxed_slice());
        trace!(target: "platform::vita", "Publishing {} exports to vrtld", raw.len());

        let rc = unsafe {
            __vrtld_exports = raw.as_ptr();
            __vrtld_num_exports = raw.len();
            vrtld_init(0)
        };

        if rc < 0 {
            let text = unsafe {
                let err = vrtld_dlerror();
                if err.is_null() {
                    format!("error code {}", rc)
                } else {
                    CStr::from_ptr(err).to_string_lossy().into_owned()
                }
            };
            return Err(text);
        }

        Ok(())
    }

    fn quit(&mut self) {
        unsafe {
            vrtld_quit();
        }
    }
}

//--- Graphics ------------------------------------------------------------

impl GraphicsContext for VitaBackend {
    fn use_vram(&mut self, enabled: bool) {
        unsafe {
            vglUseVram(if enabled { GL_TRUE } else { GL_FALSE });
        }
    }

    fn use_extra_mem(&mut self, enabled: bool) {
        unsafe {
            vglUseExtraMem(if enabled { GL_TRUE } else { GL_FALSE });
        }
    }

    fn init_context(&mut self, params: &GraphicsInit) {
        let msaa = if params.msaa {
            SCE_GXM_MULTISAMPLE_4X
        } else {
            SCE_GXM_MULTISAMPLE_NONE
        };
        unsafe {
            vglInitExtended(
                to_c_int("vertex pool", params.vertex_pool),
                to_c_int("display width", params.display.width),
                to_c_int("display height", params.display.height),
                to_c_int("memory threshold", params.memory_threshold),
                msaa,
            );
        }
    }
}
