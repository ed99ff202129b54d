//=========================================================================
// Platform Backend
//
// Seam between the bootstrap sequence and the vendor SDK.
//
// Architecture:
// ```text
//   Platform::init()
//        │
//        ▼
//   ┌──────────────── Backend ────────────────┐
//   │ StorageIo        sceIoDopen/Dclose      │
//   │ DeviceControl    chdir, ctrl, touch,    │
//   │                  power, sysmodule       │
//   │ DynamicLoader    vrtld                  │
//   │ GraphicsContext  vitaGL                 │
//   └─────────────────────────────────────────┘
// ```
//
// The SDK calls are opaque: device configuration is fire-and-forget,
// only loader initialization reports failure.
//
// Backends:
// - `vita`: the device itself (compiled for `target_os = "vita"` only)
// - `testing`: recording fake used by the unit tests
//
//=========================================================================

//=== Submodules ==========================================================

#[cfg(target_os = "vita")]
pub mod vita;

#[cfg(test)]
pub(crate) mod testing;

//=== External Crates =====================================================

use std::ffi::c_int;

use log::warn;

//=== Internal Imports ====================================================

use crate::core::{DisplaySize, MemoryBudget};
use crate::exports::{ExportTable, LoaderControl};
use crate::storage::StorageIo;

//=== Device Enums ========================================================

/// Controller sampling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtrlSamplingMode {
    Digital,
    Analog,
    /// Analog sticks plus motion sensors, full stick range.
    AnalogWide,
}

/// Touch panel on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPort {
    Front,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchSamplingState {
    Stop,
    Start,
}

/// Independently clocked power domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockDomain {
    Cpu,
    Bus,
    Gpu,
    GpuXbar,
}

/// Loadable system modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SysModule {
    Net,
}

//=== GraphicsInit ========================================================

/// Parameters for graphics context creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphicsInit {
    /// Immediate-mode vertex pool, in bytes.
    pub vertex_pool: u32,
    pub display: DisplaySize,
    /// Memory the graphics library must leave untouched, in bytes.
    pub memory_threshold: u32,
    pub msaa: bool,
}

impl GraphicsInit {
    pub fn from_budget(budget: &MemoryBudget, display: DisplaySize) -> Self {
        Self {
            vertex_pool: budget.vertex_pool,
            display,
            memory_threshold: budget.graphics_threshold,
            msaa: false,
        }
    }
}

//=== SDK Argument Conversion =============================================

/// Converts a configuration value to the SDK's `int`, clamping at
/// `c_int::MAX` instead of wrapping negative.
#[cfg_attr(not(target_os = "vita"), allow(dead_code))]
pub(crate) fn to_c_int(what: &str, value: u32) -> c_int {
    c_int::try_from(value).unwrap_or_else(|_| {
        warn!(target: "platform", "{} = {} exceeds the SDK range, clamped to {}", what, value, c_int::MAX);
        c_int::MAX
    })
}

//=== Backend Traits ======================================================

/// One-shot device configuration calls.
pub trait DeviceControl {
    /// Changes the process working directory.
    fn change_dir(&mut self, path: &str);

    fn set_ctrl_sampling(&mut self, mode: CtrlSamplingMode);

    fn set_touch_sampling(&mut self, port: TouchPort, state: TouchSamplingState);

    /// Sets a clock domain frequency in MHz.
    fn set_clock(&mut self, domain: ClockDomain, mhz: u32);

    fn load_sysmodule(&mut self, module: SysModule);
}

/// The in-process dynamic loader.
pub trait DynamicLoader {
    /// The loader's own `dlopen`/`dlclose`/`dlsym` entry points.
    fn control(&self) -> LoaderControl;

    /// Initializes the loader, publishing `exports` as its symbol source.
    ///
    /// # Errors
    ///
    /// Returns the loader's error text.
    fn init(&mut self, exports: &ExportTable) -> Result<(), String>;

    /// Releases all loader state.
    fn quit(&mut self);
}

/// Graphics context bring-up.
pub trait GraphicsContext {
    fn use_vram(&mut self, enabled: bool);

    fn use_extra_mem(&mut self, enabled: bool);

    fn init_context(&mut self, params: &GraphicsInit);
}

/// Everything the bootstrap sequence needs from the device.
pub trait Backend: StorageIo + DeviceControl + DynamicLoader + GraphicsContext {}

impl<T> Backend for T where T: StorageIo + DeviceControl + DynamicLoader + GraphicsContext {}

//=========================================================================
// Unit Tests
//=========================================================================
