//=========================================================================
// Platform Configuration
//=========================================================================
//
// Static sizing and tuning values for the handheld target.
//
// Memory partition (total user address space):
// ```text
//   ┌──────────────────────────────┐
//   │ main thread stack   512 KiB  │
//   │ libc heap           200 MiB  │
//   │ loaded modules       32 MiB  │  ← vrtld maps game libraries here
//   │ vertex pool           8 MiB  │
//   │ graphics            the rest │
//   └──────────────────────────────┘
// ```
//
// The stack and heap sizes are read by the runtime before `main` runs,
// so they are fixed at build time and never revisited.
//
//=========================================================================

//=== Constants ===========================================================

const KIB: u32 = 1024;
const MIB: u32 = 1024 * KIB;

//=== MemoryBudget ========================================================

/// Process-wide memory partition between the C runtime, the dynamic
/// loader's module space, and the graphics library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryBudget {
    /// Stack size of the main thread, in bytes.
    pub main_thread_stack: u32,

    /// Default stack size for threads created through pthreads, in bytes.
    pub default_thread_stack: u32,

    /// Size of the newlib heap, in bytes.
    pub heap: u32,

    /// Vertex pool reserved for immediate-mode rendering, in bytes.
    pub vertex_pool: u32,

    /// Memory left outside the graphics library's reach, in bytes.
    ///
    /// The dynamic loader maps game libraries into this region.
    pub graphics_threshold: u32,
}

impl MemoryBudget {
    /// Budget used by the shipped build.
    pub const DEFAULT: Self = Self {
        main_thread_stack: 512 * KIB,
        default_thread_stack: 512 * KIB,
        heap: 200 * MIB,
        vertex_pool: 8 * MIB,
        graphics_threshold: 32 * MIB,
    };
}

impl Default for MemoryBudget {
    fn default() -> Self {
        Self::DEFAULT
    }
}

//=== ClockConfig =========================================================

/// Target clock frequencies in MHz for sustained engine workloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockConfig {
    pub cpu: u32,
    pub bus: u32,
    pub gpu: u32,
    pub gpu_xbar: u32,
}

impl ClockConfig {
    /// Highest stable clocks available to user applications.
    pub const DEFAULT: Self = Self {
        cpu: 444,
        bus: 222,
        gpu: 222,
        gpu_xbar: 166,
    };
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

//=== Display =============================================================

/// Native framebuffer size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySize {
    pub width: u32,
    pub height: u32,
}

impl DisplaySize {
    pub const NATIVE: Self = Self {
        width: 960,
        height: 544,
    };
}

//=== Renderer ============================================================

/// Renderer the engine will load.
///
/// Only the GL renderer needs the graphics context; the software
/// renderer blits through its own path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RendererKind {
    #[default]
    Gl,
    Software,
}

//=== PlatformConfig ======================================================

/// Complete bootstrap configuration.
///
/// Built through [`crate::PlatformBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Storage volumes searched for the data directory, highest priority first.
    pub mount_candidates: Vec<&'static str>,

    /// Data directory relative to the volume root.
    pub data_subpath: &'static str,

    pub memory: MemoryBudget,
    pub clocks: ClockConfig,
    pub display: DisplaySize,
    pub renderer: RendererKind,
}

impl PlatformConfig {
    /// Volumes in lookup order: USB storage, internal memory card, memory card.
    pub const MOUNT_CANDIDATES: [&'static str; 3] = ["uma0", "imc0", "ux0"];

    pub const DATA_SUBPATH: &'static str = "data/xash3d";
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            mount_candidates: Self::MOUNT_CANDIDATES.to_vec(),
            data_subpath: Self::DATA_SUBPATH,
            memory: MemoryBudget::DEFAULT,
            clocks: ClockConfig::DEFAULT,
            display: DisplaySize::NATIVE,
            renderer: RendererKind::Gl,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
