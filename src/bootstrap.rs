//=========================================================================
// Platform Bootstrap
//
// Brings the device into a known state before the portable engine runs.
//
// Architecture:
// ```text
//     PlatformBuilder  ──init(backend)──>  Platform  ──shutdown()──>  [gone]
//         │                                   │
//         ├─ with_mount_candidates()          ├─ get_base_path()
//         ├─ with_clocks()                    ├─ shell_execute()
//         ├─ with_renderer()                  └─ exports()
//         └─ with_console()
// ```
//
// Init sequence (strict order):
//   1. resolve base path, chdir into it (library paths are relative)
//   2. controller + touch sampling
//   3. CPU / bus / GPU / crossbar clocks
//   4. networking module (before anything opens sockets)
//   5. dynamic loader with the host export table   ← only fatal step
//   6. graphics context
//
//=========================================================================

//=== External Dependencies ===============================================

use std::ffi::c_int;

use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::{ClockConfig, Console, PlatformConfig, PlatformError, RendererKind};
use crate::exports::{self, ExportTable};
use crate::platform::{
    Backend, ClockDomain, CtrlSamplingMode, GraphicsInit, SysModule, TouchPort,
    TouchSamplingState,
};
use crate::storage::{BasePathResolver, StorageIo};

//=== FatalHandler ========================================================

/// Called once a fatal init error has been logged. Must not return.
pub type FatalHandler = fn(&PlatformError) -> !;

/// Default [`FatalHandler`]: ends the process, like the engine's
/// `Sys_Error`.
pub fn terminate(_err: &PlatformError) -> ! {
    std::process::exit(1)
}

//=== PlatformBuilder =====================================================

/// Builder for configuring and bringing up a [`Platform`].
///
/// # Default Values
///
/// - **Mount candidates**: `uma0`, `imc0`, `ux0`
/// - **Data directory**: `data/xash3d`
/// - **Clocks**: 444 / 222 / 222 / 166 MHz
/// - **Renderer**: GL
/// - **Console**: detached (log facade only)
/// - **Fatal handler**: [`terminate`]
///
/// # Examples
///
/// ```no_run
/// # #[cfg(target_os = "vita")]
/// # {
/// use vita_platform::PlatformBuilder;
/// use vita_platform::platform::vita::VitaBackend;
///
/// let platform = PlatformBuilder::new().boot(VitaBackend::new());
/// // ... engine main loop ...
/// platform.shutdown();
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PlatformBuilder {
    config: PlatformConfig,
    console: Option<Console>,
    on_fatal: FatalHandler,
}

impl PlatformBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: PlatformConfig::default(),
            console: None,
            on_fatal: terminate,
        }
    }

    /// Sets the storage volumes searched for the data directory, highest
    /// priority first.
    ///
    /// # Panics
    ///
    /// Panics if `candidates` is empty.
    pub fn with_mount_candidates(mut self, candidates: &[&'static str]) -> Self {
        assert!(!candidates.is_empty(), "At least one mount candidate is required");
        self.config.mount_candidates = candidates.to_vec();
        self
    }

    /// Sets the data directory relative to each volume root.
    ///
    /// # Panics
    ///
    /// Panics if `subpath` is empty.
    pub fn with_data_subpath(mut self, subpath: &'static str) -> Self {
        assert!(!subpath.is_empty(), "Data subpath must not be empty");
        self.config.data_subpath = subpath;
        self
    }

    /// Sets target clock frequencies.
    ///
    /// # Panics
    ///
    /// Panics if any frequency is zero or does not fit the SDK's `int`.
    pub fn with_clocks(mut self, clocks: ClockConfig) -> Self {
        let all = [clocks.cpu, clocks.bus, clocks.gpu, clocks.gpu_xbar];
        assert!(all.iter().all(|&mhz| mhz > 0), "Clock frequencies must be positive");
        assert!(
            all.iter().all(|&mhz| c_int::try_from(mhz).is_ok()),
            "Clock frequencies must fit in a C int"
        );
        self.config.clocks = clocks;
        self
    }

    /// Selects the renderer the engine will load.
    ///
    /// The software renderer does not need the graphics context, so
    /// its creation is skipped.
    pub fn with_renderer(mut self, renderer: RendererKind) -> Self {
        self.config.renderer = renderer;
        self
    }

    /// Routes platform diagnostics to the engine console.
    pub fn with_console(mut self, console: Console) -> Self {
        self.console = Some(console);
        self
    }

    /// Replaces the handler [`PlatformBuilder::boot`] calls on failure.
    pub fn with_fatal_handler(mut self, handler: FatalHandler) -> Self {
        self.on_fatal = handler;
        self
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Runs the init sequence on `backend`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the export table cannot be built or
    /// the dynamic loader fails to initialize.
    pub fn init<B: Backend>(self, backend: B) -> Result<Platform<B>, PlatformError> {
        let console = self.console.unwrap_or_else(Console::detached);
        Platform::init(backend, self.config, console)
    }

    /// Runs the init sequence, terminating the process on failure.
    ///
    /// On error the loader's text is logged and the fatal handler runs;
    /// the default one exits the process regardless of the calling
    /// thread or any unwinding boundary.
    pub fn boot<B: Backend>(self, backend: B) -> Platform<B> {
        let on_fatal = self.on_fatal;
        match self.init(backend) {
            Ok(platform) => platform,
            Err(e) => {
                error!(target: "platform", "{}", e);
                on_fatal(&e)
            }
        }
    }
}

impl Default for PlatformBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Platform ============================================================

/// An initialized device.
///
/// Exists only after the init sequence succeeded; [`Platform::shutdown`]
/// consumes it, so the loader is released exactly once.
#[derive(Debug)]
pub struct Platform<B: Backend> {
    backend: B,
    config: PlatformConfig,
    console: Console,
    exports: ExportTable,
    base_path: Option<String>,
}

impl<B: Backend> Platform<B> {
    //--- Initialization ---------------------------------------------------

    fn init(mut backend: B, config: PlatformConfig, console: Console) -> Result<Self, PlatformError> {
        info!(target: "platform", "Initializing platform");

        //--- 1. Base path -------------------------------------------------
        let base_path = BasePathResolver::new(&config.mount_candidates, config.data_subpath).find(&mut backend);
        match &base_path {
            Some(path) => {
                backend.change_dir(path);
                info!(target: "platform", "Base directory: {}", path);
            }
            None => {
                warn!(
                    target: "platform",
                    "No {} directory on {:?}, staying in current directory",
                    config.data_subpath,
                    config.mount_candidates
                );
            }
        }

        //--- 2. Input -----------------------------------------------------
        backend.set_ctrl_sampling(CtrlSamplingMode::AnalogWide);
        backend.set_touch_sampling(TouchPort::Front, TouchSamplingState::Start);

        //--- 3. Clocks ----------------------------------------------------
        let clocks = config.clocks;
        backend.set_clock(ClockDomain::Cpu, clocks.cpu);
        backend.set_clock(ClockDomain::Bus, clocks.bus);
        backend.set_clock(ClockDomain::Gpu, clocks.gpu);
        backend.set_clock(ClockDomain::GpuXbar, clocks.gpu_xbar);
        debug!(target: "platform", "Clocks set: {:?}", clocks);

        //--- 4. Networking ------------------------------------------------
        backend.load_sysmodule(SysModule::Net);

        //--- 5. Dynamic loader --------------------------------------------
        let exports = exports::host_exports(backend.control())?;
        backend.init(&exports).map_err(PlatformError::LoaderInit)?;
        info!(target: "platform", "Dynamic loader ready ({} host exports)", exports.len());

        //--- 6. Graphics --------------------------------------------------
        match config.renderer {
            RendererKind::Gl => {
                let params = GraphicsInit::from_budget(&config.memory, config.display);
                backend.use_vram(true);
                backend.use_extra_mem(true);
                backend.init_context(&params);
                debug!(target: "platform", "Graphics context: {:?}", params);
            }
            RendererKind::Software => {
                debug!(target: "platform", "Software renderer, skipping graphics context");
            }
        }

        info!(target: "platform", "Platform initialization complete");

        Ok(Self {
            backend,
            config,
            console,
            exports,
            base_path,
        })
    }

    //--- Shutdown ---------------------------------------------------------

    /// Releases the dynamic loader.
    pub fn shutdown(mut self) {
        info!(target: "platform", "Shutting down platform");
        self.backend.quit();
    }

    //--- Queries ----------------------------------------------------------

    /// Re-runs the storage lookup into `buf` (see [`get_base_path`]).
    pub fn get_base_path(&mut self, buf: &mut String, capacity: usize) -> bool {
        BasePathResolver::new(&self.config.mount_candidates, self.config.data_subpath)
            .resolve(&mut self.backend, buf, capacity)
    }

    /// Base path found during init, if any.
    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }

    /// Symbols published to the dynamic loader.
    pub fn exports(&self) -> &ExportTable {
        &self.exports
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Launching external programs is not supported on this device.
    pub fn shell_execute(&self, path: &str, args: &str) {
        shell_execute(&self.console, path, args);
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }
}

//=== Free Functions ======================================================

/// Searches the default mount candidates for the data directory.
///
/// Writes each candidate into `buf` (at most `capacity - 1` bytes) and
/// returns `true` on the first one that exists. On `false`, `buf` holds
/// the last checked path rather than being cleared.
pub fn get_base_path<S: StorageIo>(io: &mut S, buf: &mut String, capacity: usize) -> bool {
    BasePathResolver::new(&PlatformConfig::MOUNT_CANDIDATES, PlatformConfig::DATA_SUBPATH).resolve(io, buf, capacity)
}

/// Reports that launching `path` is unsupported. Never fails.
pub fn shell_execute(console: &Console, path: &str, _args: &str) {
    console.warn(format!("Tried to shell execute ;{}; -- not supported", path));
}

//=========================================================================
// Unit Tests
//=========================================================================
