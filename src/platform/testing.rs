//=========================================================================
// Recording Backend
//=========================================================================
//
// Fake device used by unit tests. Every vendor call is appended to
// `calls` so tests can check ordering; existing directories and loader
// failure are configured up front. `capture_logs` records the log lines
// a closure emits on the current thread.
//
//=========================================================================

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::ffi::c_void;
use std::rc::Rc;
use std::sync::Once;

use log::{LevelFilter, Log, Metadata, Record};

use super::{
    ClockDomain, CtrlSamplingMode, DeviceControl, DynamicLoader, GraphicsContext, GraphicsInit,
    SysModule, TouchPort, TouchSamplingState,
};
use crate::exports::{ExportTable, LoaderControl};
use crate::storage::StorageIo;

//=== Call ================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    OpenDir(String),
    CloseDir(String),
    ChangeDir(String),
    CtrlSampling(CtrlSamplingMode),
    TouchSampling(TouchPort, TouchSamplingState),
    Clock(ClockDomain, u32),
    LoadModule(SysModule),
    LoaderInit { exports: usize },
    LoaderQuit,
    UseVram(bool),
    UseExtraMem(bool),
    GraphicsInit(GraphicsInit),
}

//=== RecordingBackend ====================================================

extern "C" fn fake_dlopen() {}
extern "C" fn fake_dlclose() {}
extern "C" fn fake_dlsym() {}

#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub dirs: HashSet<String>,
    pub loader_error: Option<String>,
    pub calls: Vec<Call>,
    /// Shared so it stays observable after the platform consumes us.
    pub quits: Rc<Cell<usize>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(mut self, path: &str) -> Self {
        self.dirs.insert(path.to_string());
        self
    }

    pub fn failing_loader(mut self, error: &str) -> Self {
        self.loader_error = Some(error.to_string());
        self
    }

    /// Position of the first call matching `pred`.
    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls.iter().position(pred)
    }
}

impl StorageIo for RecordingBackend {
    type DirHandle = String;

    fn open_dir(&mut self, path: &str) -> Option<String> {
        self.calls.push(Call::OpenDir(path.to_string()));
        self.dirs.contains(path).then(|| path.to_string())
    }

    fn close_dir(&mut self, handle: String) {
        self.calls.push(Call::CloseDir(handle));
    }
}

impl DeviceControl for RecordingBackend {
    fn change_dir(&mut self, path: &str) {
        self.calls.push(Call::ChangeDir(path.to_string()));
    }

    fn set_ctrl_sampling(&mut self, mode: CtrlSamplingMode) {
        self.calls.push(Call::CtrlSampling(mode));
    }

    fn set_touch_sampling(&mut self, port: TouchPort, state: TouchSamplingState) {
        self.calls.push(Call::TouchSampling(port, state));
    }

    fn set_clock(&mut self, domain: ClockDomain, mhz: u32) {
        self.calls.push(Call::Clock(domain, mhz));
    }

    fn load_sysmodule(&mut self, module: SysModule) {
        self.calls.push(Call::LoadModule(module));
    }
}

impl DynamicLoader for RecordingBackend {
    fn control(&self) -> LoaderControl {
        LoaderControl {
            dlopen: fake_dlopen as *const c_void,
            dlclose: fake_dlclose as *const c_void,
            dlsym: fake_dlsym as *const c_void,
        }
    }

    fn init(&mut self, exports: &ExportTable) -> Result<(), String> {
        self.calls.push(Call::LoaderInit { exports: exports.len() });
        match &self.loader_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn quit(&mut self) {
        self.calls.push(Call::LoaderQuit);
        self.quits.set(self.quits.get() + 1);
    }
}

impl GraphicsContext for RecordingBackend {
    fn use_vram(&mut self, enabled: bool) {
        self.calls.push(Call::UseVram(enabled));
    }

    fn use_extra_mem(&mut self, enabled: bool) {
        self.calls.push(Call::UseExtraMem(enabled));
    }

    fn init_context(&mut self, params: &GraphicsInit) {
        self.calls.push(Call::GraphicsInit(*params));
    }
}

//=== Log Capture =========================================================

thread_local! {
    static CAPTURED: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        CAPTURED.with(|c| {
            if let Some(lines) = c.borrow_mut().as_mut() {
                lines.push(format!("{} {}", record.level(), record.args()));
            }
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

/// Runs `f` and returns every log line it emitted on this thread,
/// formatted as `"<LEVEL> <message>"`.
pub(crate) fn capture_logs(f: impl FnOnce()) -> Vec<String> {
    INSTALL.call_once(|| {
        // Another logger may already be set; capture then stays empty.
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
    });

    CAPTURED.with(|c| *c.borrow_mut() = Some(Vec::new()));
    f();
    CAPTURED.with(|c| c.borrow_mut().take().unwrap_or_default())
}
