//=========================================================================
// Core Types
//
// Configuration, error and diagnostic types shared by every part of the
// bootstrap layer.
//
// Components:
// - `config`: memory budget, clocks, display and mount configuration
// - `error`: export registry and platform init errors
// - `console`: engine-facing diagnostic channel
//
//=========================================================================

//=== Module Declarations =================================================

mod config;
mod console;
mod error;

//=== Public API ==========================================================

pub use config::{ClockConfig, DisplaySize, MemoryBudget, PlatformConfig, RendererKind};
pub use console::{Console, ConsoleMessage, Severity};
pub use error::{ExportError, PlatformError};
