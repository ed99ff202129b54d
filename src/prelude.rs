//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use vita_platform::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

pub use crate::core::{ClockConfig, Console, MemoryBudget, PlatformConfig, PlatformError, RendererKind};
pub use crate::exports::{ExportTable, EXPORTED_SYMBOLS};
pub use crate::platform::{Backend, DeviceControl, DynamicLoader, GraphicsContext};
pub use crate::storage::{BasePathResolver, StorageIo};
pub use crate::{Platform, PlatformBuilder};
