//=========================================================================
// Vita Platform — Library Root
//
// Platform bootstrap for the handheld engine port.
//
// Responsibilities:
// - Bring input, clocks, networking and graphics into a known state
// - Find the engine data directory across the device's storage volumes
// - Publish the host symbols dynamically loaded game libraries link against
//
// Typical usage:
// ```no_run
// use vita_platform::PlatformBuilder;
//
// let platform = PlatformBuilder::new().boot(backend);
// // engine main loop
// platform.shutdown();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds configuration, errors and the console channel.
// `exports` is the host symbol table handed to the dynamic loader.
// `platform` defines the vendor SDK seam and the device backend.
// `storage` is the data directory lookup.
//
pub mod core;
pub mod exports;
pub mod platform;
pub mod prelude;
pub mod storage;

//--- Internal Modules ----------------------------------------------------
//
// `bootstrap` drives the init sequence and owns the initialized device.
//
mod bootstrap;

//--- Public Exports ------------------------------------------------------

pub use bootstrap::{get_base_path, shell_execute, terminate, FatalHandler, Platform, PlatformBuilder};
pub use storage::BASE_PATH_CAPACITY;
