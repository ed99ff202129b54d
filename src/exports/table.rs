//=========================================================================
// Export Table
//=========================================================================
//
// Name → address registry handed to the dynamic loader.
//
// Architecture:
//   ExportTableBuilder ──export()*──> build() ──> ExportTable (frozen)
//                                                   ├─ resolve(name)
//                                                   └─ to_raw() → loader
//
// Names are unique and addresses non-null. Once built the table is never
// modified; it is `Send + Sync` and can be read from anywhere.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::ffi::{c_char, c_void, CStr};
use std::ptr::NonNull;

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::ExportError;

//=== ExportAddress =======================================================

/// Non-null address of an exported function or object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExportAddress(NonNull<c_void>);

// Addresses point at code or immutable data in the host image.
unsafe impl Send for ExportAddress {}
unsafe impl Sync for ExportAddress {}

impl ExportAddress {
    /// Wraps a raw address, rejecting null.
    pub fn new(ptr: *const c_void) -> Option<Self> {
        NonNull::new(ptr.cast_mut()).map(Self)
    }

    pub fn as_ptr(self) -> *const c_void {
        self.0.as_ptr()
    }
}

//=== ExportEntry =========================================================

/// One exported symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportEntry {
    name: &'static CStr,
    address: ExportAddress,
}

impl ExportEntry {
    /// Symbol name as the loader sees it.
    pub fn name(&self) -> &'static CStr {
        self.name
    }

    pub fn address(&self) -> ExportAddress {
        self.address
    }
}

//=== RawExport ===========================================================

/// C layout of an export entry, as consumed by the native loader.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawExport {
    pub name: *const c_char,
    pub addr: *const c_void,
}

//=== ExportTableBuilder ==================================================

/// Accumulates exports before the table is frozen.
#[derive(Debug, Default)]
pub struct ExportTableBuilder {
    entries: Vec<ExportEntry>,
    index: HashMap<&'static str, usize>,
}

impl ExportTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` at `addr`.
    ///
    /// # Errors
    ///
    /// Fails if the name is already registered, is not UTF-8, or if the
    /// address is null.
    pub fn export(&mut self, name: &'static CStr, addr: *const c_void) -> Result<&mut Self, ExportError> {
        let key = name
            .to_str()
            .map_err(|_| ExportError::InvalidName(name.to_string_lossy().into_owned()))?;

        let address = ExportAddress::new(addr).ok_or_else(|| ExportError::NullAddress(key.to_owned()))?;

        if self.index.contains_key(key) {
            return Err(ExportError::DuplicateSymbol(key.to_owned()));
        }

        trace!(target: "platform::exports", "Exporting {} at {:p}", key, addr);

        self.index.insert(key, self.entries.len());
        self.entries.push(ExportEntry { name, address });
        Ok(self)
    }

    /// Freezes the registry.
    pub fn build(self) -> ExportTable {
        ExportTable {
            entries: self.entries,
            index: self.index,
        }
    }
}

//=== ExportTable =========================================================

/// Frozen symbol table consulted by the dynamic loader.
#[derive(Debug)]
pub struct ExportTable {
    entries: Vec<ExportEntry>,
    index: HashMap<&'static str, usize>,
}

impl ExportTable {
    pub fn builder() -> ExportTableBuilder {
        ExportTableBuilder::new()
    }

    /// Number of exported symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[ExportEntry] {
        &self.entries
    }

    /// Looks up a symbol by name.
    pub fn resolve(&self, name: &str) -> Option<ExportAddress> {
        self.index.get(name).map(|&i| self.entries[i].address)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// C-layout copy of the table for the native loader.
    ///
    /// Name pointers stay valid for the whole process since names are
    /// `'static`.
    pub fn to_raw(&self) -> Vec<RawExport> {
        self.entries
            .iter()
            .map(|e| RawExport {
                name: e.name.as_ptr(),
                addr: e.address.as_ptr(),
            })
            .collect()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
