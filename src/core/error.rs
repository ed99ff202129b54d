//=========================================================================
// Platform Errors
//=========================================================================
//
// Error types surfaced by the bootstrap layer.
//
// Only loader initialization is fatal at runtime. Everything else the
// vendor SDK does during init is unchecked on this device.
//
//=========================================================================

//=== ExportError =========================================================

/// Export registry construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// A symbol with this name was already registered.
    DuplicateSymbol(String),

    /// The symbol resolved to a null address.
    NullAddress(String),

    /// The symbol name is not valid UTF-8.
    InvalidName(String),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateSymbol(name) => write!(f, "Duplicate export symbol: {}", name),
            Self::NullAddress(name) => write!(f, "Export symbol has null address: {}", name),
            Self::InvalidName(name) => write!(f, "Export symbol name is not UTF-8: {}", name),
        }
    }
}

impl std::error::Error for ExportError {}

//=== PlatformError =======================================================

/// Platform initialization errors.
///
/// These are fatal: without the dynamic loader no engine library can be
/// loaded, so the process cannot continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The export table could not be assembled.
    Exports(ExportError),

    /// The dynamic loader rejected initialization. Carries its error text.
    LoaderInit(String),
}

//--- Trait Implementations -----------------------------------------------

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exports(e) => write!(f, "Could not build export table: {}", e),
            Self::LoaderInit(e) => write!(f, "Could not init vrtld: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Exports(e) => Some(e),
            Self::LoaderInit(_) => None,
        }
    }
}

impl From<ExportError> for PlatformError {
    fn from(e: ExportError) -> Self {
        Self::Exports(e)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
