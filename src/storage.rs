//=========================================================================
// Storage Path Resolver
//=========================================================================
//
// Locates the engine data directory across the device's storage volumes.
//
// Lookup order (earlier wins):
// ```text
//   uma0:data/xash3d   USB / SD2Vita storage
//   imc0:data/xash3d   internal memory card
//   ux0:data/xash3d    memory card
// ```
//
// Each candidate is formatted into the caller's buffer and opened as a
// directory. The first that opens is the base path; its handle is closed
// right away. When nothing matches the resolver reports failure and the
// buffer keeps the last checked path. There is no fallback candidate.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Write;

use log::{debug, trace};

//=== Constants ===========================================================

/// Size of the base path buffer, terminator included.
pub const BASE_PATH_CAPACITY: usize = 1024;

//=== StorageIo ===========================================================

/// Directory access on the device's storage volumes.
pub trait StorageIo {
    /// Open directory handle.
    type DirHandle;

    /// Opens `path` as a directory, `None` if it does not exist.
    fn open_dir(&mut self, path: &str) -> Option<Self::DirHandle>;

    fn close_dir(&mut self, handle: Self::DirHandle);
}

//=== BasePathResolver ====================================================

/// Priority-ordered lookup over mount candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasePathResolver<'a> {
    candidates: &'a [&'a str],
    subpath: &'a str,
}

impl<'a> BasePathResolver<'a> {
    pub fn new(candidates: &'a [&'a str], subpath: &'a str) -> Self {
        Self { candidates, subpath }
    }

    /// Checks every candidate in order, writing each formatted path into
    /// `buf` (truncated to `capacity - 1` bytes).
    ///
    /// Returns `true` as soon as one opens; later candidates are not
    /// touched. On `false`, `buf` holds the last checked path.
    pub fn resolve<S: StorageIo>(&self, io: &mut S, buf: &mut String, capacity: usize) -> bool {
        for mount in self.candidates {
            format_candidate(buf, capacity, mount, self.subpath);
            trace!(target: "platform::storage", "Probing {}", buf);

            if let Some(handle) = io.open_dir(buf.as_str()) {
                io.close_dir(handle);
                debug!(target: "platform::storage", "Found data directory at {}", buf);
                return true;
            }
        }

        debug!(
            target: "platform::storage",
            "No data directory on any of {} volumes",
            self.candidates.len()
        );
        false
    }

    /// Returns the first existing candidate path, resolved through a
    /// [`BASE_PATH_CAPACITY`] buffer.
    pub fn find<S: StorageIo>(&self, io: &mut S) -> Option<String> {
        let mut buf = String::with_capacity(BASE_PATH_CAPACITY);
        self.resolve(io, &mut buf, BASE_PATH_CAPACITY).then_some(buf)
    }
}

//--- Helpers -------------------------------------------------------------

/// Writes `"<mount>:<subpath>"` into `buf`, keeping at most
/// `capacity - 1` bytes and never splitting a character.
fn format_candidate(buf: &mut String, capacity: usize, mount: &str, subpath: &str) {
    buf.clear();
    // Writing into a String cannot fail.
    let _ = write!(buf, "{}:{}", mount, subpath);

    let limit = capacity.saturating_sub(1);
    if buf.len() > limit {
        let mut end = limit;
        while !buf.is_char_boundary(end) {
            end -= 1;
        }
        buf.truncate(end);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Storage with a fixed set of existing directories that records
    /// every lookup.
    #[derive(Default)]
    struct FakeStorage {
        existing: HashSet<String>,
        checked: Vec<String>,
        open_handles: usize,
    }

    impl FakeStorage {
        fn with_dirs(dirs: &[&str]) -> Self {
            Self {
                existing: dirs.iter().map(|d| d.to_string()).collect(),
                ..Self::default()
            }
        }
    }

    impl StorageIo for FakeStorage {
        type DirHandle = String;

        fn open_dir(&mut self, path: &str) -> Option<String> {
            self.checked.push(path.to_string());
            if self.existing.contains(path) {
                self.open_handles += 1;
                Some(path.to_string())
            } else {
                None
            }
        }

        fn close_dir(&mut self, _handle: String) {
            self.open_handles -= 1;
        }
    }

    const ABC: [&str; 3] = ["A", "B", "C"];

    #[test]
    fn resolves_only_existing_candidate() {
        let mut io = FakeStorage::with_dirs(&["B:data/xash3d"]);
        let mut buf = String::new();

        let found = BasePathResolver::new(&ABC, "data/xash3d").resolve(&mut io, &mut buf, 1024);

        assert!(found);
        assert_eq!(buf, "B:data/xash3d");
        assert_eq!(io.open_handles, 0);
    }

    #[test]
    fn stops_probing_at_first_match() {
        let mut io = FakeStorage::with_dirs(&["B:data/xash3d", "C:data/xash3d"]);
        let mut buf = String::new();

        BasePathResolver::new(&ABC, "data/xash3d").resolve(&mut io, &mut buf, 1024);

        assert_eq!(io.checked, vec!["A:data/xash3d", "B:data/xash3d"]);
        assert_eq!(buf, "B:data/xash3d");
    }

    #[test]
    fn earliest_existing_candidate_wins_for_every_order() {
        let orders: [[&str; 3]; 6] = [
            ["A", "B", "C"],
            ["A", "C", "B"],
            ["B", "A", "C"],
            ["B", "C", "A"],
            ["C", "A", "B"],
            ["C", "B", "A"],
        ];
        let dirs = ["A:data/xash3d", "C:data/xash3d"];

        for order in &orders {
            let mut io = FakeStorage::with_dirs(&dirs);
            let mut buf = String::new();

            assert!(BasePathResolver::new(order, "data/xash3d").resolve(&mut io, &mut buf, 1024));

            let k = order.iter().position(|m| *m != "B").unwrap();
            assert_eq!(buf, format!("{}:data/xash3d", order[k]));
            assert_eq!(io.checked.len(), k + 1);
        }
    }

    #[test]
    fn fails_with_zero_valid_mounts() {
        let mut io = FakeStorage::default();
        let mut buf = String::new();

        let found = BasePathResolver::new(&ABC, "data/xash3d").resolve(&mut io, &mut buf, 1024);

        assert!(!found);
        assert_eq!(io.checked.len(), 3);
    }

    #[test]
    fn failure_leaves_last_checked_path() {
        let mut io = FakeStorage::default();
        let mut buf = String::from("stale");

        BasePathResolver::new(&ABC, "data/xash3d").resolve(&mut io, &mut buf, 1024);

        assert_eq!(buf, "C:data/xash3d");
    }

    #[test]
    fn no_candidates_leaves_buffer_untouched() {
        let mut io = FakeStorage::default();
        let mut buf = String::from("untouched");

        assert!(!BasePathResolver::new(&[], "data/xash3d").resolve(&mut io, &mut buf, 1024));
        assert_eq!(buf, "untouched");
    }

    #[test]
    fn small_capacity_truncates_candidate_path() {
        let mut io = FakeStorage::with_dirs(&["ux0:da"]);
        let mut buf = String::new();

        let found = BasePathResolver::new(&["ux0"], "data/xash3d").resolve(&mut io, &mut buf, 7);

        assert!(found);
        assert_eq!(buf, "ux0:da");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let mut buf = String::new();
        format_candidate(&mut buf, 4, "é", "x");
        assert_eq!(buf, "é:");

        format_candidate(&mut buf, 2, "é", "x");
        assert_eq!(buf, "");

        format_candidate(&mut buf, 0, "ux0", "data");
        assert_eq!(buf, "");
    }

    #[test]
    fn find_returns_owned_path() {
        let mut io = FakeStorage::with_dirs(&["imc0:data/xash3d", "ux0:data/xash3d"]);
        let resolver = BasePathResolver::new(&["uma0", "imc0", "ux0"], "data/xash3d");

        assert_eq!(resolver.find(&mut io).as_deref(), Some("imc0:data/xash3d"));
        assert_eq!(resolver.find(&mut FakeStorage::default()), None);
    }

    #[test]
    fn find_truncates_to_base_path_capacity() {
        let long = "d".repeat(2 * BASE_PATH_CAPACITY);
        let expected = format!("ux0:{}", long)[..BASE_PATH_CAPACITY - 1].to_string();
        let mut io = FakeStorage::with_dirs(&[expected.as_str()]);

        let found = BasePathResolver::new(&["ux0"], &long).find(&mut io);

        assert_eq!(found.as_deref(), Some(expected.as_str()));
        assert_eq!(io.checked, vec![expected.clone()]);
    }
}
