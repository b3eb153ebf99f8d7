//! Test utilities & fixtures shared by the integration tests.

use fortunecookie::fortune::FortuneList;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A list of `n` distinct fortunes named `F0`, `F1`, ...
#[allow(dead_code)]
pub fn numbered_list(n: usize) -> FortuneList {
    FortuneList::from_entries((0..n).map(|i| format!("F{}", i)))
}

/// Seeded random source so failures reproduce.
#[allow(dead_code)]
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Temp dir holding a file with the given name and content.
#[allow(dead_code)]
pub fn temp_file(name: &str, content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join(name);
    std::fs::write(&path, content).expect("write fixture");
    (tmp, path)
}
