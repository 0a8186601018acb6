//! Process-global node identifier generation.
//!
//! Ids are `{seed}-{n}` where the seed is a crc32 over process identity and
//! startup time and `n` is a monotonic counter. Ids are never reused and
//! never derived from node content, so clones, template instantiations and
//! parsed documents can coexist in one session without collision.

use crc32fast::Hasher;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::NodeId;

static COUNTER: AtomicU64 = AtomicU64::new(0);
static SEED: OnceLock<String> = OnceLock::new();

fn seed() -> &'static str {
    SEED.get_or_init(|| {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let mut hasher = Hasher::new();
        hasher.update(&std::process::id().to_le_bytes());
        hasher.update(&nanos.to_le_bytes());
        format!("{:08x}", hasher.finalize())
    })
}

/// Generate a fresh identifier, unique among all ids from this process.
pub fn new_id() -> NodeId {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    format!("{}-{}", seed(), n)
}
