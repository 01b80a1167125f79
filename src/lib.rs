//! GameView Patcher: one-shot regex patch for the card-used guard block.
//!
//! A single-purpose migration tool: it locates one occurrence of the
//! `cardUsed[cardIndex]` guard in `GameView.java`, replaces its body with a
//! user-facing alert, and writes the file back. Nothing is persisted across
//! runs and nothing else is patched.
//!
//! # Safety
//!
//! - The file is scanned for every occurrence of the pattern before any
//!   replacement; unless exactly one exists the run aborts and the file is
//!   untouched.
//! - Atomic file writes (tempfile + fsync + rename)
//! - UTF-8 validation
//! - Matching is plain regex over text, never a parser - a deliberate
//!   scope limit, not an omission.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use gameview_patcher::card_used_guard;
//!
//! let patch = card_used_guard(Path::new("."))?;
//! match patch.apply() {
//!     Ok(applied) => println!("patched {}", applied.file.display()),
//!     Err(e) => eprintln!("patch failed: {e}"),
//! }
//! # Ok::<(), gameview_patcher::PatchError>(())
//! ```

pub mod fixes;
pub mod patch;

// Re-exports
pub use fixes::{card_used_guard, GUARD_PATTERN, GUARD_REPLACEMENT, TARGET_FILE};
pub use patch::{Applied, PatchError, RegexPatch};
