//! Per-page accumulation of map groups.
//!
//! # Modules
//!
//! | Module    | Purpose                                       |
//! |-----------|-----------------------------------------------|
//! | `store`   | [`PageState`]: merge, persist, finalize       |
//! | `types`   | Group map, embed kinds, client payload        |
//! | `payload` | Read-side fix-up of stored group data         |

mod payload;
mod store;
mod types;

pub use payload::select_groups;
pub use store::PageState;
pub use types::{EmbedKind, GroupMap};
