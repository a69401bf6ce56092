//! Council deliberation domain
//!
//! Pure logic for the three-stage council: mode profiles, anonymous labels,
//! the tolerant ranking parser and rank aggregation. Nothing in here performs
//! I/O; the application layer drives the stages and feeds results back in.
//!
//! ```text
//! query ─▶ Stage 1 (answers) ─▶ Stage 2 (rankings) ─▶ aggregate
//!                 │                      │
//!                 └──────────┬───────────┘
//!                            ▼
//!                   Stage 3 (chairman)
//! ```

pub mod aggregate;
pub mod label;
pub mod mode;
pub mod parsing;
pub mod stage;
pub mod value_objects;

pub use aggregate::calculate_aggregate_rankings;
pub use label::{Label, LabelToModel};
pub use mode::{CouncilMode, ModeProfile};
pub use parsing::{FINAL_RANKING_MARKER, parse_ranking_from_text};
pub use stage::Stage;
pub use value_objects::{
    AggregateEntry, CouncilMetadata, CouncilRun, StageOneResult, StageThreeResult, StageTwoResult,
};
