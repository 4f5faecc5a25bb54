//! One module per resource family, each exposing a `router()` building a
//! `Router<SharedState>` merged into the top-level router in `lib.rs`.

pub mod comments;
pub mod dependencies;
pub mod health;
pub mod issues;
pub mod labels;
pub mod plans;
pub mod queries;
pub mod team_context;
pub mod workspaces;
