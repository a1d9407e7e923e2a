// Dashboard view layer: per-visit analysis state, routing between login and
// dashboard, and the notices shown to the user.

pub mod extract;
pub mod handlers;
pub mod notice;
pub mod state;
pub mod visit;
