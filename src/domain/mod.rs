//! Domain layer - billing entities and the rules that keep them consistent.

pub mod billing;
pub mod foundation;
