// File: shutter/src/services/mod.rs

pub mod commands;
pub mod freeze;

pub use commands::{CommandFreezer, CommandOutput, FreezeTool};
pub use freeze::{
    freeze_all, thaw_all, with_frozen, FreezeAction, FreezeGuard, FreezeOutcome, FreezePrimitive,
    FrozenRun,
};
