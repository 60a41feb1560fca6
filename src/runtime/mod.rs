//! Runtime module loading
//!
//! The page-side half of the pipeline, modelled for one page context:
//! idempotent module definition and debounced batch resolution.
//!
//! - `loader`: the registration/resolution primitive
//! - `registry`: the deduplicating shim in front of it
//! - `timer`: cancellable timers and the debounce helper

mod loader;
mod registry;
mod timer;

pub use loader::{
    AmdLoader, Factory, ModuleLoader, ModuleValue, ResolutionReport, UnresolvedModule,
};
pub use registry::{Definition, ModuleRegistry, ModuleState, PublicScope, RegistryOptions};
pub use timer::{DebounceTimer, TimerId, TimerQueue, VirtualClock};
