//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! The lifecycle controller talks to the outside world exclusively through
//! these traits: the container runtime behind the manager ports, and the
//! user behind [`Reporter`].
//!
//! ```text
//!                 ┌──────────────────────────┐
//!                 │   Lifecycle controller   │
//!                 └────────────┬─────────────┘
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//!   ┌─────────────┐     ┌─────────────┐     ┌────────────┐
//!   │  Managers   │     │ Attributes  │     │  Reporter  │
//!   │  (runtime)  │     │  (runtime)  │     │ (console)  │
//!   └─────────────┘     └─────────────┘     └────────────┘
//! ```

pub mod outbound;

pub use outbound::reporter::{Event, LogReporter, NullReporter, Reporter};
pub use outbound::runtime::{
    AttributeResolver, ContainerManager, NetworkManager, SoftwareManager, VolumeManager,
};
