pub use warforge_core::{EngineError, OverrideRejection, SeededRng};
pub mod behavior {
    pub use warforge_core::behavior::*;
}
pub mod checksum {
    pub use warforge_core::checksum::*;
}
pub mod config {
    pub use warforge_core::config::*;
}
pub mod entity {
    pub use warforge_core::entity::*;
}
pub mod metrics {
    pub use warforge_core::metrics::*;
}
pub mod narrative {
    pub use warforge_core::narrative::*;
}
pub mod overrides {
    pub use warforge_core::overrides::*;
}
pub mod pipeline {
    pub use warforge_core::pipeline::*;
}
pub mod rng {
    pub use warforge_core::rng::*;
}
pub mod world {
    pub use warforge_core::world::*;
}

pub mod state {
    pub use warforge_data::*;
}

pub mod simulation;
