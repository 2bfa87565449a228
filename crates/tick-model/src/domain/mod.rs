mod key;
pub use key::ResourceKey;

mod resource;
pub use resource::{SpecError, TickerResource, TickerSpec};

mod status;
pub use status::{Condition, ConditionKind, TickerStatus};
