// Topic suggestion engine and the contracts of the stores it reads from

pub mod memory;
pub mod model;
pub mod sources;
pub mod suggested;

pub use model::{Cid, PageWindow, Tid, Topic, TopicFields, Uid, GUEST_UID};
pub use suggested::SuggestedTopics;
