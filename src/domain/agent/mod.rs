//! Agent domain - conversation memory, responses and the query sandbox seam

mod memory;
mod response;
mod sandbox;

pub use memory::{DEFAULT_MEMORY_SIZE, Memory};
pub use response::{AgentResponse, ResponseValue};
pub use sandbox::{QueryTable, Sandbox};
