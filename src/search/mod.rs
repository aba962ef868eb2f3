mod aggregator;
mod history;
mod orchestrator;

pub use aggregator::{ResultAggregator, SearchSession};
pub use history::{
    HistoryPersistence, HistoryStore, JsonFileHistory, MemoryHistory, MAX_HISTORY_ENTRIES,
};
pub use orchestrator::{SearchListener, SearchOrchestrator, SearchOutcome, SessionSnapshot};
