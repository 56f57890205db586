pub mod assistant;
pub mod automation;
pub mod documents;
pub mod evaluation;
pub mod export;
pub mod portfolio;
