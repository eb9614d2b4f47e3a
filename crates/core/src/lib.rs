pub mod agent;
pub mod combat;
pub mod config;
pub mod content;
pub mod deck;
pub mod dice;
pub mod game;
pub mod harvest;
pub mod journal;
pub mod journal_file;
pub mod movement;
pub mod replay;
pub mod report;
pub mod runner;
pub mod setup;
pub mod state;
pub mod types;
pub mod victory;
pub mod view;

pub use agent::{AgentError, PlayerAgent, RandomAgent};
pub use config::GameConfig;
pub use content::ContentPack;
pub use game::Game;
pub use journal::{InputJournal, InputPayload, InputRecord};
pub use replay::*;
pub use report::ActionReport;
pub use runner::{GameRunner, RunOutcome, RunnerError, TurnOutcome};
pub use setup::{GameSetup, PlayerSetup};
pub use state::GameState;
pub use types::*;
pub use view::GameView;
