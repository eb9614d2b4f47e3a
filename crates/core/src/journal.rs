use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::types::{Action, ChoicePromptId, DecisionResponse};

/// Everything needed to rebuild a game: who sat down, under which rules,
/// with which seed, and every input the game accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputJournal {
    pub format_version: u16,
    pub build_id: String,
    pub content_hash: u64,
    pub seed: u64,
    #[serde(default)]
    pub players: Vec<String>,
    #[serde(default)]
    pub config: GameConfig,
    pub inputs: Vec<InputRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    pub seq: u64,
    pub payload: InputPayload,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum InputPayload {
    Action { prompt_id: ChoicePromptId, action: Action },
    Decision { prompt_id: ChoicePromptId, player: String, response: DecisionResponse },
    Assessment { player: String, text: String },
}

impl InputJournal {
    pub fn new(seed: u64) -> Self {
        Self {
            format_version: 1,
            build_id: "dev".to_string(),
            content_hash: 0,
            seed,
            players: Vec::new(),
            config: GameConfig::default(),
            inputs: Vec::new(),
        }
    }

    pub fn with_players(mut self, players: Vec<String>) -> Self {
        self.players = players;
        self
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_content_hash(mut self, content_hash: u64) -> Self {
        self.content_hash = content_hash;
        self
    }

    pub fn append(&mut self, payload: InputPayload) {
        let seq = self.inputs.len() as u64;
        self.inputs.push(InputRecord { seq, payload });
    }
}
