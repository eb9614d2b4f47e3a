//! On-disk form of an [`InputJournal`].
//!
//! One JSON object per line. The first line describes the game (seed, seats,
//! rules, content); every later line is one accepted input tagged with the
//! round it was played in. Each input line carries a SHA-256 seal over the
//! previous seal and its own contents, and the chain starts from the game
//! line, so editing the seed or any input invalidates every seal after it.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::GameConfig;
use crate::journal::{InputJournal, InputPayload, InputRecord};

#[derive(Serialize, Deserialize)]
#[serde(tag = "line", rename_all = "snake_case")]
enum JournalLine {
    Game {
        format_version: u16,
        build_id: String,
        content_hash: u64,
        seed: u64,
        #[serde(default)]
        players: Vec<String>,
        #[serde(default)]
        config: GameConfig,
    },
    Input {
        seq: u64,
        round: u32,
        payload: InputPayload,
        seal: String,
    },
}

fn anchor(game_line: &str) -> String {
    format!("{:064x}", Sha256::digest(game_line.as_bytes()))
}

fn seal_input(
    previous: &str,
    seq: u64,
    round: u32,
    payload: &InputPayload,
) -> serde_json::Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(previous.as_bytes());
    hasher.update(seq.to_le_bytes());
    hasher.update(round.to_le_bytes());
    hasher.update(serde_json::to_vec(payload)?);
    Ok(format!("{:064x}", hasher.finalize()))
}

/// Streams a game's inputs to disk as they are accepted. Every line is
/// flushed before `append` returns.
pub struct JournalWriter {
    out: BufWriter<File>,
    seal: String,
    next_seq: u64,
}

impl JournalWriter {
    /// Writes the game line for `journal`. Inputs already in `journal` are
    /// not copied.
    pub fn create(path: &Path, journal: &InputJournal) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let game = JournalLine::Game {
            format_version: journal.format_version,
            build_id: journal.build_id.clone(),
            content_hash: journal.content_hash,
            seed: journal.seed,
            players: journal.players.clone(),
            config: journal.config.clone(),
        };
        let game_line = serde_json::to_string(&game).map_err(io::Error::other)?;
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "{game_line}")?;
        out.flush()?;
        Ok(Self { out, seal: anchor(&game_line), next_seq: 0 })
    }

    pub fn append(&mut self, round: u32, payload: &InputPayload) -> io::Result<()> {
        let seq = self.next_seq;
        let seal = seal_input(&self.seal, seq, round, payload).map_err(io::Error::other)?;
        let line = JournalLine::Input { seq, round, payload: payload.clone(), seal: seal.clone() };
        writeln!(self.out, "{}", serde_json::to_string(&line).map_err(io::Error::other)?)?;
        self.out.flush()?;
        self.seal = seal;
        self.next_seq += 1;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum JournalLoadError {
    #[error("journal I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("journal has no game line")]
    MissingGame,
    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },
    #[error("line {line} is cut off")]
    Truncated { line: usize },
    #[error("line {line}: expected input {expected}, found {found}")]
    OutOfSequence { line: usize, expected: u64, found: u64 },
    #[error("line {line}: round {round} recorded after round {previous}")]
    RoundWentBackwards { line: usize, round: u32, previous: u32 },
    #[error("line {line}: `{player}` has no seat in this game")]
    UnknownPlayer { line: usize, player: String },
    #[error("line {line}: answers prompt {prompt} before it could have been asked")]
    PromptNotYetAsked { line: usize, prompt: u64 },
    #[error("line {line}: seal does not match")]
    SealBroken { line: usize },
}

/// Reads a journal written by [`JournalWriter`], checking every input
/// against the game line and the seal chain. The first bad line fails the
/// whole load.
pub fn load_journal_from_file(path: &Path) -> Result<InputJournal, JournalLoadError> {
    let text = fs::read_to_string(path)?;
    let mut lines = text.split_inclusive('\n').enumerate().map(|(index, raw)| (index + 1, raw));

    let Some((_, first)) = lines.next() else {
        return Err(JournalLoadError::MissingGame);
    };
    let game_line = complete(1, first)?;
    let JournalLine::Game { format_version, build_id, content_hash, seed, players, config } =
        parse(1, game_line)?
    else {
        return Err(malformed(1, "first line must describe the game"));
    };
    let mut journal = InputJournal {
        format_version,
        build_id,
        content_hash,
        seed,
        players,
        config,
        inputs: Vec::new(),
    };

    let mut previous_seal = anchor(game_line);
    let mut previous_round = 0;
    for (line, raw) in lines {
        let JournalLine::Input { seq, round, payload, seal } = parse(line, complete(line, raw)?)?
        else {
            return Err(malformed(line, "only the first line may describe the game"));
        };
        let expected = journal.inputs.len() as u64;
        if seq != expected {
            return Err(JournalLoadError::OutOfSequence { line, expected, found: seq });
        }
        if round < previous_round {
            return Err(JournalLoadError::RoundWentBackwards {
                line,
                round,
                previous: previous_round,
            });
        }
        check_payload(line, seq, &payload, &journal.players)?;
        let recomputed = seal_input(&previous_seal, seq, round, &payload)
            .map_err(|err| malformed(line, &err.to_string()))?;
        if seal != recomputed {
            return Err(JournalLoadError::SealBroken { line });
        }
        journal.inputs.push(InputRecord { seq, payload });
        previous_seal = seal;
        previous_round = round;
    }
    Ok(journal)
}

fn complete(line: usize, raw: &str) -> Result<&str, JournalLoadError> {
    raw.strip_suffix('\n').ok_or(JournalLoadError::Truncated { line })
}

fn parse(line: usize, text: &str) -> Result<JournalLine, JournalLoadError> {
    serde_json::from_str(text).map_err(|err| malformed(line, &err.to_string()))
}

fn malformed(line: usize, message: &str) -> JournalLoadError {
    JournalLoadError::Malformed { line, message: message.to_string() }
}

/// Inputs only name seated players, and a prompt id is the input count at
/// the moment the prompt opened, so it can never exceed the input's own seq.
fn check_payload(
    line: usize,
    seq: u64,
    payload: &InputPayload,
    players: &[String],
) -> Result<(), JournalLoadError> {
    let (prompt, player) = match payload {
        InputPayload::Action { prompt_id, .. } => (Some(*prompt_id), None),
        InputPayload::Decision { prompt_id, player, .. } => (Some(*prompt_id), Some(player)),
        InputPayload::Assessment { player, .. } => (None, Some(player)),
    };
    if let Some(player) = player
        && !players.contains(player)
    {
        return Err(JournalLoadError::UnknownPlayer { line, player: player.clone() });
    }
    if let Some(prompt) = prompt
        && prompt.0 > seq
    {
        return Err(JournalLoadError::PromptNotYetAsked { line, prompt: prompt.0 });
    }
    Ok(())
}
