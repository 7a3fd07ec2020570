use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;

use crate::consumer::ConsumerCommand;

/// Replay a recorded BVE input session into a fresh receiver.
#[derive(Parser, Debug, Clone)]
#[command(name = "bve-replay")]
#[command(version, about, long_about = None)]
pub struct ReplayArgs {
    /// Path to the receiver script that consumes the replayed stream
    pub script: PathBuf,

    /// Path to the recording to replay
    pub recording: PathBuf,

    /// Interpreter used to run the receiver script. Empty runs it directly.
    #[arg(long, env = "BVE_REPLAY_INTERPRETER", default_value = "python")]
    pub interpreter: String,

    /// Flag passed to the receiver so it doesn't record the replayed session
    #[arg(
        long,
        env = "BVE_REPLAY_NO_RECORD_FLAG",
        default_value = "--no-rec",
        allow_hyphen_values = true
    )]
    pub no_record_flag: String,

    /// Extension the receiver script is expected to have
    #[arg(long, default_value = "py")]
    pub expected_extension: String,

    /// Don't ask for confirmation when the script extension looks wrong
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Exit as soon as the replay finishes instead of waiting for Enter
    #[arg(long)]
    pub no_wait: bool,
}

impl ReplayArgs {
    pub fn consumer_command(&self) -> ConsumerCommand {
        ConsumerCommand::script(&self.interpreter, &self.script, &self.no_record_flag)
    }

    /// Whether the script path ends in the expected extension.
    pub fn has_expected_extension(&self) -> bool {
        self.script
            .extension()
            .is_some_and(|ext| ext == self.expected_extension.as_str())
    }
}

/// The operator's answer to a yes/no prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    Accepted,
    Declined,
    /// Anything other than `y` or `n`.
    Invalid(String),
}

/// Asks `question` on `output` and reads a single-line answer from `input`.
///
/// End of input counts as declining.
pub fn confirm<R, W>(question: &str, input: &mut R, output: &mut W) -> io::Result<Confirmation>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{} [y/n] ", question)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(Confirmation::Declined);
    }

    Ok(match line.trim_end_matches(['\r', '\n']) {
        "y" => Confirmation::Accepted,
        "n" => Confirmation::Declined,
        other => Confirmation::Invalid(other.to_string()),
    })
}
