use std::path::PathBuf;
use std::str::FromStr;

use clap::Args;
use literacy_core::{Command, LiteracyConfig, SessionStateMachine};

#[derive(Args)]
pub struct ReplayArgs {
    /// Number of words in the list
    #[arg(long)]
    pub words: usize,
    /// Flash threshold in seconds (overrides the config file)
    #[arg(long)]
    pub flash_time: Option<u64>,
    /// Config file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Previously stored value to start from
    #[arg(long)]
    pub seed: Option<String>,
    /// Steps: start, tick, tick:N, stop, mark:I, incorrect:I, reset
    #[arg(required = true)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Start,
    Tick(u64),
    Stop,
    Mark(usize),
    Incorrect(usize),
    Reset,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };
        let number = |what: &str| -> Result<usize, String> {
            arg.ok_or_else(|| format!("'{name}' needs a {what}, e.g. {name}:3"))?
                .parse::<usize>()
                .map_err(|e| format!("bad {what} in '{s}': {e}"))
        };
        match name {
            "start" => Ok(Step::Start),
            "stop" => Ok(Step::Stop),
            "reset" => Ok(Step::Reset),
            "tick" if arg.is_none() => Ok(Step::Tick(1)),
            "tick" => Ok(Step::Tick(number("count")? as u64)),
            "mark" => Ok(Step::Mark(number("word index")?)),
            "incorrect" => Ok(Step::Incorrect(number("word index")?)),
            _ => Err(format!("unknown step '{s}'")),
        }
    }
}

pub fn run(args: ReplayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => LiteracyConfig::load(path)?,
        None => LiteracyConfig::default(),
    };
    if let Some(flash_time) = args.flash_time {
        config.flash_time = flash_time;
    }
    config.validate()?;

    let mut session = SessionStateMachine::seeded(args.words, &config, args.seed.as_deref())?;

    for step in args.steps {
        let events: Vec<_> = match step {
            Step::Tick(n) => (0..n).filter_map(|_| session.advance_clock()).collect(),
            Step::Start => session.handle(Command::Start).into_iter().collect(),
            Step::Stop => session.handle(Command::Stop).into_iter().collect(),
            Step::Mark(index) => session.handle(Command::MarkWord { index }).into_iter().collect(),
            Step::Incorrect(index) => session
                .handle(Command::ToggleIncorrect { index })
                .into_iter()
                .collect(),
            Step::Reset => session.handle(Command::Reset).into_iter().collect(),
        };
        if events.is_empty() {
            tracing::warn!(?step, phase = ?session.phase(), "step had no effect");
        }
        for event in events {
            println!("{}", serde_json::to_string(&event)?);
        }
    }

    println!("{}", serde_json::to_string(&session.snapshot())?);
    Ok(())
}
