use clap::Args;
use literacy_core::codec::{self, SessionResult};
use literacy_core::{AssessmentReport, LiteracyConfig, SessionStateMachine};
use serde::Serialize;

#[derive(Args)]
pub struct DecodeArgs {
    /// Stored value, e.g. "5 7 10 null null null null null null null 7"
    pub value: String,
    /// Number of words in the list; drops indices beyond it
    #[arg(long)]
    pub words: Option<usize>,
    /// Reject malformed values instead of dropping bad tokens
    #[arg(long)]
    pub strict: bool,
}

#[derive(Serialize)]
struct DecodeOutput {
    result: SessionResult,
    report: AssessmentReport,
}

pub fn run(args: DecodeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut result = if args.strict {
        codec::decode_strict(&args.value)?
    } else {
        codec::decode(&args.value)
    };

    if let Some(words) = args.words {
        let session = SessionStateMachine::restore(words, &LiteracyConfig::default(), &result)?;
        if let Some(restored) = session.result() {
            result = restored;
        }
    }

    let output = DecodeOutput {
        report: AssessmentReport::from_result(&result),
        result,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
