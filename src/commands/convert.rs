use super::{InputArgs, OutputArgs};
use anyhow::Result;
use clap::Args;
use fastaflow::header::convert_headers;

/// Rewrite headers to `IsolateName|Type|Segment|Date|ID|Clade|Host|Location`,
/// dropping unknown fields.
#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn run(args: ConvertArgs) -> Result<()> {
    let records = args.input.load()?;
    let converted = convert_headers(&records);
    args.output.write_records(&converted)?;
    eprintln!(
        "Converted {} headers -> {}",
        converted.len(),
        args.output.output.display()
    );
    Ok(())
}
