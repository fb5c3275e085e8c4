//! `run`: apply a TOML-configured sequence of stages and write a report.

use super::{InputArgs, OutputArgs};
use anyhow::{Context, Result};
use clap::Args;
use fastaflow::config::PipelineConfig;
use fastaflow::report::Report;
use fastaflow::seqio::write_lines;
use fastaflow::Pipeline;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Pipeline definition (TOML, [[stage]] tables)
    #[arg(short = 'c', long = "config", value_name = "TOML")]
    pub config: PathBuf,

    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Write the text analysis report here
    #[arg(long = "report", value_name = "TXT")]
    pub report: Option<PathBuf>,

    /// Write the report as JSON here
    #[arg(long = "report-json", value_name = "JSON")]
    pub report_json: Option<PathBuf>,

    /// Stop at the first failing stage instead of skipping it
    #[arg(long = "strict")]
    pub strict: bool,
}

pub fn run(args: RunArgs) -> Result<()> {
    let config = PipelineConfig::load(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    let stages = config.stages()?;
    let records = args.input.load()?;

    let mut pipeline = Pipeline::new(records);
    let mut removed: Vec<String> = Vec::new();
    for stage in &stages {
        match pipeline.apply(stage) {
            Ok(outcome) => {
                if let Some(note) = &outcome.advisory {
                    log::warn!("{}: {}", stage.name(), note);
                }
                removed.extend(outcome.removed);
                removed.extend(outcome.excluded);
            }
            Err(err) if !args.strict => log::warn!("{}: skipped: {}", stage.name(), err),
            Err(err) => {
                return Err(err).with_context(|| format!("Stage '{}' failed", stage.name()))
            }
        }
    }

    args.output.write_records(pipeline.records())?;
    if let Some(path) = &args.output.removed {
        write_lines(&removed, path).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let report = Report::from_pipeline(&pipeline);
    if let Some(path) = &args.report {
        std::fs::write(path, report.to_text())
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    if let Some(path) = &args.report_json {
        std::fs::write(path, report.to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    eprintln!(
        "Applied {} stages: {} of {} records kept -> {}",
        stages.len(),
        report.total,
        report.original,
        args.output.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn runs_config_and_writes_outputs() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.fa");
        let config = dir.path().join("pipeline.toml");
        let output = dir.path().join("out.fa");
        let removed = dir.path().join("removed.txt");
        let report = dir.path().join("report.txt");

        fs::write(
            &input,
            ">A/duck/Laos/1/2020|H5N6|HA|2020-01-05\nACGTACGT\n>A/duck/Laos/2/2020|H5N6|HA|2020-02-05\nACGTACGT\n>short|H5N1\nAC\n",
        )
        .unwrap();
        fs::write(
            &config,
            "[[stage]]\nkind = \"quality\"\nmin_length = 4\n\n[[stage]]\nkind = \"dedup_basic\"\n\n[[stage]]\nkind = \"temporal\"\nsort_by = \"date\"\n",
        )
        .unwrap();

        let args = RunArgs {
            config,
            input: InputArgs { inputs: vec![input] },
            output: OutputArgs {
                output: output.clone(),
                removed: Some(removed.clone()),
                line_width: 0,
            },
            report: Some(report.clone()),
            report_json: None,
            strict: true,
        };
        run(args).unwrap();

        let out = fs::read_to_string(output).unwrap();
        assert_eq!(out, ">A/duck/Laos/1/2020|H5N6|HA|2020-01-05\nACGTACGT\n");
        let removed = fs::read_to_string(removed).unwrap();
        assert_eq!(removed, ">short|H5N1\n>A/duck/Laos/2/2020|H5N6|HA|2020-02-05\n");
        assert!(fs::read_to_string(report).unwrap().contains("Sequences Removed: 2"));
    }

    #[test]
    fn strict_mode_stops_on_failing_stage() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.fa");
        let config = dir.path().join("pipeline.toml");
        fs::write(&input, ">undated\nACGT\n").unwrap();
        fs::write(&config, "[[stage]]\nkind = \"temporal\"\n").unwrap();

        let args = RunArgs {
            config,
            input: InputArgs { inputs: vec![input] },
            output: OutputArgs {
                output: dir.path().join("out.fa"),
                removed: None,
                line_width: 0,
            },
            report: None,
            report_json: None,
            strict: true,
        };
        assert!(run(args).is_err());
    }
}
