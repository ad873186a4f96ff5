use std::{io::BufRead as _, path::PathBuf};

use anyhow::Context;
use stackbot_search::{
    beam::{BeamConfig, DEFAULT_BEAM_WIDTH, DEFAULT_MAX_DEPTH},
    protocol::{PlanRequest, PlanResponse},
    worker::PlanningWorker,
};

use crate::util::{self, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlanArg {
    /// File holding plan requests; stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,
    /// File to write responses to; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
    /// Candidates kept per search generation
    #[arg(long, default_value_t = DEFAULT_BEAM_WIDTH)]
    beam_width: usize,
    /// Pieces of the queue searched
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

/// Answers JSON plan requests, one per input line, with one response line each.
pub(crate) fn run(arg: &PlanArg) -> anyhow::Result<()> {
    let PlanArg {
        input,
        output,
        beam_width,
        max_depth,
    } = arg;

    let config = BeamConfig::new(*beam_width, *max_depth);
    let reader = util::open_input(input.as_deref())?;
    let mut output = Output::from_output_path(output.clone())?;
    let mut worker = PlanningWorker::start(config);

    let mut answered = 0_usize;
    for line in reader.lines() {
        let line = line.context("Failed to read plan request")?;
        if line.trim().is_empty() {
            continue;
        }
        let response = answer(&worker, &line)?;
        tracing::debug!(id = response.id, mode = ?response.mode, "request answered");
        output.write_json_line(&response)?;
        answered += 1;
    }
    worker.shutdown();

    tracing::info!(
        answered,
        beam_width = config.beam_width,
        max_depth = config.max_depth,
        "plan requests done"
    );
    Ok(())
}

/// Answers one request line. Undecodable lines get a rejection too.
fn answer(worker: &PlanningWorker, line: &str) -> anyhow::Result<PlanResponse> {
    match PlanRequest::decode(line) {
        Ok(request) => {
            let id = request.id;
            worker
                .plan(request)
                .with_context(|| format!("Failed to plan request {id}"))
        }
        Err(rejection) => Ok(rejection),
    }
}
