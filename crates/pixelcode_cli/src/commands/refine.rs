//! `pixelcode refine`: the multi-pass improvement loop.

use anyhow::Result;
use pixelcode_llms::{FnSink, RefineOptions, Refiner};
use pixelcode_observability::{command_span, record_duration, record_error};
use tracing::Instrument;

use crate::cli::RefineArgs;
use crate::commands::input;
use crate::config::AppConfig;
use crate::output;

pub async fn handle(args: RefineArgs, config: &AppConfig, mock: bool) -> Result<()> {
    let mut conversation = input::load_conversation(&args.input)?;
    let options = RefineOptions::default()
        .with_passes(args.passes)
        .with_thinking(args.thinking)
        .with_debug_dir(config.debug_artifacts_dir(args.debug_dir));
    let debug_dir = options.debug_dir.clone();
    let refiner = Refiner::new(options)
        .with_timeout(config.timeout())
        .with_mock(mock);
    let credentials = config.credentials_for(args.model.family());

    let span = command_span!("refine");
    async move {
        if !output::is_json() {
            output::header(&format!("Refining with {} ({} passes)", args.model, args.passes));
        }

        let mut sink = FnSink(|chunk: &str| output::chunk(chunk));
        let completion = match refiner
            .run(args.model, &mut conversation, &credentials, &mut sink)
            .await
        {
            Ok(completion) => completion,
            Err(e) => {
                record_error(&e);
                return Err(e.into());
            }
        };
        record_duration("duration_ms", completion.duration());

        if output::is_json() {
            output::data(
                "refinement",
                &serde_json::json!({
                    "model": args.model,
                    "passes": args.passes,
                    "duration_secs": completion.duration_secs(),
                    "text": completion.text(),
                    "turns": conversation.len(),
                }),
            );
        } else {
            println!();
            output::success(&format!(
                "Refined in {}",
                output::duration(completion.duration())
            ));
            if let Some(dir) = &debug_dir {
                output::kv("artifacts", &dir.display().to_string());
            }
        }
        Ok(())
    }
    .instrument(span)
    .await
}
