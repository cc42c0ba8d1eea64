//! `pixelcode generate`: one streamed completion, or several variants at once.

use anyhow::{Result, anyhow};
use futures::future::join_all;
use pixelcode_llms::{Completion, Conversation, FnSink, Model, NullSink, Orchestrator};
use pixelcode_observability::{command_span, record_duration, record_error};
use serde::Serialize;
use tracing::Instrument;

use crate::cli::GenerateArgs;
use crate::commands::input;
use crate::config::AppConfig;
use crate::output;

#[derive(Debug, Serialize)]
struct VariantReport {
    model: Model,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl VariantReport {
    fn new(model: Model, result: &pixelcode_llms::Result<Completion>) -> Self {
        match result {
            Ok(completion) => Self {
                model,
                duration_secs: Some(completion.duration_secs()),
                text: Some(completion.text().to_string()),
                error: None,
            },
            Err(e) => Self {
                model,
                duration_secs: None,
                text: None,
                error: Some(e.to_string()),
            },
        }
    }
}

pub async fn handle(args: GenerateArgs, config: &AppConfig, mock: bool) -> Result<()> {
    let conversation = input::load_conversation(&args.input)?;
    let orchestrator = Orchestrator::new()
        .with_timeout(config.timeout())
        .with_mock(mock);

    let span = command_span!("generate");
    async move {
        match args.models.as_slice() {
            [model] => single(&orchestrator, *model, &conversation, config).await,
            models => variants(&orchestrator, models, &conversation, config).await,
        }
    }
    .instrument(span)
    .await
}

/// Stream fragments straight to stdout.
async fn single(
    orchestrator: &Orchestrator,
    model: Model,
    conversation: &Conversation,
    config: &AppConfig,
) -> Result<()> {
    let credentials = config.credentials_for(model.family());
    let mut sink = FnSink(|chunk: &str| output::chunk(chunk));

    match orchestrator
        .complete(model, conversation, &credentials, &mut sink)
        .await
    {
        Ok(completion) => {
            record_duration("duration_ms", completion.duration());
            if output::is_json() {
                output::data("completion", &VariantReport::new(model, &Ok(completion)));
            } else {
                println!();
                output::dim(&format!(
                    "{} finished in {}",
                    model,
                    output::duration(completion.duration())
                ));
            }
            Ok(())
        }
        Err(e) => {
            record_error(&e);
            Err(e.into())
        }
    }
}

/// Run every model concurrently; results print in argument order once all are done.
async fn variants(
    orchestrator: &Orchestrator,
    models: &[Model],
    conversation: &Conversation,
    config: &AppConfig,
) -> Result<()> {
    let spinner = output::spinner(&format!("Generating {} variants", models.len()));

    let runs = models.iter().map(|&model| {
        let credentials = config.credentials_for(model.family());
        async move {
            let result = orchestrator
                .complete(model, conversation, &credentials, &mut NullSink)
                .await;
            (model, result)
        }
    });
    let results = join_all(runs).await;
    spinner.finish_and_clear();

    let reports: Vec<VariantReport> = results
        .iter()
        .map(|(model, result)| VariantReport::new(*model, result))
        .collect();
    let failed = reports.iter().filter(|r| r.error.is_some()).count();

    if output::is_json() {
        output::data("variants", &reports);
    } else {
        for (index, report) in reports.iter().enumerate() {
            output::header(&format!("Variant {} · {}", index + 1, report.model));
            match (&report.text, &report.error, report.duration_secs) {
                (Some(text), _, Some(secs)) => {
                    output::kv("duration", &format!("{secs:.2}s"));
                    output::code(text);
                }
                (_, Some(error), _) => output::error(error),
                _ => {}
            }
        }
    }

    for (model, result) in &results {
        if let Err(e) = result {
            tracing::warn!(model = %model, error = %e, "variant failed");
        }
    }

    if failed > 0 {
        let err = anyhow!("{} of {} variants failed", failed, reports.len());
        record_error(&err);
        return Err(err);
    }
    Ok(())
}
