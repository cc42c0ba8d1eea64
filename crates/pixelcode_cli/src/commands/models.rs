//! `pixelcode models`

use anyhow::Result;
use pixelcode_llms::Model;
use serde::Serialize;

use crate::output;

#[derive(Serialize)]
struct ModelRow {
    id: &'static str,
    family: &'static str,
    streaming: bool,
    temperature: Option<f32>,
    token_limit: Option<String>,
}

fn rows() -> Vec<ModelRow> {
    Model::ALL
        .iter()
        .map(|model| {
            let params = model.params();
            ModelRow {
                id: model.as_str(),
                family: model.family().as_str(),
                streaming: params.supports_streaming,
                temperature: params.temperature,
                token_limit: params
                    .token_limit
                    .map(|limit| format!("{}={}", limit.field.as_str(), limit.value)),
            }
        })
        .collect()
}

pub fn handle() -> Result<()> {
    let rows = rows();
    let mut table = output::table();
    output::table_header(
        &mut table,
        &["Model", "Family", "Streaming", "Temperature", "Token limit"],
    );
    for row in &rows {
        output::table_row(
            &mut table,
            &[
                row.id.to_string(),
                row.family.to_string(),
                if row.streaming { "yes" } else { "no" }.to_string(),
                row.temperature
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                row.token_limit.clone().unwrap_or_else(|| "-".to_string()),
            ],
        );
    }
    output::table_print(&table, &rows);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_model_listed() {
        let rows = rows();
        assert_eq!(rows.len(), Model::ALL.len());
        let o1 = rows.iter().find(|r| r.id == "o1-2024-12-17").unwrap();
        assert!(!o1.streaming);
        assert_eq!(o1.temperature, None);
        assert_eq!(o1.token_limit.as_deref(), Some("max_completion_tokens=20000"));
    }
}
