use crate::Result;
use crate::facts::{FactValue, ProjectReport};
use core::fmt::Write;
use serde_json::json;

#[expect(unused_results, reason = "serde_json::Map::insert intentionally overwrites values")]
pub fn generate<W: Write>(reports: &[ProjectReport], writer: &mut W) -> Result<()> {
    let mut project_data = Vec::with_capacity(reports.len());

    for report in reports {
        let mut project_obj = serde_json::Map::new();
        project_obj.insert("name".to_string(), json!(report.name()));

        let mut facts_obj = serde_json::Map::new();
        for (key, claims) in report.facts() {
            let claim_list: Vec<_> = claims
                .iter()
                .map(|claim| {
                    json!({
                        "value": fact_value_to_json(&claim.value),
                        "sources": claim.sources,
                    })
                })
                .collect();
            facts_obj.insert(key.to_string(), json!(claim_list));
        }
        project_obj.insert("facts".to_string(), json!(facts_obj));

        project_obj.insert("failures".to_string(), json!(report.failures()));
        project_data.push(json!(project_obj));
    }

    let output = json!({
        "projects": project_data
    });

    write!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

fn fact_value_to_json(value: &FactValue) -> serde_json::Value {
    match value {
        FactValue::UInt(u) => json!(u),
        FactValue::Bool(b) => json!(b),
        FactValue::String(s) => json!(s),
        FactValue::DateTime(dt) => json!(dt.to_rfc3339()),
    }
}
