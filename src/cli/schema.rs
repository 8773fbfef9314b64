use crate::config::Config;
use schemars::schema_for;

pub fn execute() -> anyhow::Result<()> {
    let mut schema = schema_for!(Config);
    schema.schema.metadata().title = Some("omreport config".to_string());
    schema.schema.metadata().description =
        Some("Settings for `omreport run`, loaded from JSON or YAML".to_string());

    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
