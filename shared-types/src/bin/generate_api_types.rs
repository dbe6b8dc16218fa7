use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let mut types = Vec::new();

    // Job types
    types.push(clean_type(JobStatus::export_to_string()?));
    types.push(clean_type(JobType::export_to_string()?));
    types.push(clean_type(JobSort::export_to_string()?));
    types.push(clean_type(Job::export_to_string()?));
    types.push(clean_type(CreateJobRequest::export_to_string()?));
    types.push(clean_type(UpdateJobRequest::export_to_string()?));
    types.push(clean_type(ListJobsQuery::export_to_string()?));
    types.push(clean_type(JobsResponse::export_to_string()?));
    types.push(clean_type(JobResponse::export_to_string()?));

    // Stats types
    types.push(clean_type(StatusCounts::export_to_string()?));
    types.push(clean_type(MonthlyApplication::export_to_string()?));
    types.push(clean_type(JobStatsResponse::export_to_string()?));

    let output_dir = Path::new("../gui/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    // Every type lands in the same file, so cross-type imports are dropped
    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
