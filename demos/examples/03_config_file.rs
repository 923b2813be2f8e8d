use gmfetch::{Acquirer, FetchConfig, FetchOptions};
use gmfetch_demos::common::{fixture_registry, print_report, ridgecrest};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let workdir = tempfile::tempdir()?;

    // 1. A configuration file with one section per connector.
    let cfg_path = workdir.path().join("gmfetch.json");
    let cfg = json!({
        "fetchers": {
            "mock-direct": { "network": "CI", "stations": ["CCC", "CLC"], "non_free_stations": ["WRV2"] },
            "mock-catalog": { "network": "NP", "stations": ["5419"] }
        }
    });
    std::fs::write(&cfg_path, serde_json::to_string_pretty(&cfg)?)?;
    let config = FetchConfig::from_path(&cfg_path)?;

    // 2. Keep raw downloads and every instrument, including boreholes.
    let raw_dir = workdir.path().join("raw");
    let options = FetchOptions::default()
        .raw_dir(&raw_dir)
        .drop_non_free(false)
        .config(config);

    let acquirer = Acquirer::builder()
        .registry(fixture_registry().build()?)
        .build()?;
    let report = acquirer.fetch_data(&ridgecrest()?, &options).await?;
    print_report(&report);

    let mut files: Vec<String> = std::fs::read_dir(&raw_dir)?
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    println!("raw files: {}", files.join(", "));

    Ok(())
}
