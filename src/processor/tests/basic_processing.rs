//! Basic processing integration tests

use super::*;
use crate::config::{AssemblyConfig, OutputConfig, OutputFormat};
use crate::geometry::coords_at;
use crate::models::Point;
use crate::processor::ModelProcessor;

fn categories(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[tokio::test]
async fn test_assemble_all_keeps_requested_order() {
    let temp_dir = TempDir::new().unwrap();
    let (inp, rpt) = write_model(&temp_dir, NETWORK, Some(REPORT));
    let processor = ModelProcessor::new(inp, rpt).unwrap().with_progress(false);

    let frames = processor
        .assemble_all(&categories(&["pumps", "junctions", "conduits"]))
        .await
        .unwrap();

    let names: Vec<&str> = frames.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["pumps", "junctions", "conduits"]);
    assert_eq!(frames[0].1.height(), 1);
    assert_eq!(frames[1].1.height(), 2);
    assert_eq!(frames[2].1.height(), 2);
}

#[tokio::test]
async fn test_conduits_join_network_results_and_geometry() {
    let temp_dir = TempDir::new().unwrap();
    let (inp, rpt) = write_model(&temp_dir, NETWORK, Some(REPORT));
    let processor = ModelProcessor::new(inp, rpt).unwrap().with_progress(false);

    let frames = processor
        .assemble_all(&categories(&["conduits"]))
        .await
        .unwrap();
    let conduits = &frames[0].1;

    let shape = conduits
        .column("Shape")
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .clone();
    assert_eq!(shape.get(1), Some("CIRCULAR"));
    let max_q = conduits
        .column("MaxQ")
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .clone();
    assert_eq!(max_q.get(0), Some(12.3));
    assert_eq!(
        coords_at(conduits, 1).unwrap(),
        vec![
            Point::new(10.0, 0.0),
            Point::new(15.0, -1.0),
            Point::new(20.0, -5.0)
        ]
    );
}

#[tokio::test]
async fn test_process_writes_one_file_per_category() {
    let temp_dir = TempDir::new().unwrap();
    let (inp, rpt) = write_model(&temp_dir, NETWORK, Some(REPORT));
    let output_dir = temp_dir.path().join("tables");
    let processor = ModelProcessor::new(inp, rpt)
        .unwrap()
        .with_progress(false)
        .with_output_config(
            OutputConfig::default()
                .with_format(OutputFormat::Parquet)
                .with_output_dir(&output_dir),
        );

    let stats = processor
        .process(&categories(&["conduits", "junctions", "weirs"]))
        .await
        .unwrap();

    assert_eq!(stats.categories_assembled, 3);
    assert_eq!(stats.categories_empty, 1);
    assert_eq!(stats.total_rows, 4);
    assert_eq!(stats.outputs.len(), 3);
    assert!(output_dir.join("conduits.parquet").exists());
    assert!(output_dir.join("junctions.parquet").exists());
    assert!(output_dir.join("weirs.parquet").exists());
}

#[tokio::test]
async fn test_process_without_report() {
    let temp_dir = TempDir::new().unwrap();
    let (inp, rpt) = write_model(&temp_dir, NETWORK, None);
    let processor = ModelProcessor::new(inp, rpt)
        .unwrap()
        .with_progress(false)
        .with_output_config(
            OutputConfig::default()
                .with_format(OutputFormat::Csv)
                .with_output_dir(temp_dir.path()),
        );

    let stats = processor.process(&categories(&["pumps"])).await.unwrap();

    assert_eq!(stats.total_rows, 1);
    let content = std::fs::read_to_string(temp_dir.path().join("pumps.csv")).unwrap();
    assert!(content.contains("LINESTRING (10 0, 0 0)"));
    assert!(!content.contains("MaxQ"));
}

#[tokio::test]
async fn test_orphan_results_write_blank_geometry() {
    let temp_dir = TempDir::new().unwrap();
    let (inp, rpt) = write_model(&temp_dir, NETWORK, Some(REPORT));
    let output_dir = temp_dir.path().join("tables");
    let processor = ModelProcessor::new(inp, rpt)
        .unwrap()
        .with_progress(false)
        .with_assembly_config(AssemblyConfig::default().with_orphan_results())
        .with_output_config(
            OutputConfig::default()
                .with_format(OutputFormat::Csv)
                .with_output_dir(&output_dir),
        );

    let stats = processor.process(&categories(&["conduits"])).await.unwrap();

    // the pump only appears in the report's link table
    assert_eq!(stats.total_rows, 3);
    let content = std::fs::read_to_string(output_dir.join("conduits.csv")).unwrap();
    let pump_row = content.lines().find(|line| line.starts_with("P1,")).unwrap();
    assert!(!pump_row.contains("LINESTRING"));
    assert!(content.contains("LINESTRING (0 0, 10 0)"));
}
