//! End-to-end conversion tests.
//!
//! Tests are organized into two sections:
//! - Output document: the JSON layout the planner reads
//! - Batch runs: many instances converted into a directory

use std::time::Duration;

use htn_serializer::batch;
use htn_serializer::models::ConditionalEffect;
use htn_serializer::{convert, output, ConvertConfig};
use serde_json::Value;

const PICK_UP: &str = include_str!("fixtures/pick_up.ground");

/// Helper to convert the fixture and parse the resulting document.
fn document(config: &ConvertConfig) -> Value {
    let domain = convert(PICK_UP, config).expect("Failed to convert");
    let json = output::to_json_string(&domain, config.keep_conditional).expect("Failed to serialize");
    serde_json::from_str(&json).expect("Output is not JSON")
}

/// Helper to pad the fixture with unused state features so that parsing takes a while.
fn oversized_instance(extra_features: usize) -> String {
    let padding: String = (0..extra_features)
        .map(|i| format!("+filler[f{}]\n", i))
        .collect();
    PICK_UP
        .replacen(
            "4\n+holding[b1]",
            &format!("{}\n+holding[b1]", 4 + extra_features),
            1,
        )
        .replacen("+broken[b1]\n", &format!("+broken[b1]\n{}", padding), 1)
}

/// Helper to build a config for batch tests.
fn batch_config(timeout: Duration) -> ConvertConfig {
    ConvertConfig {
        jobs: 2,
        timeout,
        ..ConvertConfig::default()
    }
}

// ============================================================
// Output Document Tests
// ============================================================

mod output_document {
    use super::*;

    #[test]
    fn uses_the_planner_layout() {
        let doc = document(&ConvertConfig::default());

        assert_eq!(doc["initial_abstract_task"], "get[b1]");
        assert_eq!(doc["tasks"], serde_json::json!(["get[b1]"]));
        assert_eq!(
            doc["primitive_tasks"],
            serde_json::json!(["pick_up[b1]", "put_down[b1]"])
        );
        assert_eq!(doc["goal"], serde_json::json!(["-1"]));
        assert_eq!(doc["mutex_groups"], serde_json::json!(["1 2 -1"]));
        assert_eq!(doc["state_features"].as_array().map(Vec::len), Some(4));
    }

    #[test]
    fn writes_every_outcome_of_a_merged_action() {
        let doc = document(&ConvertConfig::default());
        let action = &doc["actions"]["pick_up[b1]"];

        assert_eq!(action["cost"], 1);
        assert_eq!(
            action["precond"],
            serde_json::json!(["+on-table[b1]", "+hand-empty[]"])
        );
        let effects = action["effects"].as_array().expect("effects is a list");
        assert_eq!(effects.len(), 2);
        assert_eq!(
            effects[0]["add_eff"]["unconditional"],
            serde_json::json!(["+holding[b1]"])
        );
        assert_eq!(
            effects[0]["del_eff"]["unconditional"],
            serde_json::json!(["+on-table[b1]", "+hand-empty[]"])
        );
        assert_eq!(effects[1]["del_eff"]["conditional"], serde_json::json!([]));
    }

    #[test]
    fn writes_methods_with_position_pairs() {
        let doc = document(&ConvertConfig::default());
        let method = &doc["methods"]["m_get[b1]_2"];

        assert_eq!(method["task"], "get[b1]");
        assert_eq!(
            method["subtasks"],
            serde_json::json!(["pick_up[b1]", "put_down[b1]"])
        );
        assert_eq!(method["orderings"], serde_json::json!([[0, 1]]));
        assert_eq!(doc["methods"].as_object().map(|m| m.len()), Some(1));
    }

    #[test]
    fn withholds_conditional_effects_unless_asked() {
        let mut domain = convert(PICK_UP, &ConvertConfig::default()).expect("Failed to convert");
        domain
            .actions
            .get_mut("put_down[b1]")
            .expect("put_down exists")
            .effects[0]
            .add
            .conditional
            .push(ConditionalEffect {
                condition: vec!["+broken[b1]".to_string()],
                effect: "+holding[b1]".to_string(),
            });

        let withheld: Value =
            serde_json::from_str(&output::to_json_string(&domain, false).expect("serialize"))
                .expect("json");
        assert_eq!(
            withheld["actions"]["put_down[b1]"]["effects"][0]["add_eff"]["conditional"],
            serde_json::json!([])
        );

        let kept: Value =
            serde_json::from_str(&output::to_json_string(&domain, true).expect("serialize"))
                .expect("json");
        assert_eq!(
            kept["actions"]["put_down[b1]"]["effects"][0]["add_eff"]["conditional"],
            serde_json::json!([{"condition": ["+broken[b1]"], "effect": "+holding[b1]"}])
        );
    }

    #[test]
    fn write_json_matches_to_json_string() {
        let domain = convert(PICK_UP, &ConvertConfig::default()).expect("Failed to convert");
        let mut buffer = Vec::new();
        output::write_json(&mut buffer, &domain, false).expect("Failed to write");
        let written = String::from_utf8(buffer).expect("utf-8");
        assert_eq!(written, output::to_json_string(&domain, false).expect("serialize"));
    }
}

// ============================================================
// Batch Run Tests
// ============================================================

mod batch_runs {
    use super::*;

    #[tokio::test]
    async fn converts_good_instances_and_records_failures() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("p01.ground"), PICK_UP).expect("write");
        std::fs::write(dir.path().join("p02.ground"), PICK_UP).expect("write");
        std::fs::write(dir.path().join("p03.ground"), ";; #state_features\n0\n").expect("write");
        std::fs::write(dir.path().join("notes.txt"), "not an instance").expect("write");

        let inputs = batch::collect_inputs(dir.path(), "ground").expect("Failed to list");
        assert_eq!(inputs.len(), 3);

        let out_dir = dir.path().join("out");
        let report = batch::run_batch(inputs, &out_dir, &batch_config(Duration::from_secs(60)))
            .await
            .expect("Batch failed");

        assert_eq!(report.total(), 3);
        assert_eq!(report.converted.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].0.ends_with("p03.ground"));
        assert!(report.failed[0].1.contains("Malformed input"));
        assert!(!report.is_success());

        assert!(out_dir.join("p01.json").is_file());
        assert!(out_dir.join("p02.json").is_file());
        assert!(!out_dir.join("p03.json").exists());

        let written = std::fs::read_to_string(out_dir.join("p01.json")).expect("read");
        let doc: Value = serde_json::from_str(&written).expect("json");
        assert_eq!(doc["actions"]["pick_up[b1]"]["effects"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn records_unreadable_inputs() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let missing = dir.path().join("gone.ground");

        let report = batch::run_batch(vec![missing], dir.path(), &batch_config(Duration::from_secs(60)))
            .await
            .expect("Batch failed");

        assert!(report.converted.is_empty());
        assert_eq!(report.failed.len(), 1);
    }

    #[tokio::test]
    async fn empty_batch_succeeds() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let inputs = batch::collect_inputs(dir.path(), "ground").expect("Failed to list");

        let report = batch::run_batch(inputs, dir.path(), &batch_config(Duration::from_secs(1)))
            .await
            .expect("Batch failed");

        assert_eq!(report, batch::BatchReport::default());
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn records_timed_out_instances_without_writing_them() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let instance = oversized_instance(200_000);
        std::fs::write(dir.path().join("p01.ground"), &instance).expect("write");
        std::fs::write(dir.path().join("p02.ground"), &instance).expect("write");

        let inputs = batch::collect_inputs(dir.path(), "ground").expect("Failed to list");
        let out_dir = dir.path().join("out");
        let config = ConvertConfig {
            jobs: 1,
            ..batch_config(Duration::ZERO)
        };
        let report = batch::run_batch(inputs, &out_dir, &config)
            .await
            .expect("Batch failed");

        assert_eq!(report.total(), 2);
        assert_eq!(report.timed_out.len(), 2);
        assert!(report.timed_out[0].ends_with("p01.ground"));
        assert!(report.converted.is_empty());
        assert!(!report.is_success());
        assert!(!out_dir.join("p01.json").exists());
        assert!(!out_dir.join("p02.json").exists());
    }

    #[test]
    fn names_outputs_after_the_input_stem() {
        let path = batch::output_path(
            std::path::Path::new("/data/p07.ground"),
            std::path::Path::new("/out"),
        );
        assert_eq!(path, std::path::PathBuf::from("/out/p07.json"));
    }
}
