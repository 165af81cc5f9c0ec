use std::io::Write;

use tempfile::NamedTempFile;
use ticktree::analysis::{hottest_nodes, summarize};
use ticktree::classification::SourceType;
use ticktree::profiling::{render_tree, SampleCollector, TreeDisplayOptions};
use ticktree::trace_data::SampleTrace;
use ticktree::tree::LineMode;

const TRACE: &str = r#"{
    "context": 5,
    "entries": [
        { "tag": "function", "name": "main", "resource": "app.js", "line": 1, "kind": "js" },
        { "tag": "lazy-compile", "name": "parse", "resource": "app.js", "line": 30, "kind": "js" },
        { "tag": "builtin", "name": "JSONParse", "builtin_id": 3 },
        { "tag": "callback", "name": "onRead" }
    ],
    "samples": [
        { "frames": [ { "entry": 1 }, { "entry": 0 } ], "src_line": 31 },
        { "frames": [ { "entry": 1 }, { "entry": 0 } ], "src_line": 31 },
        { "frames": [ { "entry": 2 }, { "entry": 1 }, { "entry": 0 } ] },
        { "frames": [ { "entry": 3 } ] },
        { "frames": [ { "entry": "(garbage collector)" } ] },
        { "frames": [ { "entry": "(unresolved function)" }, { "entry": 0 } ] }
    ]
}"#;

fn write_trace() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(TRACE.as_bytes()).expect("Failed to write trace");
    file
}

#[test]
fn test_replay_through_collector() {
    let file = write_trace();
    let trace = SampleTrace::from_file(file.path()).expect("Failed to load trace");
    let entries = trace.build_entries().expect("valid entries");
    let samples = trace.resolve_samples(&entries).expect("resolvable samples");

    let (sender, collector) =
        SampleCollector::spawn(trace.context(), LineMode::LeafOnly, 4).expect("spawn");
    for sample in samples {
        sender.send(sample).expect("collector alive");
    }
    drop(sender);
    let tree = collector.finish().expect("collector finished");

    assert_eq!(tree.total_ticks(tree.root_index()), 6);

    let summary = summarize(&tree);
    let ticks = |source_type: SourceType| {
        summary.iter().find(|row| row.source_type == source_type).map_or(0, |row| row.self_ticks)
    };
    assert_eq!(ticks(SourceType::Script), 2);
    assert_eq!(ticks(SourceType::Builtin), 1);
    assert_eq!(ticks(SourceType::Callback), 1);
    assert_eq!(ticks(SourceType::Internal), 1);
    assert_eq!(ticks(SourceType::Unresolved), 1);

    let hot = hottest_nodes(&tree, 1);
    assert_eq!(hot[0].name, "parse");
    assert_eq!(hot[0].self_ticks, 2);

    let rendered = render_tree(&tree, TreeDisplayOptions::default());
    assert!(rendered.contains("(root)"));
    assert!(rendered.contains("JSONParse"));
}

#[test]
fn test_missing_trace_file_is_an_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let result = SampleTrace::from_file(dir.path().join("missing.json"));
    assert!(result.is_err());
}
