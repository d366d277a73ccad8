use chanstate_core::ops::ImportMode;
use chanstate_core::{Config, Engine, ErrorKind, MemoryChannels, Phase, Probe, SharedRegistry, Value};

fn engine(registry: &SharedRegistry) -> Engine<MemoryChannels> {
    Engine::with_registry(registry, MemoryChannels::new(), Config::embedded())
}

#[test]
fn fresh_engine_reads_fallbacks() {
    let registry = SharedRegistry::new();
    let engine = engine(&registry);
    let state = engine.state(Phase::Init);
    assert_eq!(state.get_number("anything").unwrap().resolve(0.0), -1.0);
    assert_eq!(state.get_number_array("anything").unwrap().resolve(Vec::new()), vec![-1.0]);
    assert_eq!(state.get_string("anything").unwrap().resolve("prior".into()), "");
    assert!(state.get_string_array("anything").unwrap().resolve(vec!["p".into()]).is_empty());
}

#[test]
fn engines_do_not_share_documents() {
    let registry = SharedRegistry::new();
    let a = engine(&registry);
    let b = engine(&registry);

    a.state(Phase::Init).set_number("shared", 1.0).unwrap();
    assert_eq!(b.state(Phase::Init).get_number("shared").unwrap(), Probe::Fallback(-1.0));

    b.state(Phase::Init).set_number("shared", 2.0).unwrap();
    assert_eq!(a.state(Phase::Perf).get_number("shared").unwrap(), Probe::Found(1.0));
    assert_eq!(b.state(Phase::Perf).get_number("shared").unwrap(), Probe::Found(2.0));
}

#[test]
fn dropping_engine_tears_down_its_document() {
    let registry = SharedRegistry::new();
    let keep = engine(&registry);
    keep.state(Phase::Init).set_string("name", "kept").unwrap();
    {
        let gone = engine(&registry);
        gone.state(Phase::Init).set_string("name", "gone").unwrap();
        assert_eq!(registry.document_count(), 2);
    }
    assert_eq!(registry.document_count(), 1);
    assert_eq!(
        keep.state(Phase::Perf).get_string("name").unwrap().found().as_deref(),
        Some("kept")
    );
}

#[test]
fn writes_from_many_call_sites_merge() {
    let registry = SharedRegistry::new();
    let engine = engine(&registry);

    // Several units writing during one control block
    engine.state(Phase::Init).set_number("a", 1.0).unwrap();
    engine.state(Phase::Perf).set_string("b", "two").unwrap();
    engine.state(Phase::Perf).set_number_array("c", &[3.0, 3.5]).unwrap();
    engine.state(Phase::Perf).set_string_array("d", &["x", "y"]).unwrap();
    engine.state(Phase::Perf).set_number("a", 1.5).unwrap();

    assert_eq!(
        engine.bulk(Phase::Perf).export_all(),
        r#"{"a":1.5,"b":"two","c":[3.0,3.5],"d":["x","y"]}"#
    );
}

#[test]
fn perf_failures_do_not_disturb_the_store() {
    let registry = SharedRegistry::new();
    let engine = engine(&registry);
    engine.state(Phase::Init).set_number("gain", 0.5).unwrap();
    let before = engine.bulk(Phase::Perf).export_all();

    let err = engine.state(Phase::Perf).set_string("label", "bad \" quote").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParseFailure);
    assert!(!err.aborts_init());

    let err = engine.bulk(Phase::Perf).import_all("{oops", ImportMode::Merge).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParseFailure);

    assert_eq!(engine.bulk(Phase::Perf).export_all(), before);
}

#[test]
fn export_import_round_trip_between_engines() {
    let registry = SharedRegistry::new();
    let source = engine(&registry);
    source.state(Phase::Init).set_number("n", 0.125).unwrap();
    source.state(Phase::Init).set_string("s", "text").unwrap();
    source.state(Phase::Init).set_string_array("sa", &["", "b"]).unwrap();
    let exported = source.bulk(Phase::Perf).export_all();

    let target = engine(&registry);
    target.state(Phase::Init).set_number("old", 9.0).unwrap();
    target.bulk(Phase::Init).import_all(&exported, ImportMode::Replace).unwrap();

    assert_eq!(target.bulk(Phase::Perf).export_all(), exported);
    target.handle().with_document(|doc| {
        let doc = doc.unwrap();
        assert_eq!(doc.get("old"), None);
        assert_eq!(doc.get("sa"), Some(&Value::StringArray(vec![String::new(), "b".into()])));
    });
}
