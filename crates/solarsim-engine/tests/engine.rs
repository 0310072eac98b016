//! Integration tests for the engine trait helpers.

use solarsim_engine::{
    DryRunEngine, EngineError, EngineResult, EnvSetting, Extension, ExtensionStatus, GisEngine,
    Operation, Reply,
};

/// Engine answering every call with a fixed reply.
struct FixedReplyEngine {
    reply: Reply,
    calls: usize,
}

impl GisEngine for FixedReplyEngine {
    fn execute(&mut self, _op: &Operation) -> EngineResult<Reply> {
        self.calls += 1;
        Ok(self.reply)
    }
}

#[test]
fn test_extension_status_rejects_wrong_reply() {
    let mut engine = FixedReplyEngine {
        reply: Reply::Done,
        calls: 0,
    };

    let err = engine.extension_status(Extension::ThreeD).unwrap_err();
    assert!(matches!(err, EngineError::Protocol(_)));
    assert_eq!(engine.calls, 1);
}

#[test]
fn test_require_extension_stops_before_checkout() {
    let mut engine = FixedReplyEngine {
        reply: Reply::Extension(ExtensionStatus::Unavailable),
        calls: 0,
    };

    let err = engine.require_extension(Extension::Spatial).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Spatial Analyst extension required (status: Unavailable)"
    );
    assert_eq!(engine.calls, 1, "No checkout should be attempted");
}

#[test]
fn test_boxed_engine_dispatches() {
    let mut engine: Box<dyn GisEngine> = Box::new(DryRunEngine::new());

    engine.require_extension(Extension::ThreeD).unwrap();
    engine
        .set_env(EnvSetting::Workspace(r"C:\PhillySolar".into()))
        .unwrap();
    engine.check_in(Extension::ThreeD).unwrap();
}

#[test]
fn test_operations_round_trip_through_json() {
    let mut engine = DryRunEngine::new();
    engine.set_env(EnvSetting::Mask("LI_BUILDING_FOOTPRINTS.shp".into())).unwrap();

    let recorded = &engine.operations()[0];
    let json = serde_json::to_string(recorded).unwrap();
    let parsed: Operation = serde_json::from_str(&json).unwrap();
    assert_eq!(&parsed, recorded);
}
