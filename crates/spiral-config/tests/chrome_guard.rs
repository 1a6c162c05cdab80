use spiral_config::tracing::{chrome_trace_active, init_tracing_with, InitError, TraceSettings};
use tempfile::tempdir;
use tracing_subscriber::util::SubscriberInitExt;

#[test]
fn chrome_guard_is_dropped_when_install_fails() {
    tracing_subscriber::registry().try_init().unwrap();

    let dir = tempdir().unwrap();
    let settings = TraceSettings {
        default_directive: "info".into(),
        ansi: false,
        chrome_path: Some(dir.path().join("trace.json")),
    };
    let err = init_tracing_with(&settings).unwrap_err();
    assert!(matches!(err, InitError::Install(_)));
    assert!(!chrome_trace_active());

    assert_eq!(
        init_tracing_with(&settings),
        Err(InitError::AlreadyInitialised)
    );
}
