use dcf_compare::assumptions::Assumptions;
use std::path::PathBuf;

/// Get the path to the default demo assumptions file.
fn get_assumptions_path() -> PathBuf {
    PathBuf::from("demos/default.toml")
}

/// An integration test which attempts to load the demo assumptions
#[test]
fn test_assumptions_from_path() {
    let assumptions = Assumptions::from_path(&get_assumptions_path()).unwrap();

    // The default demo mirrors the built-in defaults exactly
    assert_eq!(assumptions, Assumptions::default());
}
