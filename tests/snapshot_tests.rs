// Snapshot tests for the Emo programs in this directory
//
// Every `.emo` file here has a sibling `.out` file holding its expected
// output. `emo test --update` regenerates them.

use emo::runner::{capture_program, collect_programs};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

#[test]
fn test_programs_match_snapshots() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests");
    let programs = collect_programs(&dir).expect("tests directory should be readable");
    assert!(!programs.is_empty(), "no .emo programs found in {}", dir.display());

    for path in programs {
        let source = fs::read_to_string(&path).unwrap();
        let expected = fs::read_to_string(path.with_extension("out"))
            .unwrap_or_else(|_| panic!("missing snapshot for {}", path.display()));
        assert_eq!(capture_program(&source), expected.trim(), "{}", path.display());
    }
}
