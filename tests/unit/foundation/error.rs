use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ScrollReelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ScrollReelError::load("x").to_string().contains("load error:"));
    assert!(
        ScrollReelError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        ScrollReelError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ScrollReelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
