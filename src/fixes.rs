//! The one encoded fix this tool exists to apply.
//!
//! The card-used guard in `GameView.java` silently swallowed clicks on a
//! spent card. The fix replaces the guard body with an alert telling the
//! player the card is already used, then returns as before.

use std::path::Path;
use regex::RegexBuilder;

use crate::patch::{PatchError, RegexPatch};

/// Target file, relative to the project root.
pub const TARGET_FILE: &str = "src/main/java/org/example/ui/GameView.java";

/// Guard block to replace: opening condition through its `return;` and
/// closing brace, non-greedy so only one block is consumed per match.
pub const GUARD_PATTERN: &str = r"if \(cardUsed\[cardIndex\]\) \{.*?return;\s*\}";

/// Replacement body, indentation matching the surrounding method.
pub const GUARD_REPLACEMENT: &str = r#"if (cardUsed[cardIndex]) {
            showAlert("카드 사용 불가", "이미 사용한 카드입니다.");
            return;
        }"#;

/// Build the card-used guard patch with the target resolved against `root`.
pub fn card_used_guard(root: &Path) -> Result<RegexPatch, PatchError> {
    let pattern = RegexBuilder::new(GUARD_PATTERN)
        .dot_matches_new_line(true)
        .build()?;

    Ok(RegexPatch::new(
        root.join(TARGET_FILE),
        pattern,
        GUARD_REPLACEMENT,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const ORIGINAL_GUARD: &str = r#"        if (cardUsed[cardIndex]) {
            // ignore clicks on spent cards
            log.debug("card already used: " + cardIndex);
            return;
        }"#;

    fn game_view(body: &str) -> String {
        format!(
            "public class GameView {{\n    void onCardClicked(int cardIndex) {{\n{body}\n        playCard(cardIndex);\n    }}\n}}\n"
        )
    }

    #[test]
    fn test_patch_replaces_guard_body() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join(TARGET_FILE);
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, game_view(ORIGINAL_GUARD)).unwrap();

        let patch = card_used_guard(dir.path()).unwrap();
        patch.apply().unwrap();

        let content = fs::read_to_string(&target).unwrap();
        assert!(content.contains("showAlert(\"카드 사용 불가\", \"이미 사용한 카드입니다.\")"));
        assert!(!content.contains("log.debug"));
        // surrounding method untouched
        assert!(content.contains("playCard(cardIndex);"));
        assert!(content.starts_with("public class GameView {"));
    }

    #[test]
    fn test_pattern_spans_multiline_body() {
        let guard = "        if (cardUsed[cardIndex]) {\n            a();\n            b();\n            c();\n            return;\n        }";
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join(TARGET_FILE);
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, game_view(guard)).unwrap();

        let patch = card_used_guard(dir.path()).unwrap();
        let applied = patch.apply().unwrap();
        assert_eq!(applied.file, target);
    }

    #[test]
    fn test_second_run_replaces_with_itself() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join(TARGET_FILE);
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, game_view(ORIGINAL_GUARD)).unwrap();

        let patch = card_used_guard(dir.path()).unwrap();
        patch.apply().unwrap();
        let after_first = fs::read_to_string(&target).unwrap();

        // The replacement itself is still a guard block ending in `return;`,
        // so it matches the pattern again. A rerun finds exactly one match
        // and substitutes identical text.
        card_used_guard(dir.path()).unwrap().apply().unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), after_first);
    }
}
