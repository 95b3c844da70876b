//! Cross-contract tests live in `tests/`.
