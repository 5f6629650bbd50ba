//! contract diagnostic translation
//!
//! maps free-text failures from simulation, submission or contract logic
//! onto a small closed user-facing vocabulary

use serde::{Deserialize, Serialize};

/// closed vocabulary of user-facing escrow errors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscrowError {
    NotFound,
    AlreadyExists,
    AlreadyCompleted,
    NotSender,
    Unknown,
}

impl std::fmt::Display for EscrowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            EscrowError::NotFound => "escrow not found",
            EscrowError::AlreadyExists => "an escrow with this id already exists",
            EscrowError::AlreadyCompleted => "escrow already completed",
            EscrowError::NotSender => "only the sender can perform this action",
            EscrowError::Unknown => "an unknown error occurred",
        };
        f.write_str(msg)
    }
}

/// keyword table in priority order; first match wins
const KEYWORDS: [(&str, EscrowError); 4] = [
    ("notfound", EscrowError::NotFound),
    ("alreadyexists", EscrowError::AlreadyExists),
    ("alreadycompleted", EscrowError::AlreadyCompleted),
    ("notsender", EscrowError::NotSender),
];

/// classify a raw diagnostic into the closed vocabulary
///
/// case-insensitive substring search over the diagnostic text. lossy: a
/// diagnostic that happens to contain a keyword classifies as that error.
/// kept as the fallback for free-text diagnostics; structured contract error
/// codes, where the contract layer exposes them, take precedence upstream
pub fn translate_error(raw: &str) -> EscrowError {
    let lowered = raw.to_lowercase();
    for (keyword, err) in KEYWORDS {
        if lowered.contains(keyword) {
            return err;
        }
    }
    EscrowError::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_keyword_classifies() {
        assert_eq!(
            translate_error("Error(Contract, #1): NotFound"),
            EscrowError::NotFound
        );
        assert_eq!(
            translate_error("simulation failed: AlreadyExists"),
            EscrowError::AlreadyExists
        );
        assert_eq!(
            translate_error("host error: ALREADYCOMPLETED"),
            EscrowError::AlreadyCompleted
        );
        assert_eq!(translate_error("notsender"), EscrowError::NotSender);
    }

    #[test]
    fn test_priority_order_when_multiple_match() {
        assert_eq!(
            translate_error("alreadycompleted then notfound"),
            EscrowError::NotFound
        );
        assert_eq!(
            translate_error("notsender alreadyexists"),
            EscrowError::AlreadyExists
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(translate_error("NoTfOuNd"), EscrowError::NotFound);
    }

    #[test]
    fn test_total_and_deterministic() {
        let inputs = ["", "weird gibberish", "timeout", "escrow", "コンテナ"];
        for raw in inputs {
            let first = translate_error(raw);
            assert_eq!(first, EscrowError::Unknown);
            assert_eq!(translate_error(raw), first);
        }
    }
}
