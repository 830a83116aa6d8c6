//! Turns the selection into the node's output text.

use std::collections::HashMap;

use prompt_primitives::{PromptIndex, PromptRecord};

use crate::selection::SelectionSet;

/// Joins the bodies of the selected records with `\n`, in ascending index
/// order.
///
/// Indices with no matching record are skipped, as are records whose body is
/// empty. Bodies are emitted verbatim: no trimming and no de-duplication.
#[must_use]
pub fn project(selection: &SelectionSet, prompts: &[PromptRecord]) -> String {
    let by_index: HashMap<PromptIndex, &str> = prompts
        .iter()
        .map(|record| (record.index, record.prompt.as_str()))
        .collect();

    selection
        .iter()
        .filter_map(|index| by_index.get(&index).copied())
        .filter(|body| !body.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompt_primitives::NewPrompt;

    fn store(bodies: &[(u64, &str)]) -> Vec<PromptRecord> {
        bodies
            .iter()
            .map(|(i, body)| {
                PromptRecord::from_new(PromptIndex::new(*i), NewPrompt::new(format!("t{i}"), *body))
            })
            .collect()
    }

    fn selection(indices: &[u64]) -> SelectionSet {
        indices.iter().copied().map(PromptIndex::new).collect()
    }

    #[test]
    fn orders_by_index_not_insertion() {
        let prompts = store(&[(1, "a"), (2, "b"), (3, "c")]);
        assert_eq!(project(&selection(&[3, 1, 2]), &prompts), "a\nb\nc");
    }

    #[test]
    fn skips_stale_indices() {
        let prompts = store(&[(1, "a"), (3, "c")]);
        assert_eq!(project(&selection(&[1, 2, 3]), &prompts), "a\nc");
    }

    #[test]
    fn empty_selection_is_empty_string() {
        let prompts = store(&[(1, "a")]);
        assert_eq!(project(&SelectionSet::new(), &prompts), "");
    }

    #[test]
    fn keeps_duplicates_and_whitespace() {
        let prompts = store(&[(1, " same "), (2, " same ")]);
        assert_eq!(project(&selection(&[1, 2]), &prompts), " same \n same ");
    }

    #[test]
    fn numeric_not_lexicographic_order() {
        let prompts = store(&[(2, "two"), (10, "ten")]);
        assert_eq!(project(&selection(&[10, 2]), &prompts), "two\nten");
    }
}
