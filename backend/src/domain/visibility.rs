//! Visibility and mutation policy for words and word sets.
//!
//! Pure functions only; the vocabulary service resolves identifiers against
//! storage and feeds the results in. Keeping the policy free of I/O makes the
//! access rules directly testable.

use serde_json::json;

use crate::domain::{Error, UserId, WordSet, WordSetId};

/// Storage-agnostic description of which words a query may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordSelector {
    /// Everything the user owns plus the contents of all default sets.
    OwnedOrDefault {
        owner: UserId,
        default_set_ids: Vec<WordSetId>,
    },
    /// All words of one default set, regardless of requester.
    DefaultSet { set_id: WordSetId },
    /// The intersection of the user's own words and one specific set.
    OwnedInSet { owner: UserId, set_id: WordSetId },
}

/// A set filter with its resolved target, if the set exists.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSetFilter {
    /// The requested set id, as supplied by the caller.
    pub set_id: WordSetId,
    /// The stored set, when the id resolved to one.
    pub target: Option<WordSet>,
}

/// Derive the word selector for a list query.
///
/// Without a filter the user sees their own words and every default set's
/// words. Filtering by a default set exposes that whole set; filtering by any
/// other id narrows to the user's own words in it, which yields nothing for
/// sets belonging to someone else.
pub fn word_selector(
    user_id: UserId,
    default_set_ids: &[WordSetId],
    filter: Option<&ResolvedSetFilter>,
) -> WordSelector {
    match filter {
        None => WordSelector::OwnedOrDefault {
            owner: user_id,
            default_set_ids: default_set_ids.to_vec(),
        },
        Some(filter) => {
            let is_default = filter
                .target
                .as_ref()
                .is_some_and(|set| set.is_default);
            if is_default {
                WordSelector::DefaultSet {
                    set_id: filter.set_id,
                }
            } else {
                WordSelector::OwnedInSet {
                    owner: user_id,
                    set_id: filter.set_id,
                }
            }
        }
    }
}

/// Reject mutation of default sets and their contents.
pub fn ensure_mutable(set: &WordSet) -> Result<(), Error> {
    if set.is_default {
        return Err(
            Error::forbidden("default sets are read-only")
                .with_details(json!({ "wordSet": set.id })),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    fn set(owner: Option<UserId>, is_default: bool) -> WordSet {
        let now = Utc::now();
        WordSet {
            id: WordSetId::random(),
            name: "animals".to_owned(),
            owner,
            is_default,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn unfiltered_queries_cover_owned_and_default_words() {
        let user = UserId::random();
        let defaults = vec![WordSetId::random(), WordSetId::random()];

        let selector = word_selector(user, &defaults, None);

        assert_eq!(
            selector,
            WordSelector::OwnedOrDefault {
                owner: user,
                default_set_ids: defaults,
            }
        );
    }

    #[rstest]
    fn default_set_filter_exposes_the_whole_set() {
        let user = UserId::random();
        let target = set(None, true);
        let filter = ResolvedSetFilter {
            set_id: target.id,
            target: Some(target.clone()),
        };

        let selector = word_selector(user, &[target.id], Some(&filter));

        assert_eq!(selector, WordSelector::DefaultSet { set_id: target.id });
    }

    #[rstest]
    fn other_set_filters_intersect_with_ownership() {
        let user = UserId::random();
        let stranger = UserId::random();
        let target = set(Some(stranger), false);
        let filter = ResolvedSetFilter {
            set_id: target.id,
            target: Some(target.clone()),
        };

        let selector = word_selector(user, &[], Some(&filter));

        assert_eq!(
            selector,
            WordSelector::OwnedInSet {
                owner: user,
                set_id: target.id,
            }
        );
    }

    #[rstest]
    fn unresolved_set_filter_still_intersects_with_ownership() {
        let user = UserId::random();
        let missing = WordSetId::random();
        let filter = ResolvedSetFilter {
            set_id: missing,
            target: None,
        };

        let selector = word_selector(user, &[], Some(&filter));

        assert_eq!(
            selector,
            WordSelector::OwnedInSet {
                owner: user,
                set_id: missing,
            }
        );
    }

    #[rstest]
    fn default_sets_are_immutable() {
        let err = ensure_mutable(&set(None, true)).expect_err("mutation rejected");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    fn user_sets_are_mutable() {
        assert!(ensure_mutable(&set(Some(UserId::random()), false)).is_ok());
    }
}
