//! Username rules, availability lookups and the claim write.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::identity::UserIdentity;
use crate::store::{DocPath, DocumentStore, WriteBatch};

/// Shortest candidate that is looked up.
pub const MIN_LEN: usize = 3;

/// Longest accepted username.
pub const MAX_LEN: usize = 15;

static ALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._]{3,15}$").expect("username charset pattern"));

static DOUBLE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_.]{2}").expect("separator pattern"));

/// Body of `usernames/{username}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsernameDocument {
    pub owner_id: String,
}

/// Body of `users/{userId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub username: String,
    pub avatar_url: String,
    pub display_name: String,
}

/// How a (lowercased) candidate relates to the username rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    /// Fewer than `MIN_LEN` characters; accepted into the field, never looked up.
    TooShort,
    /// Long enough but breaks the pattern; the keystroke is dropped.
    Rejected,
    /// Matches the pattern; eligible for an availability lookup.
    Acceptable,
}

/// Lowercases raw input the way the form does before classifying it.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
}

/// Returns true if `candidate` satisfies the username pattern:
/// 3–15 characters from letters, digits, `.` and `_`, not starting or ending
/// with a separator, and without two separators in a row.
pub fn matches_pattern(candidate: &str) -> bool {
    const SEPARATORS: [char; 2] = ['.', '_'];
    ALLOWED.is_match(candidate)
        && !DOUBLE_SEPARATOR.is_match(candidate)
        && !candidate.starts_with(SEPARATORS)
        && !candidate.ends_with(SEPARATORS)
}

pub fn classify(candidate: &str) -> Candidate {
    if candidate.chars().count() < MIN_LEN {
        Candidate::TooShort
    } else if matches_pattern(candidate) {
        Candidate::Acceptable
    } else {
        Candidate::Rejected
    }
}

/// Result of an availability lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Taken,
}

impl Availability {
    pub fn is_available(self) -> bool {
        self == Availability::Available
    }
}

/// Checks whether `usernames/{candidate}` exists.
///
/// # Errors
/// Propagates store read failures.
pub async fn lookup(store: &dyn DocumentStore, candidate: &str) -> Result<Availability, StoreError> {
    let snapshot = store.get_document(&DocPath::username(candidate)?).await?;
    tracing::debug!(candidate, exists = snapshot.exists, "username lookup executed");
    Ok(if snapshot.exists {
        Availability::Taken
    } else {
        Availability::Available
    })
}

/// Writes the user profile and the username reservation as one batch.
///
/// The reservation is create-only, so a name claimed by someone else since the
/// last lookup fails the whole batch with `StoreError::AlreadyExists`.
///
/// # Errors
/// Returns the store failure; neither document is written in that case.
pub async fn claim(
    store: &dyn DocumentStore,
    identity: &UserIdentity,
    username: &str,
) -> Result<(), StoreError> {
    let mut batch = WriteBatch::new();
    batch
        .set(
            DocPath::user(&identity.id)?,
            &UserDocument {
                username: username.to_string(),
                avatar_url: identity.avatar_url.clone(),
                display_name: identity.display_name.clone(),
            },
        )?
        .create(
            DocPath::username(username)?,
            &UsernameDocument {
                owner_id: identity.id.clone(),
            },
        )?;
    batch.commit(store).await?;
    tracing::info!(user_id = %identity.id, username, "username claimed");
    Ok(())
}

/// Reads the username claimed by `user_id`.
///
/// Returns `None` unless both documents exist and agree on the owner.
///
/// # Errors
/// Propagates store read failures and malformed documents.
pub async fn claimed_by(
    store: &dyn DocumentStore,
    user_id: &str,
) -> Result<Option<String>, StoreError> {
    let user = store.get_document(&DocPath::user(user_id)?).await?;
    let Some(user) = user.data_as::<UserDocument>()? else {
        return Ok(None);
    };
    if user.username.is_empty() {
        return Ok(None);
    }

    let reservation = store
        .get_document(&DocPath::username(&user.username)?)
        .await?;
    match reservation.data_as::<UsernameDocument>()? {
        Some(doc) if doc.owner_id == user_id => Ok(Some(user.username)),
        _ => {
            tracing::warn!(
                user_id,
                username = %user.username,
                "user document points at a username it does not own"
            );
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::MemoryStore;

    fn ada() -> UserIdentity {
        UserIdentity {
            id: "u1".to_string(),
            display_name: "Ada".to_string(),
            avatar_url: "https://example.com/ada.png".to_string(),
        }
    }

    #[test]
    fn test_classify_examples() {
        assert_eq!(classify(""), Candidate::TooShort);
        assert_eq!(classify("ab"), Candidate::TooShort);
        assert_eq!(classify("abc"), Candidate::Acceptable);
        assert_eq!(classify("a..b"), Candidate::Rejected);
        assert_eq!(classify("a._b"), Candidate::Rejected);
        assert_eq!(classify(".abc"), Candidate::Rejected);
        assert_eq!(classify("abc."), Candidate::Rejected);
        assert_eq!(classify("_abc"), Candidate::Rejected);
        assert_eq!(classify("this_is_way_too_long_12"), Candidate::Rejected);
        assert_eq!(classify("a.b_c"), Candidate::Acceptable);
        assert_eq!(classify("abc-d"), Candidate::Rejected);
        assert_eq!(classify("héllo"), Candidate::Rejected);
    }

    #[test]
    fn test_pattern_length_bounds() {
        assert!(matches_pattern("abcdefghijklmno"));
        assert!(!matches_pattern("abcdefghijklmnop"));
        assert!(matches_pattern("ABC"));
        assert!(!matches_pattern("a\nb"));
    }

    #[test]
    fn test_short_check_counts_characters() {
        assert_eq!(classify("éé"), Candidate::TooShort);
        assert_eq!(normalize("AdA"), "ada");
    }

    #[tokio::test]
    async fn test_lookup_reports_taken_and_available() {
        let store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        batch
            .set(DocPath::username("alice").unwrap(), &json!({"ownerId": "u9"}))
            .unwrap();
        batch.commit(&store).await.unwrap();

        assert_eq!(lookup(&store, "alice").await.unwrap(), Availability::Taken);
        assert_eq!(lookup(&store, "bob").await.unwrap(), Availability::Available);
    }

    #[tokio::test]
    async fn test_claim_writes_consistent_documents() {
        let store = MemoryStore::new();
        claim(&store, &ada(), "alice").await.unwrap();

        let user: UserDocument = store
            .get_document(&DocPath::user("u1").unwrap())
            .await
            .unwrap()
            .data_as()
            .unwrap()
            .unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.display_name, "Ada");

        let reservation: UsernameDocument = store
            .get_document(&DocPath::username("alice").unwrap())
            .await
            .unwrap()
            .data_as()
            .unwrap()
            .unwrap();
        assert_eq!(reservation.owner_id, "u1");

        assert_eq!(
            claimed_by(&store, "u1").await.unwrap().as_deref(),
            Some("alice")
        );
    }

    #[tokio::test]
    async fn test_claim_of_taken_name_writes_nothing() {
        let store = MemoryStore::new();
        let other = UserIdentity {
            id: "u2".to_string(),
            ..ada()
        };
        claim(&store, &other, "alice").await.unwrap();

        let err = claim(&store, &ada(), "alice").await.unwrap_err();
        assert!(err.is_conflict());
        assert!(
            !store
                .get_document(&DocPath::user("u1").unwrap())
                .await
                .unwrap()
                .exists
        );
        assert_eq!(claimed_by(&store, "u1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_claimed_by_ignores_orphaned_user_document() {
        let store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        batch
            .set(
                DocPath::user("u1").unwrap(),
                &json!({"username": "alice", "avatarUrl": "", "displayName": "Ada"}),
            )
            .unwrap();
        batch.commit(&store).await.unwrap();

        assert_eq!(claimed_by(&store, "u1").await.unwrap(), None);
    }
}
