use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::{Actor, ProfileView};
use crate::triage::furry::is_probably_furry;
use crate::triage::spam::is_probably_spam;

/// The fixed moderation queue taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QueueCategory {
    All,
    LikelyFurry,
    LikelySpam,
    Empty,
    HeldBack,
}

impl QueueCategory {
    pub const ALL: [QueueCategory; 5] = [
        QueueCategory::All,
        QueueCategory::LikelyFurry,
        QueueCategory::LikelySpam,
        QueueCategory::Empty,
        QueueCategory::HeldBack,
    ];

    /// Primary categories whose members are also surfaced in `All`.
    const INCLUDE_IN_ALL: [QueueCategory; 1] = [QueueCategory::LikelyFurry];

    pub fn label(self) -> &'static str {
        match self {
            QueueCategory::All => "All",
            QueueCategory::LikelyFurry => "Likely furry",
            QueueCategory::LikelySpam => "Likely spam",
            QueueCategory::Empty => "Empty",
            QueueCategory::HeldBack => "Held back",
        }
    }
}

impl fmt::Display for QueueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered decision cascade; the first matching rule wins.
pub fn categorize_at(
    actor: &Actor,
    profile: Option<&ProfileView>,
    now: DateTime<Utc>,
) -> QueueCategory {
    if actor.held_until.is_some_and(|held_until| held_until > now) {
        return QueueCategory::HeldBack;
    }
    if is_probably_spam(profile) {
        return QueueCategory::LikelySpam;
    }
    if is_probably_furry(profile) {
        return QueueCategory::LikelyFurry;
    }
    let Some(profile) = profile else {
        return QueueCategory::Empty;
    };
    if profile.display_name().is_none()
        && profile.description().is_none()
        && profile.posts_count.unwrap_or(0) == 0
    {
        return QueueCategory::Empty;
    }

    QueueCategory::All
}

pub fn categorize(actor: &Actor, profile: Option<&ProfileView>) -> QueueCategory {
    categorize_at(actor, profile, Utc::now())
}

/// Buckets preserve input order; likely-furry actors appear twice, in
/// their own bucket and in `All`.
pub fn categorize_all(
    actors: &[Actor],
    profiles: &HashMap<String, ProfileView>,
) -> BTreeMap<QueueCategory, Vec<Actor>> {
    categorize_all_at(actors, profiles, Utc::now())
}

pub fn categorize_all_at(
    actors: &[Actor],
    profiles: &HashMap<String, ProfileView>,
    now: DateTime<Utc>,
) -> BTreeMap<QueueCategory, Vec<Actor>> {
    let mut buckets: BTreeMap<QueueCategory, Vec<Actor>> = QueueCategory::ALL
        .into_iter()
        .map(|category| (category, Vec::new()))
        .collect();

    for actor in actors {
        let profile = profiles.get(&actor.did);
        let category = categorize_at(actor, profile, now);

        buckets
            .get_mut(&category)
            .expect("all buckets initialized")
            .push(actor.clone());

        if QueueCategory::INCLUDE_IN_ALL.contains(&category) {
            buckets
                .get_mut(&QueueCategory::All)
                .expect("all buckets initialized")
                .push(actor.clone());
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn actor(did: &str) -> Actor {
        Actor {
            did: did.into(),
            ..Default::default()
        }
    }

    fn furry_profile(did: &str) -> ProfileView {
        ProfileView {
            did: did.into(),
            handle: format!("{}.bsky.social", did.trim_start_matches("did:plc:")),
            description: Some("furry artist".into()),
            follows_count: 5,
            ..Default::default()
        }
    }

    #[test]
    fn held_back_takes_precedence_over_everything() {
        let now = Utc::now();
        let mut held = actor("did:plc:x");
        held.held_until = Some(now + Duration::hours(1));
        let profile = furry_profile("did:plc:x");
        assert_eq!(
            categorize_at(&held, Some(&profile), now),
            QueueCategory::HeldBack
        );
    }

    #[test]
    fn expired_hold_falls_through_the_cascade() {
        let now = Utc::now();
        let mut was_held = actor("did:plc:x");
        was_held.held_until = Some(now - Duration::hours(1));
        let profile = furry_profile("did:plc:x");
        assert_eq!(
            categorize_at(&was_held, Some(&profile), now),
            QueueCategory::LikelyFurry
        );
    }

    #[test]
    fn spam_outranks_furry() {
        let mut profile = furry_profile("did:plc:y");
        profile.follows_count = 50_000;
        assert_eq!(
            categorize(&actor("did:plc:y"), Some(&profile)),
            QueueCategory::LikelySpam
        );
    }

    #[test]
    fn absent_profile_is_empty() {
        assert_eq!(categorize(&actor("did:plc:z"), None), QueueCategory::Empty);
    }

    #[test]
    fn contentless_profile_is_empty() {
        let profile = ProfileView {
            did: "did:plc:blank".into(),
            handle: "blank.bsky.social".into(),
            ..Default::default()
        };
        assert_eq!(
            categorize(&actor("did:plc:blank"), Some(&profile)),
            QueueCategory::Empty
        );
    }

    #[test]
    fn empty_string_fields_count_as_contentless() {
        let profile = ProfileView {
            did: "did:plc:cleared".into(),
            handle: "cleared.bsky.social".into(),
            display_name: Some(String::new()),
            description: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            categorize(&actor("did:plc:cleared"), Some(&profile)),
            QueueCategory::Empty
        );
    }

    #[test]
    fn profile_with_posts_but_no_text_is_uncategorized() {
        let profile = ProfileView {
            did: "did:plc:poster".into(),
            handle: "poster.bsky.social".into(),
            posts_count: Some(12),
            ..Default::default()
        };
        assert_eq!(
            categorize(&actor("did:plc:poster"), Some(&profile)),
            QueueCategory::All
        );
    }

    #[test]
    fn furry_actors_appear_in_their_bucket_and_in_all() {
        let now = Utc::now();
        let actors = vec![actor("did:plc:a"), actor("did:plc:b"), actor("did:plc:c")];
        let mut profiles = HashMap::new();
        profiles.insert("did:plc:a".to_string(), furry_profile("did:plc:a"));
        profiles.insert(
            "did:plc:b".to_string(),
            ProfileView {
                did: "did:plc:b".into(),
                handle: "b.bsky.social".into(),
                follows_count: 50_000,
                ..Default::default()
            },
        );

        let buckets = categorize_all_at(&actors, &profiles, now);

        let furry_dids: Vec<_> = buckets[&QueueCategory::LikelyFurry]
            .iter()
            .map(|a| a.did.as_str())
            .collect();
        let all_dids: Vec<_> = buckets[&QueueCategory::All]
            .iter()
            .map(|a| a.did.as_str())
            .collect();
        assert_eq!(furry_dids, vec!["did:plc:a"]);
        assert_eq!(all_dids, vec!["did:plc:a"]);

        let spam_dids: Vec<_> = buckets[&QueueCategory::LikelySpam]
            .iter()
            .map(|a| a.did.as_str())
            .collect();
        assert_eq!(spam_dids, vec!["did:plc:b"]);
        assert_eq!(buckets[&QueueCategory::Empty].len(), 1);
    }

    #[test]
    fn categorize_all_is_idempotent_and_order_preserving() {
        let now = Utc::now();
        let actors: Vec<Actor> = (0..6).map(|i| actor(&format!("did:plc:n{i}"))).collect();
        let mut profiles = HashMap::new();
        for i in [1, 3, 5] {
            let did = format!("did:plc:n{i}");
            profiles.insert(did.clone(), furry_profile(&did));
        }

        let first = categorize_all_at(&actors, &profiles, now);
        let second = categorize_all_at(&actors, &profiles, now);

        for category in QueueCategory::ALL {
            let a: Vec<_> = first[&category].iter().map(|a| a.did.clone()).collect();
            let b: Vec<_> = second[&category].iter().map(|a| a.did.clone()).collect();
            assert_eq!(a, b, "bucket {category} differs between runs");
        }

        let furry: Vec<_> = first[&QueueCategory::LikelyFurry]
            .iter()
            .map(|a| a.did.as_str())
            .collect();
        assert_eq!(furry, vec!["did:plc:n1", "did:plc:n3", "did:plc:n5"]);
    }

    #[test]
    fn every_bucket_exists_even_when_empty() {
        let buckets = categorize_all(&[], &HashMap::new());
        assert_eq!(buckets.len(), QueueCategory::ALL.len());
        for category in QueueCategory::ALL {
            assert!(buckets[&category].is_empty());
        }
    }
}
