use once_cell::sync::Lazy;

use crate::domain::ProfileView;
use crate::triage::terms::{matches_any, Term};

pub const FOLLOWS_THRESHOLD: u64 = 10_000;

// Patterns carry (?i) so the raw description is matched as-is.
static SPAM_TERMS: Lazy<Vec<Term>> = Lazy::new(|| {
    vec![
        Term::pattern(r"(?i)#resist(er)?\b"),
        Term::pattern(r"(?i)#teamblue\b"),
        Term::pattern(r"(?i)#bluecrew\b"),
        Term::pattern(r"(?i)\bai artist\b"),
        Term::pattern(r"(?i)blue (democrat|crew)"),
        Term::pattern(r"(?i)#defenddemocracy\b"),
        Term::pattern(r"(?i)\b(ai |to )?prompt\b"),
        Term::pattern(r"(?i)(dm|message|e?mail)( me)? (for|to) (removal|remove)"),
        Term::pattern(r"follow\b.+follow back"),
    ]
});

pub fn is_probably_spam(profile: Option<&ProfileView>) -> bool {
    let Some(profile) = profile else {
        return false;
    };

    if profile.follows_count > FOLLOWS_THRESHOLD {
        return true;
    }

    let Some(description) = profile.description() else {
        return false;
    };

    matches_any(&SPAM_TERMS, description)
}
