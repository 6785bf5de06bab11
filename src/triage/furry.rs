use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::ProfileView;
use crate::triage::terms::{matches_any, Term};

// Theta-delta digraph used as a therian self-identifier; the first
// glyph alternative is the increment operator, not a delta.
static THERIAN_GLYPHS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(Θ|θ)(∆|Δ)").expect("valid therian glyph pattern"));

static FURRY_TERMS: Lazy<Vec<Term>> = Lazy::new(|| {
    vec![
        Term::Literal("furry"),
        Term::Literal("furries"),
        Term::pattern(r"(?i)(Θ|θ)(∆|Δ)"),
        Term::Literal("therian"),
        Term::pattern(r"\b[bp]up(py)?\b"),
        Term::pattern(r"\bfurs?\b"),
        Term::Literal("anthro"),
        Term::Literal("canine"),
        Term::Literal("feline"),
        Term::pattern(r"bu?n+u*y"),
        Term::Literal("kemono"),
        Term::Literal("furaffinity"),
        Term::Literal("derg"),
        Term::pattern(r"scal(y|ie)"),
        Term::pattern(r"gay (fur|dog|cat|wolf|fox)"),
        Term::pattern(r"(f|m)urr?suit"),
        Term::pattern(r"gr(e|a)ymuzzle"),
        Term::pattern(r"\b(co)?yote\b"),
        Term::Literal("kitsune"),
        Term::Literal("hyena"),
        Term::pattern(r"\byeen\b"),
        Term::Literal("otherkin"),
        Term::Literal("protogen"),
        Term::Literal("fluffy"),
        Term::Literal("dog"),
        Term::Literal("deer"),
        Term::Literal("cat"),
        Term::Literal("wolf"),
        Term::Literal("dragon"),
        Term::pattern(r"\bsnep\b"),
        Term::Literal("critter"),
        Term::Literal("jackalope"),
        Term::Literal("tiger"),
        Term::Literal("otter"),
        Term::Literal("kobold"),
        Term::Literal("lion"),
        Term::Literal("squirrel"),
        Term::pattern(r"\bpaws?\b"),
        Term::pattern(r"\bbirb\b"),
        Term::pattern(r"\b(fur)?sona\b"),
        Term::Literal("cartoon animal"),
    ]
});

/// Name and handle participate alongside the bio; self-identification
/// often lives there when the bio is empty or unrelated.
pub fn is_probably_furry(profile: Option<&ProfileView>) -> bool {
    let Some(profile) = profile else {
        return false;
    };

    if let Some(display_name) = profile.display_name() {
        if THERIAN_GLYPHS.is_match(display_name) {
            return true;
        }
    }

    let Some(description) = profile.description() else {
        return false;
    };

    let haystack = [
        profile.display_name().unwrap_or_default(),
        profile.handle.as_str(),
        description,
    ]
    .map(str::to_lowercase)
    .join(" ");

    matches_any(&FURRY_TERMS, &haystack)
}
