/// First writer wins: an assignee already on the record is never replaced.
/// An unassigned record takes the explicitly requested assignee, or falls
/// back to the acting editor.
#[must_use]
pub fn resolve_assignee(current: Option<&str>, requested: Option<&str>, actor: &str) -> Option<String> {
    current
        .or(requested)
        .map(str::to_owned)
        .or_else(|| Some(actor.to_owned()))
}
