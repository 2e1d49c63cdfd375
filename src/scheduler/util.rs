use crate::model::Member;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Jours de `start` à `end` inclus.
pub(super) fn days(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

pub(super) fn find_duplicate_id(members: &[Member]) -> Option<&Member> {
    let mut seen = HashSet::new();
    members.iter().find(|m| !seen.insert(&m.id))
}
