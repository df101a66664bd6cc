use std::cmp::Ordering;

use crate::dto::result::{EventResultEntry, StandingEntry};
use crate::models::YachtClass;

/// Orders an event's results into standings.
///
/// Entries with a posted time come first, fastest corrected time first, and
/// share a rank when their posted times are equal (1, 1, 3). Entries without
/// a posted time follow unranked. With `class` set, only yachts starting in
/// that class's start group are kept, so A and A1 rank together.
pub fn rank_results(
    entries: Vec<EventResultEntry>,
    class: Option<YachtClass>,
) -> Vec<StandingEntry> {
    let group = class.map(|c| c.start_group());

    let (mut ranked, mut unranked): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .filter(|entry| match group {
            Some(group) => entry.yacht_class.map(|c| c.start_group()) == Some(group),
            None => true,
        })
        .partition(|entry| entry.posted_time.is_some());

    ranked.sort_by(|a, b| {
        a.posted_time
            .cmp(&b.posted_time)
            .then_with(|| compare_order_over_line(a.order_over_line, b.order_over_line))
            .then_with(|| a.yacht_name.cmp(&b.yacht_name))
    });
    unranked.sort_by(|a, b| {
        a.completion_status
            .cmp(&b.completion_status)
            .then_with(|| a.yacht_name.cmp(&b.yacht_name))
    });

    let mut standings = Vec::with_capacity(ranked.len() + unranked.len());
    let mut previous: Option<(chrono::NaiveTime, u32)> = None;

    for (index, entry) in ranked.into_iter().enumerate() {
        let position = index as u32 + 1;
        let posted = entry.posted_time;
        let rank = match (previous, posted) {
            (Some((time, rank)), Some(current)) if time == current => rank,
            _ => position,
        };
        if let Some(time) = posted {
            previous = Some((time, rank));
        }
        standings.push(StandingEntry {
            rank: Some(rank),
            entry,
        });
    }

    standings.extend(
        unranked
            .into_iter()
            .map(|entry| StandingEntry { rank: None, entry }),
    );

    standings
}

fn compare_order_over_line(a: Option<i32>, b: Option<i32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use uuid::Uuid;

    use super::*;
    use crate::models::CompletionStatus;

    fn entry(
        name: &str,
        class: YachtClass,
        status: CompletionStatus,
        posted: Option<(u32, u32, u32)>,
    ) -> EventResultEntry {
        EventResultEntry {
            result_id: Uuid::new_v4(),
            yacht_id: Uuid::new_v4(),
            yacht_name: name.to_string(),
            yacht_slug: name.to_lowercase(),
            sail_number: None,
            yacht_class: Some(class),
            completion_status: status,
            finish_time: None,
            order_over_line: None,
            time_penalty: None,
            used_spinnaker: false,
            posted_time: posted.map(|(h, m, s)| NaiveTime::from_hms_opt(h, m, s).unwrap()),
        }
    }

    fn names(standings: &[StandingEntry]) -> Vec<&str> {
        standings
            .iter()
            .map(|s| s.entry.yacht_name.as_str())
            .collect()
    }

    #[test]
    fn test_fastest_corrected_time_first() {
        let standings = rank_results(
            vec![
                entry("Slow", YachtClass::A, CompletionStatus::Completed, Some((1, 2, 0))),
                entry("Fast", YachtClass::B, CompletionStatus::Completed, Some((0, 58, 12))),
                entry("Middle", YachtClass::C, CompletionStatus::Completed, Some((1, 0, 0))),
            ],
            None,
        );

        assert_eq!(names(&standings), vec!["Fast", "Middle", "Slow"]);
        let ranks: Vec<_> = standings.iter().map(|s| s.rank).collect();
        assert_eq!(ranks, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_equal_posted_times_share_rank() {
        let standings = rank_results(
            vec![
                entry("Bravo", YachtClass::A, CompletionStatus::Completed, Some((1, 0, 0))),
                entry("Alpha", YachtClass::A, CompletionStatus::Completed, Some((1, 0, 0))),
                entry("Charlie", YachtClass::A, CompletionStatus::Completed, Some((1, 5, 0))),
            ],
            None,
        );

        assert_eq!(names(&standings), vec!["Alpha", "Bravo", "Charlie"]);
        let ranks: Vec<_> = standings.iter().map(|s| s.rank).collect();
        assert_eq!(ranks, vec![Some(1), Some(1), Some(3)]);
    }

    #[test]
    fn test_unposted_entries_follow_unranked() {
        let standings = rank_results(
            vec![
                entry("Dsq", YachtClass::A, CompletionStatus::Disqualified, None),
                entry("Dnc", YachtClass::A, CompletionStatus::DidNotComplete, None),
                entry("Inactive", YachtClass::A, CompletionStatus::Completed, None),
                entry("Winner", YachtClass::A, CompletionStatus::Completed, Some((0, 50, 0))),
            ],
            None,
        );

        assert_eq!(names(&standings), vec!["Winner", "Inactive", "Dnc", "Dsq"]);
        assert_eq!(standings[0].rank, Some(1));
        assert!(standings[1..].iter().all(|s| s.rank.is_none()));
    }

    #[test]
    fn test_class_filter_groups_a_and_a1() {
        let standings = rank_results(
            vec![
                entry("A-boat", YachtClass::A, CompletionStatus::Completed, Some((1, 0, 0))),
                entry("A1-boat", YachtClass::A1, CompletionStatus::Completed, Some((0, 59, 0))),
                entry("B-boat", YachtClass::B, CompletionStatus::Completed, Some((0, 40, 0))),
            ],
            Some(YachtClass::A1),
        );

        assert_eq!(names(&standings), vec!["A1-boat", "A-boat"]);
        assert_eq!(standings[0].rank, Some(1));
        assert_eq!(standings[1].rank, Some(2));
    }

    #[test]
    fn test_order_over_line_breaks_ties() {
        let mut first = entry("Zulu", YachtClass::B, CompletionStatus::Completed, Some((1, 0, 0)));
        first.order_over_line = Some(1);
        let mut second = entry("Alpha", YachtClass::B, CompletionStatus::Completed, Some((1, 0, 0)));
        second.order_over_line = Some(2);

        let standings = rank_results(vec![second, first], None);
        assert_eq!(names(&standings), vec!["Zulu", "Alpha"]);
        assert_eq!(standings[1].rank, Some(1));
    }
}
