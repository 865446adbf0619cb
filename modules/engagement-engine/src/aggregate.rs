use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use engagement_common::time::{instant_or_epoch, parse_timestamp};
use engagement_common::{Comment, EngagementRecord, PostSnapshot, Reaction};

use crate::classify::classify;

/// Collapse one post's reactions and comments into one record per user,
/// reading the wall clock for the fallback display time.
pub fn aggregate(post: &PostSnapshot) -> Vec<EngagementRecord> {
    aggregate_at(post, Utc::now())
}

/// Collapse one post's reactions and comments into one record per user.
///
/// Users are emitted in order of first appearance among the reactions, then
/// comment-only users in order of first appearance among the comments. A
/// user's reaction is the last one listed for them; their comment is the one
/// with the strictly latest `created_time` (ties keep the earlier entry).
/// `now` is used as the display time only when the post has no comment with
/// a readable timestamp.
pub fn aggregate_at(post: &PostSnapshot, now: DateTime<Utc>) -> Vec<EngagementRecord> {
    let category = classify(post.flag.as_deref());
    let mut order: Vec<&str> = Vec::new();

    let mut reactions_by_user: HashMap<&str, &Reaction> = HashMap::new();
    for reaction in &post.reactions {
        let Some(user_id) = reaction.usable_user_id() else {
            continue;
        };
        if reactions_by_user.insert(user_id, reaction).is_none() {
            order.push(user_id);
        }
    }

    let mut comments_by_user: HashMap<&str, (&Comment, DateTime<Utc>)> = HashMap::new();
    for comment in &post.comments {
        let Some(user_id) = comment.usable_user_id() else {
            continue;
        };
        let at = instant_or_epoch(comment.created_time.as_deref());
        match comments_by_user.entry(user_id) {
            Entry::Occupied(mut kept) => {
                if at > kept.get().1 {
                    kept.insert((comment, at));
                }
            }
            Entry::Vacant(slot) => {
                slot.insert((comment, at));
                if !reactions_by_user.contains_key(user_id) {
                    order.push(user_id);
                }
            }
        }
    }

    let default_time = latest_comment_time(&post.comments).unwrap_or(now);

    order
        .into_iter()
        .map(|user_id| {
            let reaction = reactions_by_user.get(user_id).copied();
            let comment = comments_by_user.get(user_id).map(|(c, _)| *c);

            let display_name = reaction
                .and_then(|r| non_empty(r.user_name.as_deref()))
                .or_else(|| comment.and_then(|c| non_empty(c.user_name.as_deref())))
                .unwrap_or_default()
                .to_string();

            let display_time = comment
                .and_then(|c| c.created_time.as_deref())
                .and_then(parse_timestamp)
                .unwrap_or(default_time);

            EngagementRecord {
                post_id: post.post_id.clone(),
                user_id: user_id.to_string(),
                display_name,
                has_reaction: reaction.is_some(),
                comment_text: comment
                    .and_then(|c| c.text.clone())
                    .unwrap_or_default(),
                display_time,
                category,
            }
        })
        .collect()
}

/// Latest readable timestamp among all of a post's comments, whoever wrote them.
fn latest_comment_time(comments: &[Comment]) -> Option<DateTime<Utc>> {
    comments
        .iter()
        .filter_map(|c| c.created_time.as_deref().and_then(parse_timestamp))
        .max()
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use engagement_common::Category;
    use std::collections::HashSet;

    fn reaction(id: &str, name: &str) -> Reaction {
        Reaction {
            user_id: Some(id.to_string()),
            user_name: Some(name.to_string()),
        }
    }

    fn comment(id: &str, name: &str, text: &str, at: &str) -> Comment {
        Comment {
            user_id: Some(id.to_string()),
            user_name: Some(name.to_string()),
            text: Some(text.to_string()),
            created_time: Some(at.to_string()),
        }
    }

    fn post(reactions: Vec<Reaction>, comments: Vec<Comment>) -> PostSnapshot {
        PostSnapshot {
            post_id: "P1".to_string(),
            flag: None,
            reactions,
            comments,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap()
    }

    fn at(s: &str) -> DateTime<Utc> {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn reaction_and_comment_by_same_user_merge() {
        let mut p = post(
            vec![reaction("U1", "Ann")],
            vec![comment("U1", "Ann", "hi", "2024-01-01T00:00:00")],
        );
        p.flag = Some("xanh".to_string());

        let records = aggregate_at(&p, now());

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.post_id, "P1");
        assert_eq!(r.user_id, "U1");
        assert_eq!(r.display_name, "Ann");
        assert!(r.has_reaction);
        assert_eq!(r.comment_text, "hi");
        assert_eq!(r.display_time, at("2024-01-01T00:00:00"));
        assert_eq!(r.category, Category::Low);
    }

    #[test]
    fn union_of_reactors_and_commenters() {
        let p = post(
            vec![reaction("U1", "Ann"), reaction("U2", "Binh")],
            vec![
                comment("U2", "Binh", "nice", "2024-01-02T00:00:00"),
                comment("U3", "Chi", "first", "2024-01-01T00:00:00"),
            ],
        );

        let records = aggregate_at(&p, now());
        let users: HashSet<&str> = records.iter().map(|r| r.user_id.as_str()).collect();

        assert_eq!(users, HashSet::from(["U1", "U2", "U3"]));
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn emission_order_reactors_then_commenters() {
        let p = post(
            vec![reaction("U2", "Binh"), reaction("U1", "Ann"), reaction("U2", "Binh")],
            vec![
                comment("U4", "Dung", "a", "2024-01-01T00:00:00"),
                comment("U1", "Ann", "b", "2024-01-01T00:00:00"),
                comment("U3", "Chi", "c", "2024-01-01T00:00:00"),
            ],
        );

        let order: Vec<String> = aggregate_at(&p, now())
            .into_iter()
            .map(|r| r.user_id)
            .collect();

        assert_eq!(order, vec!["U2", "U1", "U4", "U3"]);
    }

    #[test]
    fn reactor_only_has_empty_comment() {
        let p = post(
            vec![reaction("U1", "Ann")],
            vec![comment("U9", "Zed", "late", "2024-05-05T05:05:05")],
        );

        let records = aggregate_at(&p, now());
        let ann = records.iter().find(|r| r.user_id == "U1").unwrap();

        assert!(ann.has_reaction);
        assert_eq!(ann.comment_text, "");
        // Falls back to the post's latest comment time
        assert_eq!(ann.display_time, at("2024-05-05T05:05:05"));
    }

    #[test]
    fn commenter_only_has_no_reaction() {
        let p = post(vec![], vec![comment("U3", "Chi", "hello", "2024-01-01T10:00:00")]);

        let records = aggregate_at(&p, now());

        assert_eq!(records.len(), 1);
        assert!(!records[0].has_reaction);
        assert_eq!(records[0].display_name, "Chi");
        assert_eq!(records[0].comment_text, "hello");
    }

    #[test]
    fn last_reaction_wins() {
        let p = post(
            vec![
                reaction("U1", "Old Name"),
                Reaction {
                    user_id: Some("U1".to_string()),
                    user_name: None,
                },
            ],
            vec![comment("U1", "Comment Name", "x", "2024-01-01T00:00:00")],
        );

        let records = aggregate_at(&p, now());

        assert_eq!(records.len(), 1);
        assert!(records[0].has_reaction);
        // The overwritten reaction's name must not surface
        assert_eq!(records[0].display_name, "Comment Name");
    }

    #[test]
    fn latest_comment_wins() {
        let p = post(
            vec![],
            vec![
                comment("U1", "Ann", "second", "2024-01-02T00:00:00"),
                comment("U1", "Ann", "first", "2024-01-01T00:00:00"),
                comment("U1", "Ann", "third", "2024-01-03T00:00:00"),
                comment("U1", "Ann", "garbled", "not a time"),
            ],
        );

        let records = aggregate_at(&p, now());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].comment_text, "third");
        assert_eq!(records[0].display_time, at("2024-01-03T00:00:00"));
    }

    #[test]
    fn tied_comment_times_keep_first() {
        let p = post(
            vec![],
            vec![
                comment("U1", "Ann", "one", "2024-01-01T00:00:00"),
                comment("U1", "Ann", "two", "2024-01-01T00:00:00"),
            ],
        );

        assert_eq!(aggregate_at(&p, now())[0].comment_text, "one");
    }

    #[test]
    fn parseable_time_replaces_unparseable() {
        let p = post(
            vec![],
            vec![
                comment("U1", "Ann", "undated", ""),
                comment("U1", "Ann", "dated", "2020-01-01T00:00:00"),
            ],
        );

        assert_eq!(aggregate_at(&p, now())[0].comment_text, "dated");
    }

    #[test]
    fn no_comment_times_fall_back_to_now() {
        let p = post(vec![reaction("U1", "Ann")], vec![]);
        assert_eq!(aggregate_at(&p, now())[0].display_time, now());

        let p = post(vec![], vec![comment("U1", "Ann", "hi", "whenever")]);
        assert_eq!(aggregate_at(&p, now())[0].display_time, now());
    }

    #[test]
    fn anonymous_comment_still_sets_default_time() {
        let p = post(
            vec![reaction("U1", "Ann")],
            vec![Comment {
                user_id: None,
                user_name: Some("Ghost".to_string()),
                text: Some("boo".to_string()),
                created_time: Some("2024-02-02T02:02:02".to_string()),
            }],
        );

        let records = aggregate_at(&p, now());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].display_time, at("2024-02-02T02:02:02"));
    }

    #[test]
    fn missing_user_ids_skipped() {
        let p = post(
            vec![
                Reaction {
                    user_id: None,
                    user_name: Some("Nobody".to_string()),
                },
                reaction("  ", "Blank"),
            ],
            vec![Comment {
                user_id: Some(String::new()),
                ..Default::default()
            }],
        );

        assert!(aggregate_at(&p, now()).is_empty());
    }

    #[test]
    fn empty_post_yields_nothing() {
        assert!(aggregate_at(&post(vec![], vec![]), now()).is_empty());
    }

    #[test]
    fn display_name_empty_when_nobody_named() {
        let p = post(
            vec![Reaction {
                user_id: Some("U1".to_string()),
                user_name: Some(String::new()),
            }],
            vec![],
        );

        assert_eq!(aggregate_at(&p, now())[0].display_name, "");
    }

    #[test]
    fn category_applied_to_every_record() {
        let mut p = post(
            vec![reaction("U1", "Ann")],
            vec![comment("U2", "Binh", "x", "2024-01-01T00:00:00")],
        );
        p.flag = Some(" Đỏ ".to_string());

        assert!(aggregate_at(&p, now())
            .iter()
            .all(|r| r.category == Category::High));
    }
}
