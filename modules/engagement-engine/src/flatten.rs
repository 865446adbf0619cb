use serde_json::Value;
use tracing::debug;

use engagement_common::{usable_id, Comment, PostSnapshot, Reaction};
use snapshot_client::{RawComment, RawPost, RawReaction, Snapshot};

/// Concatenate every array-valued group of a snapshot into one list of posts.
///
/// Groups keep the document's key order and their own element order.
/// Non-array groups, non-object elements and posts without an id are dropped.
pub fn flatten(snapshot: &Snapshot) -> Vec<PostSnapshot> {
    let mut posts = Vec::new();

    for (group, value) in &snapshot.results_by_group {
        let Value::Array(items) = value else {
            debug!(group = group.as_str(), "Skipping non-array snapshot group");
            continue;
        };

        posts.extend(
            items
                .iter()
                .filter(|item| item.is_object())
                .filter_map(|item| serde_json::from_value::<RawPost>(item.clone()).ok())
                .filter_map(into_post),
        );
    }

    posts
}

fn into_post(raw: RawPost) -> Option<PostSnapshot> {
    let post_id = usable_id(raw.id.as_deref())?.to_string();
    Some(PostSnapshot {
        post_id,
        flag: raw.flag,
        reactions: raw.reactions.into_iter().map(into_reaction).collect(),
        comments: raw.comments.into_iter().map(into_comment).collect(),
    })
}

fn into_reaction(raw: RawReaction) -> Reaction {
    Reaction {
        user_id: raw.id,
        user_name: raw.name,
    }
}

fn into_comment(raw: RawComment) -> Comment {
    Comment {
        user_id: raw.id,
        user_name: raw.name,
        text: raw.text,
        created_time: raw.created_time,
    }
}
