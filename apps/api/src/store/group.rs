//! Flattens the row stream of a tags-joined fetch back into nested form.

use std::collections::HashMap;

use crate::models::tag::Tag;
use crate::models::RecordWithTags;

use super::TableRecord;

/// Groups `(record, joined tag)` rows into one entry per distinct record id,
/// in first-seen order, tags appended in row-arrival order. A record whose
/// join produced only null tag columns yields a group with an empty tag list.
pub fn group_tagged_rows<T: TableRecord>(rows: Vec<(T, Option<Tag>)>) -> Vec<RecordWithTags<T>> {
    let mut position: HashMap<i64, usize> = HashMap::new();
    let mut groups: Vec<RecordWithTags<T>> = Vec::new();

    for (record, tag) in rows {
        let id = record.id();
        let at = match position.get(&id) {
            Some(&at) => at,
            None => {
                groups.push(RecordWithTags {
                    record,
                    tags: Vec::new(),
                });
                position.insert(id, groups.len() - 1);
                groups.len() - 1
            }
        };

        if let Some(tag) = tag {
            groups[at].tags.push(tag);
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::records::ResumePreset;
    use chrono::Utc;

    fn preset(id: i64, label: &str) -> ResumePreset {
        let now = Utc::now();
        ResumePreset {
            id,
            account_id: 1,
            label: label.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn tag(id: i64, label: &str) -> Tag {
        Tag {
            id,
            account_id: 1,
            label: label.to_string(),
            color: "#336699".to_string(),
        }
    }

    #[test]
    fn test_three_tags_and_zero_tags_group_into_exactly_two_entries() {
        let rows = vec![
            (preset(1, "a"), Some(tag(7, "rust"))),
            (preset(1, "a"), Some(tag(9, "remote"))),
            (preset(1, "a"), Some(tag(11, "senior"))),
            (preset(2, "b"), None),
        ];

        let groups = group_tagged_rows(rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].record.id, 1);
        assert_eq!(
            groups[0].tags.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![7, 9, 11],
            "tags must keep row-arrival order"
        );
        assert!(
            groups[1].tags.is_empty(),
            "untagged record must get an empty list, not a missing group"
        );
    }

    #[test]
    fn test_groups_keep_first_seen_record_order() {
        let rows = vec![
            (preset(5, "newest"), None),
            (preset(3, "middle"), Some(tag(1, "x"))),
            (preset(8, "oldest"), None),
        ];

        let groups = group_tagged_rows(rows);
        let order: Vec<i64> = groups.iter().map(|g| g.record.id).collect();
        assert_eq!(order, vec![5, 3, 8]);
    }

    #[test]
    fn test_interleaved_rows_still_group_by_record_identity() {
        // The join orders rows by the record sort key, but grouping must not
        // depend on adjacency.
        let rows = vec![
            (preset(1, "a"), Some(tag(7, "x"))),
            (preset(2, "b"), Some(tag(9, "y"))),
            (preset(1, "a"), Some(tag(11, "z"))),
        ];

        let groups = group_tagged_rows(rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups[0].tags.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![7, 11]
        );
        assert_eq!(groups[1].tags.len(), 1);
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        let groups = group_tagged_rows::<ResumePreset>(Vec::new());
        assert!(groups.is_empty());
    }
}
