//! Pure reconciliation of the dashboard's local collections.
//!
//! Every function here is applied strictly after the server acknowledged
//! the corresponding mutation; the local copy never runs ahead of the
//! backend.

use medimind_shared::{ExtractedMedicine, Schedule};

/// Flip the `enabled` flag of the schedule with the given id.
/// Unknown ids leave the list untouched.
pub fn apply_toggle(schedules: &mut [Schedule], id: &str, enabled: bool) {
    if let Some(schedule) = schedules.iter_mut().find(|s| s.id == id) {
        schedule.enabled = enabled;
    }
}

/// Drop the schedule with the given id, if present.
pub fn remove_by_id(schedules: &mut Vec<Schedule>, id: &str) {
    schedules.retain(|s| s.id != id);
}

/// Sort newest-first by the extracted creation key.
/// The backend returns Mongo insertion order (oldest first).
pub fn newest_first<T, K: Ord>(items: &mut [T], created_at: impl Fn(&T) -> K) {
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
}

/// First `max_chars` characters of the extracted text, with an ellipsis.
/// Cuts on character boundaries, not bytes.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}

/// Comma-separated medicine names for the upload success toast.
pub fn medicine_summary(medicines: &[ExtractedMedicine]) -> String {
    medicines
        .iter()
        .map(|m| m.medicine_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(id: &str, enabled: bool, created_at: &str) -> Schedule {
        serde_json::from_str(&format!(
            r#"{{
                "_id": "{id}",
                "user_id": "u1",
                "prescription_id": "p1",
                "medicine_name": "Paracetamol",
                "dosage": "1 tablet",
                "frequency": "2 times a day",
                "timings": ["morning", "night"],
                "enabled": {enabled},
                "created_at": "{created_at}"
            }}"#
        ))
        .unwrap()
    }

    #[test]
    fn toggle_touches_only_the_acknowledged_schedule() {
        let mut list = vec![
            schedule("s1", true, "2026-08-29T08:00:00"),
            schedule("s2", true, "2026-08-30T08:00:00"),
        ];
        apply_toggle(&mut list, "s1", false);

        assert!(!list[0].enabled);
        assert!(list[1].enabled);
    }

    #[test]
    fn toggle_of_unknown_id_is_a_no_op() {
        let mut list = vec![schedule("s1", true, "2026-08-29T08:00:00")];
        let before = list.clone();
        apply_toggle(&mut list, "missing", false);

        assert_eq!(list, before);
    }

    #[test]
    fn remove_drops_exactly_one_entry() {
        let mut list = vec![
            schedule("s1", true, "2026-08-29T08:00:00"),
            schedule("s2", false, "2026-08-30T08:00:00"),
        ];
        remove_by_id(&mut list, "s1");

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "s2");

        remove_by_id(&mut list, "missing");
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn newest_first_reverses_insertion_order() {
        let mut list = vec![
            schedule("old", true, "2026-08-28T08:00:00"),
            schedule("new", true, "2026-08-30T08:00:00"),
            schedule("mid", true, "2026-08-29T08:00:00"),
        ];
        newest_first(&mut list, |s| s.created_at);

        let ids: Vec<&str> = list.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn excerpt_cuts_on_character_boundaries() {
        assert_eq!(excerpt("short text", 160), "short text");
        assert_eq!(excerpt("abcdef", 3), "abc…");
        // multi-byte characters must not be split
        assert_eq!(excerpt("日本語のテキスト", 3), "日本語…");
    }

    #[test]
    fn medicine_summary_joins_names() {
        let medicines: Vec<ExtractedMedicine> = serde_json::from_str(
            r#"[{"medicine_name":"Paracetamol"},{"medicine_name":"Amoxicillin"}]"#,
        )
        .unwrap();
        assert_eq!(medicine_summary(&medicines), "Paracetamol, Amoxicillin");
        assert_eq!(medicine_summary(&[]), "");
    }
}
