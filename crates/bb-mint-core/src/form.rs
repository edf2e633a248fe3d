use bb_api_types::Candidate;
use serde::{Deserialize, Serialize};

/// An in-progress book entry. Every field is a plain string; empty means unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormState {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub cover_uri: String,
    pub finished_at_local_date: String,
    pub place: String,
    pub mood: String,
    pub time_label: String,
    pub fragment: String,
    pub photo_uri: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Title,
    Author,
    Isbn,
    CoverUri,
    FinishedAtLocalDate,
    Place,
    Mood,
    TimeLabel,
    Fragment,
    PhotoUri,
}

impl FormState {
    fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Title => &mut self.title,
            FormField::Author => &mut self.author,
            FormField::Isbn => &mut self.isbn,
            FormField::CoverUri => &mut self.cover_uri,
            FormField::FinishedAtLocalDate => &mut self.finished_at_local_date,
            FormField::Place => &mut self.place,
            FormField::Mood => &mut self.mood,
            FormField::TimeLabel => &mut self.time_label,
            FormField::Fragment => &mut self.fragment,
            FormField::PhotoUri => &mut self.photo_uri,
        }
    }

    /// Replaces one field, leaving the rest untouched.
    pub fn update(mut self, field: FormField, value: impl Into<String>) -> Self {
        *self.field_mut(field) = value.into();
        self
    }

    /// Overwrites title, author, isbn and cover only where the candidate
    /// has a non-empty value.
    pub fn merge_candidate(mut self, candidate: &Candidate) -> Self {
        merge_into(&mut self.title, Some(candidate.title.as_str()));
        merge_into(&mut self.author, Some(candidate.author.as_str()));
        merge_into(&mut self.isbn, candidate.isbn.as_deref());
        merge_into(&mut self.cover_uri, candidate.cover_uri.as_deref());
        self
    }

    pub fn reset() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn merge_into(slot: &mut String, value: Option<&str>) {
    if let Some(value) = value.filter(|value| !value.is_empty()) {
        *slot = value.to_owned();
    }
}

/// The form together with the candidate list currently offered for it.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Draft {
    pub form: FormState,
    pub candidates: Vec<Candidate>,
}

impl Draft {
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form = std::mem::take(&mut self.form).update(field, value);
    }

    /// Merges the candidate at `index` and clears the list. Returns `false`
    /// when there is no such candidate.
    pub fn select_candidate(&mut self, index: usize) -> bool {
        let Some(candidate) = self.candidates.get(index).cloned() else {
            return false;
        };
        self.form = std::mem::take(&mut self.form).merge_candidate(&candidate);
        self.candidates.clear();
        true
    }

    pub fn clear(&mut self) {
        self.form = FormState::reset();
        self.candidates.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> Candidate {
        Candidate {
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            isbn: Some("9780441013593".into()),
            cover_uri: Some("https://covers.openlibrary.org/b/id/11481354-L.jpg".into()),
        }
    }

    fn filled() -> FormState {
        FormState {
            title: "dune".into(),
            author: "F. Herbert".into(),
            isbn: "0000".into(),
            cover_uri: "https://example.test/cover.jpg".into(),
            finished_at_local_date: "2024-01-15".into(),
            place: "Plane".into(),
            mood: "Inspired".into(),
            time_label: "late night".into(),
            fragment: "Fear is the mind-killer.".into(),
            photo_uri: "ipfs://photo".into(),
        }
    }

    #[test]
    fn update_replaces_only_the_named_field() {
        let before = filled();
        let after = before.clone().update(FormField::Place, "Park");
        assert_eq!(after.place, "Park");
        assert_eq!(FormState { place: before.place.clone(), ..after }, before);
    }

    #[test]
    fn merge_overwrites_present_candidate_fields() {
        let merged = filled().merge_candidate(&dune());
        assert_eq!(merged.title, "Dune");
        assert_eq!(merged.author, "Frank Herbert");
        assert_eq!(merged.isbn, "9780441013593");
        assert_eq!(merged.cover_uri, "https://covers.openlibrary.org/b/id/11481354-L.jpg");
        assert_eq!(merged.place, "Plane");
        assert_eq!(merged.fragment, "Fear is the mind-killer.");
    }

    #[test]
    fn merge_keeps_existing_values_for_absent_or_empty_fields() {
        let sparse = Candidate {
            title: "Dune Messiah".into(),
            author: String::new(),
            isbn: None,
            cover_uri: Some(String::new()),
        };
        let merged = filled().merge_candidate(&sparse);
        assert_eq!(merged.title, "Dune Messiah");
        assert_eq!(merged.author, "F. Herbert");
        assert_eq!(merged.isbn, "0000");
        assert_eq!(merged.cover_uri, "https://example.test/cover.jpg");
    }

    #[test]
    fn merge_is_idempotent() {
        for start in [FormState::default(), filled()] {
            let once = start.clone().merge_candidate(&dune());
            let twice = once.clone().merge_candidate(&dune());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn reset_is_the_canonical_empty_state() {
        assert_eq!(FormState::reset(), FormState::default());
        assert!(FormState::reset().is_empty());
        assert!(!filled().is_empty());
    }

    #[test]
    fn selecting_a_candidate_fills_the_form_and_clears_the_list() {
        let mut draft = Draft {
            form: FormState::default(),
            candidates: vec![dune(), Candidate::default()],
        };

        assert!(draft.select_candidate(0));
        assert_eq!(draft.form.title, "Dune");
        assert_eq!(draft.form.author, "Frank Herbert");
        assert_eq!(draft.form.isbn, "9780441013593");
        assert!(!draft.form.cover_uri.is_empty());
        assert!(draft.candidates.is_empty());
    }

    #[test]
    fn selecting_a_missing_candidate_changes_nothing() {
        let mut draft = Draft {
            form: filled(),
            candidates: vec![dune()],
        };
        assert!(!draft.select_candidate(3));
        assert_eq!(draft.form, filled());
        assert_eq!(draft.candidates.len(), 1);
    }

    #[test]
    fn field_names_are_snake_case_on_the_wire() {
        let field: FormField = serde_json::from_str("\"finished_at_local_date\"").unwrap();
        assert_eq!(field, FormField::FinishedAtLocalDate);
    }
}
