//! 枠ごとの選択ファイル

use super::policy::SlotSpec;
use crate::http::FormPart;

/// 現在の選択状態（フィールド名 → ファイル列）
#[derive(Debug, Clone)]
pub struct Selection<F> {
    slots: Vec<(String, Vec<F>)>,
}

impl<F> Default for Selection<F> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<F> Selection<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self, field: &str) -> &[F] {
        self.slots
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, files)| files.as_slice())
            .unwrap_or(&[])
    }

    /// 枠の中身を丸ごと置き換える
    pub fn replace(&mut self, field: &str, files: Vec<F>) {
        self.remove(field);
        if !files.is_empty() {
            self.slots.push((field.to_string(), files));
        }
    }

    pub fn remove(&mut self, field: &str) {
        self.slots.retain(|(f, _)| f != field);
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.slots.iter().map(|(_, files)| files.len()).sum()
    }

    /// 未選択の必須枠（最初の1つ）
    pub fn first_missing<'a>(&self, slots: &'a [SlotSpec]) -> Option<&'a SlotSpec> {
        slots
            .iter()
            .find(|slot| slot.required && self.files(slot.field).is_empty())
    }

    pub fn is_complete(&self, slots: &[SlotSpec]) -> bool {
        !self.is_empty() && self.first_missing(slots).is_none()
    }
}

impl<F: Clone> Selection<F> {
    /// 枠定義の順にmultipartパートを並べる
    pub fn to_parts(&self, slots: &[SlotSpec]) -> Vec<FormPart<F>> {
        slots
            .iter()
            .flat_map(|slot| {
                self.files(slot.field).iter().map(move |file| FormPart {
                    field: slot.field.to_string(),
                    file: file.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demos;
    use crate::http::mock::{MockFile, MB};

    fn csv(name: &str) -> MockFile {
        MockFile::new(name, "text/csv", MB)
    }

    #[test]
    fn test_replace_is_wholesale() {
        let mut selection = Selection::new();
        selection.replace("bank_file", vec![csv("a.csv")]);
        selection.replace("bank_file", vec![csv("b.csv")]);
        assert_eq!(selection.files("bank_file").len(), 1);
        assert_eq!(selection.files("bank_file")[0].name, "b.csv");
    }

    #[test]
    fn test_replace_with_empty_removes_slot() {
        let mut selection = Selection::new();
        selection.replace("bank_file", vec![csv("a.csv")]);
        selection.replace("bank_file", Vec::new());
        assert!(selection.is_empty());
    }

    #[test]
    fn test_completeness_requires_both_slots() {
        let slots = demos::BANK_REC.slots;
        let mut selection = Selection::new();
        selection.replace("bank_file", vec![csv("bank.csv")]);
        assert!(!selection.is_complete(slots));
        assert_eq!(selection.first_missing(slots).map(|s| s.field), Some("ledger_file"));

        selection.replace("ledger_file", vec![csv("ledger.csv")]);
        assert!(selection.is_complete(slots));
    }

    #[test]
    fn test_parts_follow_slot_order() {
        let slots = demos::BANK_REC.slots;
        let mut selection = Selection::new();
        selection.replace("ledger_file", vec![csv("ledger.csv")]);
        selection.replace("bank_file", vec![csv("bank.csv")]);

        let fields: Vec<String> = selection.to_parts(slots).into_iter().map(|p| p.field).collect();
        assert_eq!(fields, vec!["bank_file".to_string(), "ledger_file".to_string()]);
    }

    #[test]
    fn test_multiple_files_become_repeated_parts() {
        let slots = demos::EXPENSES.slots;
        let mut selection = Selection::new();
        selection.replace("transactions", vec![csv("card.csv")]);
        selection.replace(
            "receipts",
            vec![
                MockFile::new("r1.png", "image/png", MB),
                MockFile::new("r2.pdf", "application/pdf", MB),
            ],
        );
        let parts = selection.to_parts(slots);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts.iter().filter(|p| p.field == "receipts").count(), 2);
        assert_eq!(selection.file_count(), 3);
    }
}
