//! Property tests for the text model.

use super::fixtures;
use super::options::TextModelOptions;
use super::records::{Record, RecordTree};
use super::text::{self, TextBlock, TextEncoding};
use super::text_prop::StyleTextPropAtom;
use crate::common::binary::utf16_len;
use crate::ole::consts::PptRecordType;
use proptest::prelude::*;

/// Text mixing ASCII, Latin-1, wider BMP characters, astral characters and separators
fn raw_text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            4 => "[a-zA-Z0-9 ]",
            1 => Just("\r".to_string()),
            1 => Just("\n".to_string()),
            1 => "[\u{e0}-\u{ff}]",
            1 => "[\u{100}-\u{2fff}]",
            1 => Just("\u{1F600}".to_string()),
        ],
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

/// Run text without paragraph separators
fn run_text_strategy() -> impl Strategy<Value = String> {
    raw_text_strategy().prop_map(|s| s.replace('\r', ""))
}

fn load(bytes: &[u8]) -> (RecordTree, Vec<TextBlock>) {
    let mut tree = RecordTree::parse(bytes).unwrap();
    let root = tree.roots()[0];
    let blocks = TextBlock::find_all(&mut tree, root).unwrap();
    (tree, blocks)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_set_text_preserves_raw_text(raw in raw_text_strategy()) {
        let mut paragraphs = text::split_paragraphs("seed\rtext");
        text::set_text(&mut paragraphs, &raw);
        prop_assert_eq!(text::raw_text(&paragraphs), raw.clone());
        prop_assert_eq!(text::text(&paragraphs), raw.replace('\r', "\n"));
        prop_assert!(!paragraphs.is_empty());
    }

    #[test]
    fn prop_store_round_trips_block_text(raw in raw_text_strategy()) {
        let (mut tree, mut blocks) = load(&fixtures::rich_slide_list());
        let options = TextModelOptions::default();
        blocks[1].set_text(&mut tree, &raw, &options).unwrap();

        let wide = raw.chars().any(|c| u32::from(c) > 0xFF);
        let expected = if wide { TextEncoding::Wide } else { TextEncoding::Narrow };
        prop_assert_eq!(blocks[1].encoding(), expected);

        let (reread_tree, reread) = load(&tree.to_bytes().unwrap());
        prop_assert_eq!(reread[1].raw_text(), raw.clone());
        prop_assert_eq!(reread[0].raw_text(), fixtures::RICH_TITLE);

        // Both style tables cover the text plus its terminator
        let style_id = reread[1].style_atom_id().unwrap();
        let Record::StyleTextProp(payload) = &reread_tree.get(style_id).unwrap().record else {
            panic!("style atom missing");
        };
        let len = utf16_len(&raw);
        let styles = StyleTextPropAtom::parse(payload, len).unwrap();
        prop_assert_eq!(styles.paragraph_styles.total_covered(), len as u64 + 1);
        prop_assert_eq!(styles.character_styles.total_covered(), len as u64 + 1);
    }

    #[test]
    fn prop_run_edit_leaves_siblings(new_text in run_text_strategy()) {
        let (mut tree, mut blocks) = load(&fixtures::rich_slide_list());
        let subtitle = &mut blocks[1];
        subtitle.set_run_text(1, 0, &new_text).unwrap();
        subtitle.store(&mut tree, &TextModelOptions::default()).unwrap();

        let (_, reread) = load(&tree.to_bytes().unwrap());
        let expected = [
            fixtures::RICH_SUBTITLE[0],
            new_text.as_str(),
            fixtures::RICH_SUBTITLE[2],
        ]
        .concat();
        prop_assert_eq!(reread[1].raw_text(), expected);

        let runs: Vec<_> = reread[1].paragraphs().iter().flat_map(|p| p.runs()).collect();
        prop_assert!(runs[0].is_bold());
        prop_assert_eq!(runs[0].raw_text(), fixtures::RICH_SUBTITLE[0]);
    }

    #[test]
    fn prop_tree_round_trips_bytes(texts in prop::collection::vec(raw_text_strategy(), 0..6)) {
        let mut children = Vec::new();
        for (i, text) in texts.iter().enumerate() {
            children.push(fixtures::text_header(i as u32 % 9));
            if text.chars().all(|c| u32::from(c) <= 0xFF) {
                children.push(fixtures::text_bytes(text));
            } else {
                children.push(fixtures::text_chars(text));
            }
        }
        let bytes = fixtures::container(PptRecordType::SlideListWithText, &children);
        let tree = RecordTree::parse(&bytes).unwrap();
        prop_assert_eq!(tree.to_bytes().unwrap(), bytes);
    }
}
