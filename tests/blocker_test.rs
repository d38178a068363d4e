use bunkatsu::analysis::block::BlockClass;
use bunkatsu::analysis::blocker::{BlockMode, BlockedToken, Blocker, BlockerParams};

const TEXTS: &[&str] = &[
    "東京タワーへ行く",
    "全文検索エンジンはFAST。",
    "helpful tools",
    "ＡＢＣ１２３です",
    "Ελληνικά и русский",
];

const CONFIGS: &[&str] = &[
    "JAP:ALL:2",
    "JAP:ALL:1:3 KAN:HIR",
    "JAP3:ALL:2:2 KAN:HIR KAT:HIR",
    "JAP2:ALL:2 ASC:3:4",
    "GEN:ALL:2:3",
];

fn run(config: &str, text: &str, mode: BlockMode) -> Vec<BlockedToken> {
    let mut blocker = Blocker::parse(config).unwrap();
    blocker.set(text, mode);
    blocker.collect()
}

#[test]
fn test_index_mode_covers_every_position_in_order() {
    for config in CONFIGS {
        let params = BlockerParams::parse(config).unwrap();
        let blocker = Blocker::new(params.clone());
        for text in TEXTS {
            let tokens = run(config, text, BlockMode::Index);
            let length = text.chars().count();
            let mut covered = vec![false; length];
            let mut last = 0;
            for token in &tokens {
                assert!(token.offset >= last, "{config} {text}: offsets go back");
                last = token.offset;
                covered[token.offset] = true;

                let first = token.text.chars().next().unwrap();
                let max = params.max_length(blocker.block_class(first));
                let len = token.text.chars().count();
                // Pair bridges are two characters even when max is 1.
                assert!(len >= 1 && len <= max.max(2), "{config} {text}: {token:?}");
                assert!(!token.is_short);
            }
            assert!(covered.iter().all(|c| *c), "{config} {text}: gap");
        }
    }
}

#[test]
fn test_search_tokens_are_indexed() {
    for config in CONFIGS {
        for text in TEXTS {
            let indexed: Vec<(String, usize)> = run(config, text, BlockMode::Index)
                .into_iter()
                .map(|t| (t.text, t.offset))
                .collect();
            let chars: Vec<char> = text.chars().collect();

            for start in 0..chars.len() {
                for end in start + 1..=chars.len() {
                    let query: String = chars[start..end].iter().collect();
                    for token in run(config, &query, BlockMode::Search) {
                        if token.is_short {
                            continue;
                        }
                        let expected = (token.text.clone(), start + token.offset);
                        assert!(
                            indexed.contains(&expected),
                            "{config}: {query:?} in {text:?} needs {expected:?}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn test_pair_bridge_between_kanji_and_hiragana() {
    let tokens = run("JAP:ALL:2:2 KAN:HIR", "東京へ行く", BlockMode::Index);
    let texts: Vec<(&str, usize)> = tokens.iter().map(|t| (t.text.as_str(), t.offset)).collect();
    assert!(texts.contains(&("京へ", 1)));
    assert!(texts.contains(&("へ行", 2)));
    assert!(texts.contains(&("行く", 3)));

    let tokens = run("JAP:ALL:2:2", "東京へ行く", BlockMode::Index);
    assert!(tokens.iter().all(|t| t.text != "京へ"));
}

#[test]
fn test_short_word_only_for_whole_query() {
    let tokens = run("JAP:ALL:2 KAN:3", "東京", BlockMode::Search);
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].is_short);
    assert_eq!(tokens[0].min_length, 3);
    assert_eq!(tokens[0].class, BlockClass::Kanji);

    let tokens = run("JAP:ALL:2 KAN:3", "東京タワー", BlockMode::Search);
    assert!(tokens.iter().all(|t| !t.is_short));
}

#[test]
fn test_description_round_trip() {
    for config in CONFIGS {
        let params = BlockerParams::parse(config).unwrap();
        let reparsed = BlockerParams::parse(&params.describe()).unwrap();
        assert_eq!(params, reparsed, "{config}");
    }
}

#[test]
fn test_malformed_configuration() {
    for bad in ["XYZ:ALL:2", "JAP:FOO:2", "JAP:ALL:0", "JAP:ALL:3:2", "JAP:ALL:9", "JAP:KAN"] {
        assert!(Blocker::parse(bad).is_err(), "{bad}");
    }
}
