use piece_trie::{PushPiece, StringTrie, Trie, VecTrie};
use quickcheck::{empty_shrinker, Arbitrary, Gen, TestResult};
use quickcheck_macros::quickcheck;
use std::collections::BTreeMap;

/// A short key over a tiny alphabet, so random keys share prefixes often.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SmallKey(Vec<u8>);

impl Arbitrary for SmallKey {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 6;
        SmallKey((0..len).map(|_| u8::arbitrary(g) % 4).collect())
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().map(SmallKey))
    }
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Emplace,
    Insert,
    Erase,
    Get,
}

impl Arbitrary for Op {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&[Op::Emplace, Op::Insert, Op::Erase, Op::Get])
            .unwrap_or(&Op::Get)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        empty_shrinker()
    }
}

#[derive(Debug, Clone)]
struct Action {
    op: Op,
    key: SmallKey,
    value: u16,
}

impl Arbitrary for Action {
    fn arbitrary(g: &mut Gen) -> Self {
        Action {
            op: Op::arbitrary(g),
            key: SmallKey::arbitrary(g),
            value: u16::arbitrary(g),
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let (op, value) = (self.op, self.value);
        Box::new(self.key.shrink().map(move |key| Action { op, key, value }))
    }
}

fn apply(trie: &mut VecTrie<u8, u16>, oracle: &mut BTreeMap<Vec<u8>, u16>, action: &Action) {
    let key = &action.key.0;
    match action.op {
        Op::Emplace => {
            let (_, inserted) = trie.emplace(key, action.value);
            assert_eq!(inserted, !oracle.contains_key(key));
            oracle.entry(key.clone()).or_insert(action.value);
        }
        Op::Insert => {
            assert_eq!(
                trie.insert(key, action.value),
                oracle.insert(key.clone(), action.value)
            );
        }
        Op::Erase => assert_eq!(trie.erase(key), oracle.remove(key)),
        Op::Get => assert_eq!(trie.get(key), oracle.get(key)),
    }
}

#[quickcheck]
fn prop_matches_btree_map(actions: Vec<Action>) -> bool {
    let mut trie = Trie::new(PushPiece);
    let mut oracle = BTreeMap::new();
    for action in &actions {
        apply(&mut trie, &mut oracle, action);
        assert_eq!(trie.len(), oracle.len());
    }
    trie.iter().eq(oracle.iter().map(|(k, v)| (k.clone(), v)))
}

#[quickcheck]
fn prop_iteration_is_ascending(keys: Vec<String>) -> bool {
    let trie: StringTrie<()> = keys.into_iter().map(|key| (key, ())).collect();
    let collected: Vec<String> = trie.keys().collect();
    collected.windows(2).all(|pair| pair[0] < pair[1])
}

#[quickcheck]
fn prop_iteration_is_deterministic(keys: Vec<SmallKey>) -> bool {
    let trie: VecTrie<u8, usize> = keys
        .into_iter()
        .enumerate()
        .map(|(i, key)| (key.0, i))
        .collect();
    trie.iter().eq(trie.iter())
}

#[quickcheck]
fn prop_reverse_iteration_mirrors_forward(keys: Vec<SmallKey>) -> bool {
    let trie: VecTrie<u8, ()> = keys.into_iter().map(|key| (key.0, ())).collect();
    let mut forward: Vec<Vec<u8>> = trie.keys().collect();
    let backward: Vec<Vec<u8>> = trie.keys().rev().collect();
    forward.reverse();
    forward == backward
}

#[quickcheck]
fn prop_prefix_and_extension_coexist(key: SmallKey, extension: SmallKey) -> TestResult {
    if extension.0.is_empty() {
        return TestResult::discard();
    }
    let mut longer = key.0.clone();
    longer.extend(&extension.0);

    let mut trie: VecTrie<u8, u8> = Trie::new(PushPiece);
    trie.emplace(&key.0, 1);
    trie.emplace(&longer, 2);

    let both = trie.get(&key.0) == Some(&1) && trie.get(&longer) == Some(&2);
    trie.erase(&key.0);
    let longer_survives = trie.get(&longer) == Some(&2) && trie.get(&key.0).is_none();
    TestResult::from_bool(both && longer_survives)
}

#[quickcheck]
fn prop_erase_everything_leaves_empty(keys: Vec<SmallKey>) -> bool {
    let mut trie: VecTrie<u8, ()> = keys.iter().map(|key| (key.0.clone(), ())).collect();
    for key in &keys {
        trie.erase(&key.0);
    }
    trie.is_empty() && trie.iter().next().is_none() && trie.begin() == trie.end()
}
